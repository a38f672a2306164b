//! Integration Tests
//!
//! End-to-end tests for layer editing and image files.

use approx::assert_relative_eq;
use tempfile::tempdir;

use strata::cli::Session;
use strata::io::{export_layers, import_layers, load_image, parse_ppm, save_image, to_ppm_string};
use strata::transform::{color_transform, filter};
use strata::{Adjustment, EditorConfig, LayerStack, Pixel, PixelGrid, StrataError};

/// Mean of all channels, scaled to 0..1
fn mean_brightness(grid: &PixelGrid) -> f64 {
    let total: f64 = grid
        .pixels()
        .iter()
        .flat_map(|p| p.to_real())
        .sum();
    total / (grid.pixels().len() * 3) as f64 / 255.0
}

// === Stack Workflow Tests ===

#[test]
fn test_layered_editing_workflow() {
    let mut stack = LayerStack::new();
    stack.add_layer("background").unwrap();
    stack.checkerboard(4, 16).unwrap();
    assert_eq!(stack.dimensions().unwrap(), (16, 16));

    stack.add_layer("overlay").unwrap();
    stack
        .upload(PixelGrid::filled(16, 16, Pixel::new(200, 100, 50)))
        .unwrap();
    stack.sepia().unwrap();
    assert_eq!(stack.top_visible().unwrap().name(), "overlay");

    // Hiding the overlay exposes the checkerboard
    stack.toggle_visible().unwrap();
    let top = stack.top_visible().unwrap();
    assert_eq!(top.name(), "background");
    assert_eq!(top.pixel_at(0, 4), Pixel::WHITE);

    // Hiding everything yields the detached placeholder
    stack.set_current("background").unwrap();
    stack.toggle_visible().unwrap();
    let placeholder = stack.top_visible().unwrap();
    assert_eq!(placeholder.grid().dimensions(), (1, 1));
    assert_eq!(stack.layer_count(), 2);
}

#[test]
fn test_blur_preserves_mean_on_uniform_image() {
    let grid = PixelGrid::filled(9, 9, Pixel::new(120, 120, 120));
    let blurred = filter(&grid, &[[1.0 / 9.0; 3]; 3]).unwrap();

    // Interior stays, edges darken from zero padding
    assert_eq!(blurred.get(4, 4), Some(Pixel::new(120, 120, 120)));
    assert!(mean_brightness(&blurred) < mean_brightness(&grid));
    assert_relative_eq!(mean_brightness(&grid), 120.0 / 255.0, epsilon = 1e-12);
}

#[test]
fn test_identity_color_matrix_is_lossless() {
    let grid = PixelGrid::checkerboard(3, 9).unwrap();
    let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    assert_eq!(color_transform(&grid, &identity).unwrap(), grid);
}

#[test]
fn test_failed_operation_leaves_stack_unchanged() {
    let mut stack = LayerStack::new();
    stack.add_layer("a").unwrap();
    stack.upload(PixelGrid::filled(2, 2, Pixel::WHITE)).unwrap();

    let before = stack.summary();
    assert!(matches!(
        stack.add_layer_with_image(PixelGrid::new(3, 3), "b"),
        Err(StrataError::InvalidArgument { .. })
    ));
    assert!(matches!(
        stack.add_layer("a"),
        Err(StrataError::InvalidArgument { .. })
    ));
    assert!(matches!(
        stack.delete_layer("a"),
        Err(StrataError::InvalidState { .. })
    ));
    assert_eq!(stack.summary(), before);
}

// === File Tests ===

#[test]
fn test_ppm_text_round_trip() {
    let text = "P3\n# two by two\n2 2\n255\n255 0 0  0 255 0\n0 0 255  255 255 255\n";
    let grid = parse_ppm(text).unwrap();
    assert_eq!(grid.get(1, 0), Some(Pixel::new(0, 0, 255)));
    assert_eq!(parse_ppm(&to_ppm_string(&grid).unwrap()).unwrap(), grid);
}

#[test]
fn test_png_and_ppm_agree() {
    let dir = tempdir().unwrap();
    let grid = PixelGrid::checkerboard(2, 4).unwrap();

    let png = dir.path().join("board.png");
    let ppm = dir.path().join("board.ppm");
    save_image(&grid, &png).unwrap();
    save_image(&grid, &ppm).unwrap();

    assert_eq!(load_image(&png).unwrap(), load_image(&ppm).unwrap());
}

#[test]
fn test_unsupported_extension() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        save_image(&PixelGrid::new(1, 1), &dir.path().join("x.tiff")),
        Err(StrataError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_archive_round_trip_through_stack() {
    let dir = tempdir().unwrap();
    let config = EditorConfig::default();

    let mut stack = LayerStack::new();
    stack.add_layer("base").unwrap();
    stack.checkerboard(1, 4).unwrap();
    stack.add_layer("tinted").unwrap();
    stack
        .upload(PixelGrid::filled(2, 2, Pixel::new(90, 60, 30)))
        .unwrap();
    stack.apply_adjustment(Adjustment::Greyscale).unwrap();

    let folder = export_layers(&stack, dir.path(), &config).unwrap();
    let mut restored = LayerStack::new();
    assert_eq!(import_layers(&mut restored, &folder, &config).unwrap(), 2);

    assert_eq!(restored.layer_name_at(0).unwrap(), "tinted");
    assert_eq!(restored.layer_name_at(1).unwrap(), "base");
    assert_eq!(
        restored.get("tinted").unwrap().grid(),
        stack.get("tinted").unwrap().grid()
    );
}

// === Session Tests ===

#[test]
fn test_session_script_end_to_end() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("top.png");
    let script = format!(
        "# build two layers\n\
         new-layer board\n\
         checkerboard 2 4\n\
         duplicate soft\n\
         select soft\n\
         blur\n\
         select-index 0\n\
         toggle\n\
         save-top {}\n",
        out.display()
    );

    let mut session = Session::new(EditorConfig::default());
    for line in script.lines() {
        session.execute_line(line).unwrap();
    }

    // board is hidden, so the blurred copy is on top
    let saved = load_image(&out).unwrap();
    assert_eq!(&saved, session.stack().get("soft").unwrap().grid());
}
