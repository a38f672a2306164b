//! RGB pixel type

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrataError};

/// Largest value a channel can hold
pub const MAX_CHANNEL: u8 = 255;

/// An immutable 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pixel {
    red: u8,
    green: u8,
    blue: u8,
}

impl Pixel {
    /// Black (0, 0, 0), also the sentinel for out-of-bounds reads
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);

    /// White (255, 255, 255)
    pub const WHITE: Pixel = Pixel::new(MAX_CHANNEL, MAX_CHANNEL, MAX_CHANNEL);

    /// Create a pixel from three in-range channels
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create a pixel from wider integers, rejecting channels outside [0, 255]
    pub fn try_new(red: i64, green: i64, blue: i64) -> Result<Self> {
        Ok(Self {
            red: checked_channel("red", red)?,
            green: checked_channel("green", green)?,
            blue: checked_channel("blue", blue)?,
        })
    }

    /// Build a pixel from real-valued channels via [`clamp_round`]
    pub fn from_real(channels: [f64; 3]) -> Self {
        Self::new(
            clamp_round(channels[0]),
            clamp_round(channels[1]),
            clamp_round(channels[2]),
        )
    }

    /// Red channel
    pub fn red(&self) -> u8 {
        self.red
    }

    /// Green channel
    pub fn green(&self) -> u8 {
        self.green
    }

    /// Blue channel
    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// Channels in R, G, B order
    pub fn channels(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// Channels as reals, for transform arithmetic
    pub fn to_real(&self) -> [f64; 3] {
        [self.red as f64, self.green as f64, self.blue as f64]
    }
}

impl From<[u8; 3]> for Pixel {
    fn from(rgb: [u8; 3]) -> Self {
        Pixel::new(rgb[0], rgb[1], rgb[2])
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.red, self.green, self.blue)
    }
}

fn checked_channel(channel: &str, value: i64) -> Result<u8> {
    u8::try_from(value).map_err(|_| {
        StrataError::invalid_argument(format!(
            "{} channel {} is outside [0, {}]",
            channel, value, MAX_CHANNEL
        ))
    })
}

/// Clamp a real channel value to [0, 255] and round half up
///
/// NaN maps to 0.
#[inline]
pub fn clamp_round(value: f64) -> u8 {
    if value < 0.0 {
        0
    } else if value > MAX_CHANNEL as f64 {
        MAX_CHANNEL
    } else {
        (value + 0.5).floor() as u8
    }
}
