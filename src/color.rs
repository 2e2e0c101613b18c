use std::fmt;
use std::str::FromStr;

use image::Rgba;
use palette::{Srgb, Srgba};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An 8-bit RGBA color.
///
/// Colors compare structurally, so two pixels with identical channels are the
/// same key no matter where they came from. The derived `Ord` is lexicographic
/// over (red, green, blue, alpha) and is the tie-break order used when two
/// colors cover the same number of pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self { red, green, blue, alpha }
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Dissimilarity between two colors.
    ///
    /// Euclidean distance over the four channels with the alpha delta doubled
    /// before squaring, so a change in opacity counts twice as much as the
    /// same change in any single color channel.
    #[inline]
    pub fn distance(self, other: Color) -> f64 {
        let dr = f64::from(other.red) - f64::from(self.red);
        let dg = f64::from(other.green) - f64::from(self.green);
        let db = f64::from(other.blue) - f64::from(self.blue);
        let da = 2.0 * (f64::from(other.alpha) - f64::from(self.alpha));
        (dr * dr + dg * dg + db * db + da * da).sqrt()
    }

    /// Upper-case `#RRGGBBAA`.
    pub fn to_hex(self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

/// Free-function form of [`Color::distance`].
#[inline]
pub fn distance(a: Color, b: Color) -> f64 {
    a.distance(b)
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RGBA({}, {}, {}, {})",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

impl From<[u8; 4]> for Color {
    fn from([red, green, blue, alpha]: [u8; 4]) -> Self {
        Self::new(red, green, blue, alpha)
    }
}

impl From<Color> for [u8; 4] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

impl From<Rgba<u8>> for Color {
    fn from(Rgba(channels): Rgba<u8>) -> Self {
        channels.into()
    }
}

impl From<Color> for Rgba<u8> {
    fn from(color: Color) -> Self {
        Rgba(color.to_array())
    }
}

impl From<Srgba<u8>> for Color {
    fn from(c: Srgba<u8>) -> Self {
        Self::new(c.red, c.green, c.blue, c.alpha)
    }
}

impl From<Color> for Srgba<u8> {
    fn from(c: Color) -> Self {
        Srgba::new(c.red, c.green, c.blue, c.alpha)
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("expected 4 comma-separated channels, got {0}")]
    ChannelCount(usize),

    #[error("invalid channel value {0:?} (expected 0-255)")]
    Channel(String),

    #[error("invalid hex color {0:?}")]
    Hex(String),
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Accepts `r,g,b,a` (optionally wrapped in parentheses), `#RGB`,
    /// `#RRGGBB` (opaque) and `#RRGGBBAA`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.contains(',') {
            let inner = s.trim_start_matches('(').trim_end_matches(')');
            let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
            if parts.len() != 4 {
                return Err(ParseColorError::ChannelCount(parts.len()));
            }
            let mut channels = [0u8; 4];
            for (slot, part) in channels.iter_mut().zip(&parts) {
                *slot = part
                    .parse()
                    .map_err(|_| ParseColorError::Channel(part.to_string()))?;
            }
            return Ok(channels.into());
        }

        let hex = s.trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(ParseColorError::Hex(s.to_string()));
        }
        if hex.len() == 8 {
            let rgb: Srgb<u8> = hex[..6]
                .parse()
                .map_err(|_| ParseColorError::Hex(s.to_string()))?;
            let alpha = u8::from_str_radix(&hex[6..], 16)
                .map_err(|_| ParseColorError::Hex(s.to_string()))?;
            return Ok(Self::new(rgb.red, rgb.green, rgb.blue, alpha));
        }

        let rgb: Srgb<u8> = hex
            .parse()
            .map_err(|_| ParseColorError::Hex(s.to_string()))?;
        Ok(Self::new(rgb.red, rgb.green, rgb.blue, 255))
    }
}
