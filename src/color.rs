//! Opaque packed colors.  Every color the renderer produces has full
//! alpha; the packing is `0xAARRGGBB`.

use std::fmt;
use std::str::FromStr;

use crate::error::FractalError;

/// A single opaque ARGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color(u32);

const ALPHA: u32 = 0xff00_0000;

impl Color {
    /// The flat color painted inside the set.
    pub const BLACK: Color = Color(ALPHA);
    /// Full white.
    pub const WHITE: Color = Color(0xffff_ffff);

    /// Builds an opaque color from its three channels.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Color {
        Color(ALPHA | (u32::from(red) << 16) | (u32::from(green) << 8) | u32::from(blue))
    }

    /// Builds an opaque color from a gray level.
    pub fn gray(level: u8) -> Color {
        Color::rgb(level, level, level)
    }

    /// Red channel.
    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    /// The packed `0xAARRGGBB` value.
    pub fn argb(self) -> u32 {
        self.0
    }

    /// The three channels in red, green, blue order.
    pub fn channels(self) -> [i32; 3] {
        [
            i32::from(self.red()),
            i32::from(self.green()),
            i32::from(self.blue()),
        ]
    }
}

/// Flattens a raster into tightly packed RGB bytes, the layout image
/// encoders expect.
pub fn to_rgb_bytes(pixels: &[Color]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(pixels.len() * 3);
    for p in pixels {
        bytes.extend_from_slice(&[p.red(), p.green(), p.blue()]);
    }
    bytes
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red(), self.green(), self.blue())
    }
}

/// Accepts `#rrggbb` or `rrggbb`.
impl FromStr for Color {
    type Err = FractalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return Err(FractalError::invalid(format!("not a #rrggbb color: {}", s)));
        }
        match u32::from_str_radix(hex, 16) {
            Ok(v) => Ok(Color(ALPHA | v)),
            Err(_) => Err(FractalError::invalid(format!("not a #rrggbb color: {}", s))),
        }
    }
}
