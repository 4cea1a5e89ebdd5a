//! Premixing a raw color table into a band table.
//!
//! The renderer never does palette math per pixel.  Instead, once per
//! iteration cap, a raw table is stretched over the cap through a
//! shaping curve and repeated some number of times, giving one color
//! for every band index a pixel can land on.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::{FractalError, Result};

/// The curve used to spread a raw table across the band indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapingMode {
    /// f(t) = t
    Linear,
    /// f(t) = sin(tπ/2), fast at first and easing into the top.
    QuarterSine,
    /// f(t) = 1 − 1/(8t + 1)
    Hyperbolic8,
    /// f(t) = 1 − 1/(16t + 1), steeper still near zero.
    Hyperbolic16,
    /// f(t) = √t
    Sqrt,
    /// f(t) = sin(tπ), up the table and back down.
    HalfSine,
    /// f(t) = (sin(2πt) + 1) / 2
    FullSine,
    /// f(t) = (cos(2πt) + 1) / 2
    FullCosine,
}

/// Every shaping mode, in code order.
pub const SHAPING_MODES: [ShapingMode; 8] = [
    ShapingMode::Linear,
    ShapingMode::QuarterSine,
    ShapingMode::Hyperbolic8,
    ShapingMode::Hyperbolic16,
    ShapingMode::Sqrt,
    ShapingMode::HalfSine,
    ShapingMode::FullSine,
    ShapingMode::FullCosine,
];

impl ShapingMode {
    /// Maps t in [0, 1) to a position along the raw table.
    pub fn shape(self, t: f64) -> f64 {
        match self {
            ShapingMode::Linear => t,
            ShapingMode::QuarterSine => (t * PI / 2.0).sin(),
            ShapingMode::Hyperbolic8 => -1.0 / (8.0 * t + 1.0) + 1.0,
            ShapingMode::Hyperbolic16 => -1.0 / (16.0 * t + 1.0) + 1.0,
            ShapingMode::Sqrt => t.sqrt(),
            ShapingMode::HalfSine => (t * PI).sin(),
            ShapingMode::FullSine => ((t * 2.0 * PI).sin() + 1.0) / 2.0,
            ShapingMode::FullCosine => ((t * 2.0 * PI).cos() + 1.0) / 2.0,
        }
    }

    /// The 1-based number used in saved parameter records.
    pub fn code(self) -> u8 {
        match self {
            ShapingMode::Linear => 1,
            ShapingMode::QuarterSine => 2,
            ShapingMode::Hyperbolic8 => 3,
            ShapingMode::Hyperbolic16 => 4,
            ShapingMode::Sqrt => 5,
            ShapingMode::HalfSine => 6,
            ShapingMode::FullSine => 7,
            ShapingMode::FullCosine => 8,
        }
    }

    /// The mode for a saved record's code.
    pub fn from_code(code: u8) -> Result<Self> {
        SHAPING_MODES
            .iter()
            .cloned()
            .find(|m| m.code() == code)
            .ok_or_else(|| FractalError::invalid(format!("color mode must be 1-8, got {}", code)))
    }

    /// Lowercase name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ShapingMode::Linear => "linear",
            ShapingMode::QuarterSine => "quarter-sine",
            ShapingMode::Hyperbolic8 => "hyperbolic-8",
            ShapingMode::Hyperbolic16 => "hyperbolic-16",
            ShapingMode::Sqrt => "sqrt",
            ShapingMode::HalfSine => "half-sine",
            ShapingMode::FullSine => "full-sine",
            ShapingMode::FullCosine => "full-cosine",
        }
    }
}

impl Default for ShapingMode {
    fn default() -> Self {
        ShapingMode::Linear
    }
}

impl fmt::Display for ShapingMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either the name or the numeric code.
impl FromStr for ShapingMode {
    type Err = FractalError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return ShapingMode::from_code(code);
        }
        SHAPING_MODES
            .iter()
            .cloned()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FractalError::invalid(format!("unknown color mode: {}", s)))
    }
}

/// Builds a band table of exactly `iteration_cap` entries from `raw`.
pub fn mix(raw: &[Color], iteration_cap: u32, mode: ShapingMode, repeats: u32) -> Result<Vec<Color>> {
    if iteration_cap < 1 {
        return Err(FractalError::invalid("iteration cap must be at least 1"));
    }
    if raw.is_empty() {
        return Err(FractalError::invalid("color table is empty"));
    }
    if repeats < 1 {
        return Err(FractalError::invalid("color repeats must be at least 1"));
    }

    let num_colors = raw.len();
    let scale = num_colors as f64 * f64::from(repeats);
    let cap = f64::from(iteration_cap);
    Ok((0..iteration_cap)
        .map(|i| {
            let t = f64::from(i) / cap;
            let band = (mode.shape(t) * scale) as usize % num_colors;
            raw[band]
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::{fixed_palette, FixedPalette};

    #[test]
    fn table_length_matches_the_cap() {
        let raw = fixed_palette(FixedPalette::Rainbow);
        for &mode in SHAPING_MODES.iter() {
            for &cap in &[1, 2, 17, 256, 5000] {
                assert_eq!(mix(&raw, cap, mode, 3).unwrap().len(), cap as usize);
            }
        }
    }

    #[test]
    fn linear_starts_at_the_first_color() {
        let raw = fixed_palette(FixedPalette::GrayscaleOne);
        for &cap in &[2, 3, 100, 256, 1000] {
            let bands = mix(&raw, cap, ShapingMode::Linear, 1).unwrap();
            assert_eq!(bands[0], raw[0]);
        }
    }

    #[test]
    fn linear_single_repeat_spreads_evenly() {
        let raw = fixed_palette(FixedPalette::GrayscaleOne);
        let bands = mix(&raw, 256, ShapingMode::Linear, 1).unwrap();
        assert_eq!(bands, raw);
        let doubled = mix(&raw, 256, ShapingMode::Linear, 2).unwrap();
        assert_eq!(doubled[128], raw[0]);
        assert_eq!(doubled[1], raw[2]);
    }

    #[test]
    fn full_cosine_starts_at_the_wrapped_top() {
        let raw: Vec<Color> = (0..10u8).map(Color::gray).collect();
        let bands = mix(&raw, 4, ShapingMode::FullCosine, 1).unwrap();
        // f(0) = 1, which wraps back to index 0
        assert_eq!(bands[0], raw[0]);
        // f(1/2) = 0
        assert_eq!(bands[2], raw[0]);
    }

    #[test]
    fn each_curve_lands_on_its_band_at_one_fifth() {
        let raw: Vec<Color> = (0..100u8).map(Color::gray).collect();
        // t = 1/5 is band 1 of a cap of 5; f(t) * 100 truncated
        let expected = [
            (ShapingMode::QuarterSine, 30),
            (ShapingMode::Hyperbolic8, 61),
            (ShapingMode::Hyperbolic16, 76),
            (ShapingMode::Sqrt, 44),
            (ShapingMode::HalfSine, 58),
            (ShapingMode::FullSine, 97),
        ];
        for &(mode, band) in expected.iter() {
            let bands = mix(&raw, 5, mode, 1).unwrap();
            assert_eq!(bands[1], Color::gray(band), "{}", mode);
        }
    }

    #[test]
    fn refuses_bad_input() {
        let raw = fixed_palette(FixedPalette::GrayscaleOne);
        assert!(mix(&raw, 0, ShapingMode::Linear, 1).is_err());
        assert!(mix(&[], 10, ShapingMode::Linear, 1).is_err());
        assert!(mix(&raw, 10, ShapingMode::Linear, 0).is_err());
    }

    #[test]
    fn modes_parse_by_name_and_code() {
        assert_eq!("3".parse::<ShapingMode>().unwrap(), ShapingMode::Hyperbolic8);
        assert_eq!("full-sine".parse::<ShapingMode>().unwrap(), ShapingMode::FullSine);
        assert!("9".parse::<ShapingMode>().is_err());
        for &mode in SHAPING_MODES.iter() {
            assert_eq!(ShapingMode::from_code(mode.code()).unwrap(), mode);
        }
    }
}
