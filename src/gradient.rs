// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Raw color tables.
//!
//! A color table is just an ordered, never-empty run of colors.  The
//! renderer does not care how it was made; the builders here make
//! the three fixed palettes, and the two kinds of user gradient: a
//! duotone, which ramps linearly from one color to another, and a
//! multi-stop gradient, which chains several such ramps together.
//! Either kind can be "mirrored," in which case the ramp runs back
//! down to where it started so the table wraps without a seam.

use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::{FractalError, Result};

/// An ordered sequence of opaque colors.  Never empty.
pub type ColorTable = Vec<Color>;

/// The palettes that ship with the renderer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FixedPalette {
    /// 1536 colors cycling red, orange, green, cyan, blue, magenta and
    /// back to red.
    Rainbow,
    /// 256 grays, black to white.
    GrayscaleOne,
    /// 512 grays, black to white and back to black.
    GrayscaleTwo,
}

impl FixedPalette {
    /// The label shown in palette listings.
    pub fn description(self) -> &'static str {
        match self {
            FixedPalette::Rainbow => "RainbowOne: Full Cycle Rainbow",
            FixedPalette::GrayscaleOne => "GrayscaleOne: Half Cycle Grayscale",
            FixedPalette::GrayscaleTwo => "GrayscaleTwo: Full Cycle Grayscale",
        }
    }
}

impl FromStr for FixedPalette {
    type Err = FractalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rainbow" => Ok(FixedPalette::Rainbow),
            "gray1" | "grayscale1" | "grayscaleone" => Ok(FixedPalette::GrayscaleOne),
            "gray2" | "grayscale2" | "grayscaletwo" => Ok(FixedPalette::GrayscaleTwo),
            _ => Err(FractalError::invalid(format!("unknown palette: {}", s))),
        }
    }
}

/// Builds one of the fixed palettes.
pub fn fixed_palette(kind: FixedPalette) -> ColorTable {
    match kind {
        FixedPalette::Rainbow => rainbow(),
        FixedPalette::GrayscaleOne => (0..=255u8).map(Color::gray).collect(),
        FixedPalette::GrayscaleTwo => (0..=255u8)
            .chain((0..=255u8).rev())
            .map(Color::gray)
            .collect(),
    }
}

// Each segment ramps exactly one channel while the other two hold.
fn rainbow() -> ColorTable {
    let mut table = Vec::with_capacity(1536);
    table.extend((0..=255u8).map(|i| Color::rgb(255, i, 0)));
    table.extend((0..=255u8).map(|i| Color::rgb(255 - i, 255, 0)));
    table.extend((0..=255u8).map(|i| Color::rgb(0, 255, i)));
    table.extend((0..=255u8).map(|i| Color::rgb(0, 255 - i, 255)));
    table.extend((0..=255u8).map(|i| Color::rgb(i, 0, 255)));
    table.extend((0..=255u8).map(|i| Color::rgb(255, 0, 255 - i)));
    table
}

/// Appends `steps` samples of the linear ramp from `from` to `to`,
/// both ends included.  Channel arithmetic truncates toward zero.
fn ramp(table: &mut ColorTable, from: Color, to: Color, steps: usize) {
    let a = from.channels();
    let b = to.channels();
    let span = (steps - 1) as i64;
    for i in 0..steps as i64 {
        let ch = |k: usize| (i64::from(a[k]) + i64::from(b[k] - a[k]) * i / span) as u8;
        table.push(Color::rgb(ch(0), ch(1), ch(2)));
    }
}

/// Reflects a table so that it runs back down to its first color.
/// The last sample is not repeated.
fn mirror_table(table: &mut ColorTable) {
    let len = table.len();
    for i in (0..len - 1).rev() {
        let c = table[i];
        table.push(c);
    }
}

fn check_steps(steps: usize) -> Result<()> {
    if steps < 2 {
        return Err(FractalError::invalid(format!(
            "a gradient segment needs at least 2 steps, got {}",
            steps
        )));
    }
    Ok(())
}

/// A two-color gradient of `steps` samples; mirrored tables have
/// `2 * steps - 1` entries.
pub fn duotone(from: Color, to: Color, steps: usize, mirror: bool) -> Result<ColorTable> {
    check_steps(steps)?;
    let mut table = Vec::with_capacity(if mirror { 2 * steps - 1 } else { steps });
    ramp(&mut table, from, to, steps);
    if mirror {
        mirror_table(&mut table);
    }
    Ok(table)
}

/// A gradient that starts at `first` and walks through each stop in
/// turn, taking that stop's step count to arrive.  Adjacent segments
/// share their boundary sample, so the table holds
/// `1 + sum(steps - 1)` colors before mirroring.
pub fn multi_stop(first: Color, stops: &[(usize, Color)], mirror: bool) -> Result<ColorTable> {
    if stops.is_empty() {
        return Err(FractalError::invalid("a multi-stop gradient needs at least one stop"));
    }
    for &(steps, _) in stops {
        check_steps(steps)?;
    }

    let total = 1 + stops.iter().map(|&(steps, _)| steps - 1).sum::<usize>();
    let mut table = Vec::with_capacity(if mirror { 2 * total - 1 } else { total });
    let mut from = first;
    for &(steps, to) in stops {
        // drop the previous segment's last sample; this one starts there
        table.pop();
        ramp(&mut table, from, to, steps);
        from = to;
    }
    debug_assert_eq!(table.len(), total);

    if mirror {
        mirror_table(&mut table);
    }
    Ok(table)
}

/// Something that can produce a color table on demand.
#[derive(Clone, Debug, PartialEq)]
pub enum GradientSource {
    /// One of the built-in palettes.
    Fixed(FixedPalette),
    /// A user ramp between two colors; see [`duotone`].
    Duotone {
        /// User-chosen label.
        name: String,
        /// First color of the ramp.
        from: Color,
        /// Last color of the ramp.
        to: Color,
        /// Samples in the ramp, both ends included.
        steps: usize,
        /// Reflect the ramp back to `from`.
        mirror: bool,
    },
    /// A user ramp through several colors; see [`multi_stop`].
    MultiStop {
        /// User-chosen label.
        name: String,
        /// Color the first segment starts from.
        first: Color,
        /// `(steps, color)` for each segment, in order.
        stops: Vec<(usize, Color)>,
        /// Reflect the whole table back to `first`.
        mirror: bool,
    },
}

impl GradientSource {
    /// Builds the table, refusing degenerate gradients.
    pub fn build(&self) -> Result<ColorTable> {
        match self {
            GradientSource::Fixed(kind) => Ok(fixed_palette(*kind)),
            GradientSource::Duotone {
                from,
                to,
                steps,
                mirror,
                ..
            } => duotone(*from, *to, *steps, *mirror),
            GradientSource::MultiStop {
                first,
                stops,
                mirror,
                ..
            } => multi_stop(*first, stops, *mirror),
        }
    }

    /// A label for palette listings.
    pub fn description(&self) -> String {
        match self {
            GradientSource::Fixed(kind) => kind.description().to_string(),
            GradientSource::Duotone { name, .. } => format!("CustomDuotone {}", name),
            GradientSource::MultiStop { name, .. } => format!("CustomGradient {}", name),
        }
    }
}

impl fmt::Display for GradientSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
