//! An ordered list of gradient sources that a front end can offer the
//! user, starting with the fixed palettes and growing as the user
//! builds their own.

use log::debug;

use crate::gradient::{ColorTable, FixedPalette, GradientSource};
use crate::error::{FractalError, Result};

/// Gradient sources in the order they were registered.
#[derive(Clone, Debug)]
pub struct PaletteRegistry {
    sources: Vec<GradientSource>,
}

impl Default for PaletteRegistry {
    fn default() -> Self {
        PaletteRegistry::new()
    }
}

impl PaletteRegistry {
    /// A registry holding the Rainbow and both grayscale palettes, in
    /// that order.
    pub fn new() -> Self {
        PaletteRegistry {
            sources: vec![
                GradientSource::Fixed(FixedPalette::Rainbow),
                GradientSource::Fixed(FixedPalette::GrayscaleOne),
                GradientSource::Fixed(FixedPalette::GrayscaleTwo),
            ],
        }
    }

    /// Adds a user gradient to the end of the list and returns its
    /// index.  The source is built once first, so a degenerate gradient
    /// is refused here rather than at selection time.
    pub fn append(&mut self, source: GradientSource) -> Result<usize> {
        source.build()?;
        debug!("registering palette {}", source.description());
        self.sources.push(source);
        Ok(self.sources.len() - 1)
    }

    /// Builds the color table for the source at `index`.
    pub fn get(&self, index: usize) -> Result<ColorTable> {
        match self.sources.get(index) {
            Some(source) => source.build(),
            None => Err(FractalError::invalid(format!(
                "palette {} does not exist; {} are registered",
                index,
                self.sources.len()
            ))),
        }
    }

    /// One `"<index>: <description>"` line per source, using the same
    /// index `get` accepts.
    pub fn describe_all(&self) -> Vec<String> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, source)| format!("{}: {}", i, source.description()))
            .collect()
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
