// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The FractalEngine holds one rendered view: its raster, the value
//! stored for every pixel, and the band table those values index.
//! Holding on to the stored values is what makes recoloring and
//! color cycling cheap; neither ever iterates an orbit.

use log::debug;

use crate::color::Color;
use crate::error::{FractalError, Result};
use crate::escape::paint;
use crate::gradient::ColorTable;
use crate::mixer::{mix, ShapingMode};
use crate::params::ViewParameters;
use crate::progress::ProgressSink;
use crate::render::{render, RenderResult};

/// Which way `cycle_colors` rotates the band table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CycleDirection {
    /// Every band takes the color of the band `shift` above it.
    Up,
    /// Every band takes the color of the band `shift` below it.
    Down,
}

/// One rendered view, kept for recoloring.
#[derive(Debug)]
pub struct FractalEngine {
    table: ColorTable,
    mode: ShapingMode,
    repeats: u32,
    view: Option<ViewParameters>,
    bands: Vec<Color>,
    iterations: Vec<u32>,
    pixels: Vec<Color>,
}

impl FractalEngine {
    /// An engine that will color its renders from `table`, shaped by
    /// `mode` and repeated `repeats` times over the iteration cap.
    pub fn new(table: ColorTable, mode: ShapingMode, repeats: u32) -> Result<Self> {
        // mixing a single band is the cheapest check of table and repeats
        mix(&table, 1, mode, repeats)?;
        Ok(FractalEngine {
            table,
            mode,
            repeats,
            view: None,
            bands: Vec::new(),
            iterations: Vec::new(),
            pixels: Vec::new(),
        })
    }

    /// Iterates every pixel of `view` and replaces the engine's
    /// buffers and band table.  On failure, cancellation included, the
    /// previous view is left untouched.
    pub fn render(
        &mut self,
        view: &ViewParameters,
        progress: &mut dyn ProgressSink,
    ) -> Result<(&[Color], &[u32])> {
        view.validate()?;
        let bands = mix(&self.table, view.iteration_cap, self.mode, self.repeats)?;
        let RenderResult {
            pixels, iterations, ..
        } = render(view, &bands, progress)?;

        self.view = Some(view.clone());
        self.bands = bands;
        self.iterations = iterations;
        self.pixels = pixels;
        Ok((&self.pixels, &self.iterations))
    }

    /// Re-renders the current view with a new iteration cap.  The old
    /// stored values mean nothing under a different cap, so this is a
    /// full render.
    pub fn set_iteration_cap(
        &mut self,
        iteration_cap: u32,
        progress: &mut dyn ProgressSink,
    ) -> Result<(&[Color], &[u32])> {
        let view = ViewParameters {
            iteration_cap,
            ..self.current()?.clone()
        };
        self.render(&view, progress)
    }

    /// Swaps in a new table, shaping and repeat count, and repaints
    /// from the stored values.
    pub fn recolor(&mut self, table: ColorTable, mode: ShapingMode, repeats: u32) -> Result<&[Color]> {
        let cap = self.current()?.iteration_cap;
        let bands = mix(&table, cap, mode, repeats)?;
        debug!("recoloring with {} colors, mode {}, {} repeats", table.len(), mode, repeats);
        self.table = table;
        self.mode = mode;
        self.repeats = repeats;
        self.bands = bands;
        self.repaint();
        Ok(&self.pixels)
    }

    /// Rotates the band table by `shift` places, modulo the iteration
    /// cap, and repaints.
    pub fn cycle_colors(&mut self, shift: usize, direction: CycleDirection) -> Result<&[Color]> {
        self.current()?;
        let shift = shift % self.bands.len();
        match direction {
            CycleDirection::Up => self.bands.rotate_left(shift),
            CycleDirection::Down => self.bands.rotate_right(shift),
        }
        self.repaint();
        Ok(&self.pixels)
    }

    fn repaint(&mut self) {
        let bands = &self.bands;
        for (pixel, &value) in self.pixels.iter_mut().zip(&self.iterations) {
            *pixel = paint(bands, value);
        }
    }

    fn current(&self) -> Result<&ViewParameters> {
        self.view
            .as_ref()
            .ok_or_else(|| FractalError::invalid("no view has been rendered yet"))
    }

    /// The view last rendered, if any.
    pub fn view(&self) -> Option<&ViewParameters> {
        self.view.as_ref()
    }

    /// Row-major raster of the current view.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Row-major stored values of the current view.
    pub fn iterations(&self) -> &[u32] {
        &self.iterations
    }

    /// The premixed band table currently in force.
    pub fn bands(&self) -> &[Color] {
        &self.bands
    }

    /// Width and height of the current view.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.view.as_ref().map(|v| (v.width, v.height))
    }

    /// The raw table, shaping and repeat count the bands were mixed from.
    pub fn coloring(&self) -> (&[Color], ShapingMode, u32) {
        (&self.table, self.mode, self.repeats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::{duotone, fixed_palette, FixedPalette};
    use crate::progress::{CancelFlag, NoProgress};
    use num::Complex;

    fn engine() -> FractalEngine {
        FractalEngine::new(fixed_palette(FixedPalette::Rainbow), ShapingMode::Linear, 2).unwrap()
    }

    fn view() -> ViewParameters {
        ViewParameters {
            width: 40,
            height: 30,
            center: Complex::new(-0.75, 0.1),
            zoom: 2.0,
            iteration_cap: 80,
            ..ViewParameters::default()
        }
    }

    #[test]
    fn refuses_empty_tables() {
        assert!(FractalEngine::new(vec![], ShapingMode::Linear, 1).is_err());
        assert!(FractalEngine::new(vec![Color::WHITE], ShapingMode::Linear, 0).is_err());
    }

    #[test]
    fn band_table_tracks_the_cap() {
        let mut e = engine();
        e.render(&view(), &mut NoProgress).unwrap();
        assert_eq!(e.bands().len(), 80);
        e.set_iteration_cap(120, &mut NoProgress).unwrap();
        assert_eq!(e.bands().len(), 120);
        assert_eq!(e.view().unwrap().iteration_cap, 120);
        assert!(e.iterations().iter().all(|&v| v <= 120));
    }

    #[test]
    fn mutators_need_a_rendered_view() {
        let mut e = engine();
        assert!(e.cycle_colors(1, CycleDirection::Up).is_err());
        assert!(e.recolor(fixed_palette(FixedPalette::GrayscaleOne), ShapingMode::Sqrt, 1).is_err());
        assert!(e.set_iteration_cap(10, &mut NoProgress).is_err());
        assert_eq!(e.dimensions(), None);
    }

    #[test]
    fn invalid_views_leave_the_engine_alone() {
        let mut e = engine();
        e.render(&view(), &mut NoProgress).unwrap();
        let before = e.pixels().to_vec();
        let bad = ViewParameters { zoom: 0.0, ..view() };
        assert!(e.render(&bad, &mut NoProgress).is_err());
        assert!(e.set_iteration_cap(0, &mut NoProgress).is_err());
        assert_eq!(e.pixels(), &before[..]);
        assert_eq!(e.view().unwrap().iteration_cap, 80);
    }

    #[test]
    fn cancelled_renders_leave_the_engine_alone() {
        let mut e = engine();
        e.render(&view(), &mut NoProgress).unwrap();
        let before = e.pixels().to_vec();
        let flag = CancelFlag::new();
        flag.cancel();
        let wider = ViewParameters { width: 64, ..view() };
        match e.render(&wider, &mut flag.clone()) {
            Err(FractalError::Cancelled) => (),
            other => panic!("expected Cancelled, got {:?}", other.map(|(p, _)| p.len())),
        }
        assert_eq!(e.dimensions(), Some((40, 30)));
        assert_eq!(e.pixels(), &before[..]);
    }

    #[test]
    fn cycling_up_then_down_is_the_identity() {
        let mut e = engine();
        e.render(&view(), &mut NoProgress).unwrap();
        let before = e.pixels().to_vec();
        e.cycle_colors(7, CycleDirection::Up).unwrap();
        e.cycle_colors(7, CycleDirection::Down).unwrap();
        assert_eq!(e.pixels(), &before[..]);
    }

    #[test]
    fn cycling_up_moves_colors_toward_zero() {
        let mut e = engine();
        e.render(&view(), &mut NoProgress).unwrap();
        let bands = e.bands().to_vec();
        e.cycle_colors(3, CycleDirection::Up).unwrap();
        assert_eq!(e.bands()[0], bands[3]);
        assert_eq!(e.bands()[79], bands[2]);
        e.cycle_colors(83, CycleDirection::Down).unwrap();
        assert_eq!(e.bands(), &bands[..]);
    }

    #[test]
    fn recolor_keeps_the_stored_values() {
        let mut e = engine();
        e.render(&view(), &mut NoProgress).unwrap();
        let values = e.iterations().to_vec();
        let table = duotone(Color::rgb(0, 0, 80), Color::rgb(255, 220, 0), 40, true).unwrap();
        e.recolor(table.clone(), ShapingMode::HalfSine, 3).unwrap();
        assert_eq!(e.iterations(), &values[..]);
        assert_eq!(e.coloring(), (&table[..], ShapingMode::HalfSine, 3));
        for (p, &v) in e.pixels().iter().zip(&values) {
            assert_eq!(*p, paint(e.bands(), v));
        }
    }
}
