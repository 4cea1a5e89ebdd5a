#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal renderer
//!
//! The Mandelbrot set, and its Julia cousins, are drawn by taking a
//! point on the complex plane, repeatedly raising a running value to
//! some power and adding a constant, and counting how long it takes
//! that value to run away past a radius of 2.  Points that never run
//! away are "inside" and painted black; the rest are painted by how,
//! and how quickly, they escaped.
//!
//! This crate is built so that the expensive part, the counting, is
//! done once per view.  Colors come from a raw table (a fixed palette
//! or a user-built gradient) that is premixed into a band table with
//! one entry per iteration step; every pixel stores the band it landed
//! in, so a finished raster can be recolored or color-cycled without
//! iterating a single orbit again.
//!
//! The flow is:
//!
//! * [`gradient`] and [`registry`] make raw color tables,
//! * [`mixer`] premixes one into a band table,
//! * [`render`] iterates a [`ViewParameters`] into a raster, and
//! * [`FractalEngine`] holds the result for recoloring and cycling.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate log;
extern crate num;

pub mod color;
pub mod engine;
pub mod error;
pub mod escape;
pub mod gradient;
pub mod mixer;
pub mod params;
pub mod planes;
pub mod progress;
pub mod registry;
pub mod render;

pub use color::Color;
pub use engine::{CycleDirection, FractalEngine};
pub use error::{FractalError, Result};
pub use gradient::{duotone, fixed_palette, multi_stop, ColorTable, FixedPalette, GradientSource};
pub use mixer::{mix, ShapingMode};
pub use params::{InnerScheme, ParamsRecord, PixelScheme, Variant, ViewParameters};
pub use progress::{CancelFlag, LogProgress, NoProgress, ProgressSink};
pub use registry::PaletteRegistry;
pub use render::{render, RenderResult};
