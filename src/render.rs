// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning a view and a band table into a raster.
//!
//! `render` is a pure function: the same view and band table always
//! produce the same buffers, bit for bit, whatever the thread count.
//! Every pixel's stored value is worked out first; the raster is then
//! painted from those values in one sweep, which is exactly what a
//! later recolor does, so recoloring can never drift from a fresh
//! render.
//!
//! The speed pass is a two-pass guess.  Pass one iterates a
//! checkerboard, the pixels where x + y is even.  Pass two visits the
//! rest: a pixel whose four direct neighbors (all from pass one)
//! agree copies them; anything else, and every pixel on the outer
//! border, is iterated in full.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use itertools::Itertools;
use log::{debug, info, trace};

use crate::color::Color;
use crate::error::{FractalError, Result};
use crate::escape::{paint, PixelColorer};
use crate::params::ViewParameters;
use crate::planes::{Pixel, PlaneMapper};
use crate::progress::{row_percent, ProgressSink};

/// The buffers of a finished render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    /// Raster width in pixels.
    pub width: usize,
    /// Raster height in pixels.
    pub height: usize,
    /// Row-major colors, `width * height` of them.
    pub pixels: Vec<Color>,
    /// Row-major stored values, parallel to `pixels`.
    pub iterations: Vec<u32>,
}

/// Renders `view` using `bands`, which must hold exactly one color
/// per iteration step.
pub fn render(
    view: &ViewParameters,
    bands: &[Color],
    progress: &mut dyn ProgressSink,
) -> Result<RenderResult> {
    view.validate()?;
    if bands.len() != view.iteration_cap as usize {
        return Err(FractalError::invalid(format!(
            "band table has {} entries for an iteration cap of {}",
            bands.len(),
            view.iteration_cap
        )));
    }

    let started = Instant::now();
    let width = view.width as usize;
    let height = view.height as usize;
    debug!(
        "rendering {}x{} at zoom {} around {}, power {}, cap {}, escape magnitude {}, {} thread(s)",
        width,
        height,
        view.zoom,
        view.center,
        view.power,
        view.iteration_cap,
        view.max_escape_magnitude(),
        view.threads
    );

    let (values, iterated) = stored_values(view, progress)?;
    trace!("iterated {} of {} pixels", iterated, values.len());

    let pixels = values.iter().map(|&v| paint(bands, v)).collect();
    progress.on_complete();
    info!(
        "rendered {}x{} in {:.3}s",
        width,
        height,
        started.elapsed().as_secs_f64()
    );

    Ok(RenderResult {
        width,
        height,
        pixels,
        iterations: values,
    })
}

/// Works out every pixel's stored value, and how many pixels were
/// iterated rather than copied from their neighbors.
fn stored_values(view: &ViewParameters, progress: &mut dyn ProgressSink) -> Result<(Vec<u32>, usize)> {
    let plane = PlaneMapper::new(view);
    let colorer = PixelColorer::new(view);
    let width = plane.width();
    let height = plane.height();
    let mut values = vec![0u32; plane.len()];

    if !view.speed_pass {
        let iterated = sweep(&mut values, width, view.threads, progress, (0, 100), |y, line| {
            for (x, value) in line.iter_mut().enumerate() {
                *value = colorer.band(plane.pixel_to_point(&Pixel(x, y)));
            }
            width
        })?;
        return Ok((values, iterated));
    }

    let first = sweep(&mut values, width, view.threads, progress, (0, 50), |y, line| {
        let mut count = 0;
        for x in (y % 2..width).step_by(2) {
            line[x] = colorer.band(plane.pixel_to_point(&Pixel(x, y)));
            count += 1;
        }
        count
    })?;
    trace!("speed pass one iterated {} pixels", first);

    let pass_one = values.clone();
    let second = sweep(&mut values, width, view.threads, progress, (50, 100), |y, line| {
        let mut count = 0;
        for x in ((y + 1) % 2..width).step_by(2) {
            if 0 < x && x + 1 < width && 0 < y && y + 1 < height {
                let offset = plane.pixel_to_offset(&Pixel(x, y));
                let neighbors = [
                    pass_one[offset + 1],
                    pass_one[offset - 1],
                    pass_one[offset - width],
                    pass_one[offset + width],
                ];
                if neighbors.iter().all_equal() {
                    line[x] = neighbors[0];
                    continue;
                }
            }
            line[x] = colorer.band(plane.pixel_to_point(&Pixel(x, y)));
            count += 1;
        }
        count
    })?;
    trace!(
        "speed pass two iterated {} of {} pixels",
        second,
        plane.len() - pass_one_len(width, height)
    );
    Ok((values, first + second))
}

// Pixels on the even checkerboard.
fn pass_one_len(width: usize, height: usize) -> usize {
    (width * height + 1) / 2
}

/// Runs `row` over every row of `values`, in row bands across
/// `threads` workers, reporting each finished row into the `span`
/// slice of the progress bar and stopping between rows when the sink
/// asks.  `row` returns the number of pixels it iterated; the sum is
/// returned.
fn sweep<F>(
    values: &mut [u32],
    width: usize,
    threads: usize,
    progress: &mut dyn ProgressSink,
    span: (u8, u8),
    row: F,
) -> Result<usize>
where
    F: Fn(usize, &mut [u32]) -> usize + Sync,
{
    let height = values.len() / width;
    if progress.is_cancelled() {
        return Err(FractalError::Cancelled);
    }

    if threads <= 1 || height < 2 {
        let mut iterated = 0;
        for (y, line) in values.chunks_mut(width).enumerate() {
            iterated += row(y, line);
            progress.on_progress(row_percent(y + 1, height, span.0, span.1));
            if progress.is_cancelled() {
                return Err(FractalError::Cancelled);
            }
        }
        return Ok(iterated);
    }

    // never more workers than rows
    let workers = threads.min(height);
    let rows_per_band = (height + workers - 1) / workers;
    let stop = AtomicBool::new(false);
    let (tx, rx) = crossbeam::channel::unbounded::<usize>();
    let mut cancelled = false;
    let mut iterated = 0;

    crossbeam::scope(|spawner| {
        let row = &row;
        let stop = &stop;
        for (band, chunk) in values.chunks_mut(rows_per_band * width).enumerate() {
            let tx = tx.clone();
            spawner.spawn(move |_| {
                for (k, line) in chunk.chunks_mut(width).enumerate() {
                    if stop.load(Ordering::Relaxed) {
                        break;
                    }
                    let count = row(band * rows_per_band + k, line);
                    if tx.send(count).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut done = 0;
        for count in rx.iter() {
            done += 1;
            iterated += count;
            progress.on_progress(row_percent(done, height, span.0, span.1));
            if progress.is_cancelled() {
                stop.store(true, Ordering::Relaxed);
                cancelled = true;
                break;
            }
        }
    })
    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

    if cancelled {
        return Err(FractalError::Cancelled);
    }
    Ok(iterated)
}
