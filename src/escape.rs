// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-pixel work: run one orbit until it escapes or the cap
//! runs out, then turn what we learned about it into a band index.
//!
//! The band index is what the renderer stores for every pixel.  Any
//! value below the iteration cap names an entry of the premixed band
//! table; the cap itself means "inside the set, painted black."  That
//! is what lets a finished raster be recolored without iterating
//! again.

use std::f64::consts::PI;

use num::Complex;

use crate::color::Color;
use crate::params::{InnerScheme, PixelScheme, Variant, ViewParameters};

const ESCAPE_RADIUS_SQ: f64 = 4.0;
const TAU: f64 = 2.0 * PI;

/// Where an orbit ended up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Orbit {
    /// The step on which |z|² first exceeded 4, or the cap if it never
    /// did.
    pub iterations: u32,
    /// The value of z after that step.
    pub z: Complex<f64>,
}

/// Iterates z → z^power + c.  The power is taken by multiplying the
/// running value by the pre-step z, power − 1 times, rather than with
/// a closed form, so results match repeated squaring or cubing to the
/// last bit.  Escape is strict: |z|² of exactly 4 stays inside.
#[inline]
pub fn escape(start: Complex<f64>, c: Complex<f64>, power: u32, iteration_cap: u32) -> Orbit {
    let mut z = start;
    let mut i = 0;
    while i < iteration_cap {
        let orig = z;
        for _ in 1..power {
            z = z * orig;
        }
        z = z + c;
        if z.norm_sqr() > ESCAPE_RADIUS_SQ {
            break;
        }
        i += 1;
    }
    Orbit { iterations: i, z }
}

/// Everything about a view that decides how a pixel is iterated and
/// which band it lands in.  Built once per render.
#[derive(Clone, Debug)]
pub struct PixelColorer {
    variant: Variant,
    power: u32,
    iteration_cap: u32,
    max_escape: f64,
    pixel_scheme: PixelScheme,
    inner_scheme: InnerScheme,
}

impl PixelColorer {
    /// Captures the variant, power, cap and schemes of `view`.
    pub fn new(view: &ViewParameters) -> Self {
        PixelColorer {
            variant: view.variant,
            power: view.power,
            iteration_cap: view.iteration_cap,
            max_escape: view.max_escape_magnitude(),
            pixel_scheme: view.pixel_scheme,
            inner_scheme: view.inner_scheme,
        }
    }

    /// Runs the orbit for the pixel at `point`.
    #[inline]
    pub fn orbit(&self, point: Complex<f64>) -> Orbit {
        match self.variant {
            Variant::Mandelbrot => escape(Complex::new(0.0, 0.0), point, self.power, self.iteration_cap),
            Variant::Julia(k) => escape(point, k, self.power, self.iteration_cap),
        }
    }

    /// Iterates `point` and returns the value to store for it.
    #[inline]
    pub fn band(&self, point: Complex<f64>) -> u32 {
        let orbit = self.orbit(point);
        self.classify(point, &orbit)
    }

    /// The stored value for a finished orbit: a band index below the
    /// cap, or the cap itself for a flat black interior pixel.
    pub fn classify(&self, point: Complex<f64>, orbit: &Orbit) -> u32 {
        let cap = self.iteration_cap;
        if orbit.iterations >= cap {
            return match self.inner_scheme {
                InnerScheme::Black => cap,
                InnerScheme::Angle => self.scaled(angle(orbit.z) / TAU),
            };
        }

        let i = orbit.iterations;
        let z = orbit.z;
        let band = match self.pixel_scheme {
            PixelScheme::Iteration => i,
            PixelScheme::Magnitude => self.magnitude(point, z),
            PixelScheme::Cosine => self.scaled((cosine(z) + 1.0) / 2.0),
            PixelScheme::Sine => self.scaled((sine(z) + 1.0) / 2.0),
            PixelScheme::MagnitudeShiftAngle => {
                self.shift(self.magnitude(point, z), self.scaled(angle(z) / TAU))
            }
            PixelScheme::IterationShiftAngle => self.shift(i, self.scaled(angle(z) / TAU)),
            PixelScheme::Angle => self.scaled(angle(z) / TAU),
            PixelScheme::MagnitudeShiftCosine => {
                self.shift(self.magnitude(point, z), self.scaled((cosine(z) + 1.0) / 2.0))
            }
            PixelScheme::MagnitudeShiftSine => {
                self.shift(self.magnitude(point, z), self.scaled((sine(z) + 1.0) / 2.0))
            }
            PixelScheme::IterationShiftCosine => self.shift(i, self.scaled((cosine(z) + 1.0) / 2.0)),
            PixelScheme::IterationShiftSine => self.shift(i, self.scaled((sine(z) + 1.0) / 2.0)),
        };
        band.min(cap - 1)
    }

    /// floor(fraction × (cap − 1)), for a fraction in [0, 1].
    #[inline]
    fn scaled(&self, fraction: f64) -> u32 {
        let top = self.iteration_cap - 1;
        ((fraction * f64::from(top)) as u32).min(top)
    }

    // A pixel that started outside the radius-2 circle is pinned to
    // the largest magnitude band.
    #[inline]
    fn magnitude(&self, point: Complex<f64>, z: Complex<f64>) -> u32 {
        let norm = if point.norm_sqr() > ESCAPE_RADIUS_SQ {
            self.max_escape
        } else {
            z.norm_sqr()
        };
        self.scaled(norm / self.max_escape)
    }

    /// Adds two bands, wrapping a sum past the top band back down by
    /// cap − 1.
    #[inline]
    fn shift(&self, band: u32, by: u32) -> u32 {
        let top = self.iteration_cap - 1;
        let sum = band + by;
        if sum > top {
            sum - top
        } else {
            sum
        }
    }
}

/// The color a stored value paints.
#[inline]
pub fn paint(bands: &[Color], value: u32) -> Color {
    match bands.get(value as usize) {
        Some(&color) => color,
        None => Color::BLACK,
    }
}

#[inline]
fn cosine(z: Complex<f64>) -> f64 {
    let radius = z.norm_sqr().sqrt();
    if radius == 0.0 {
        0.0
    } else {
        (z.re / radius).max(-1.0).min(1.0)
    }
}

#[inline]
fn sine(z: Complex<f64>) -> f64 {
    let radius = z.norm_sqr().sqrt();
    if radius == 0.0 {
        0.0
    } else {
        (z.im / radius).max(-1.0).min(1.0)
    }
}

/// The angle of z in [0, 2π), measured as acos(x / r) and reflected
/// when y is negative.
#[inline]
fn angle(z: Complex<f64>) -> f64 {
    let theta = cosine(z).acos();
    if z.im < 0.0 {
        TAU - theta
    } else {
        theta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colorer(scheme: PixelScheme, inner: InnerScheme, cap: u32) -> PixelColorer {
        PixelColorer::new(&ViewParameters {
            iteration_cap: cap,
            pixel_scheme: scheme,
            inner_scheme: inner,
            ..ViewParameters::default()
        })
    }

    #[test]
    fn origin_never_escapes() {
        for power in 2..8 {
            for &cap in &[1, 10, 256, 5000] {
                let orbit = escape(Complex::new(0.0, 0.0), Complex::new(0.0, 0.0), power, cap);
                assert_eq!(orbit.iterations, cap);
            }
        }
    }

    #[test]
    fn a_squared_magnitude_of_exactly_four_stays_inside() {
        // c = -2 lands on -2, then 2, then 2 forever: |z|² is always 4
        let orbit = escape(Complex::new(0.0, 0.0), Complex::new(-2.0, 0.0), 2, 100);
        assert_eq!(orbit.iterations, 100);
        assert_eq!(orbit.z, Complex::new(2.0, 0.0));

        // c = 2 reaches |z|² = 4 on step 0 and escapes on step 1
        let orbit = escape(Complex::new(0.0, 0.0), Complex::new(2.0, 0.0), 2, 100);
        assert_eq!(orbit.iterations, 1);
    }

    #[test]
    fn a_squared_magnitude_of_five_escapes_on_that_step() {
        let orbit = escape(Complex::new(0.0, 0.0), Complex::new(1.0, 2.0), 2, 100);
        assert_eq!(orbit.iterations, 0);
        assert_eq!(orbit.z.norm_sqr(), 5.0);
    }

    #[test]
    fn repeated_multiplication_matches_explicit_cubing() {
        let z0 = Complex::new(0.3, -0.2);
        let c = Complex::new(-0.1, 0.65);
        let orbit = escape(z0, c, 3, 1);
        assert_eq!(orbit.z, z0 * z0 * z0 + c);
    }

    #[test]
    fn julia_starts_from_the_pixel() {
        let view = ViewParameters {
            variant: Variant::Julia(Complex::new(2.0, 0.0)),
            ..ViewParameters::default()
        };
        let pc = PixelColorer::new(&view);
        assert_eq!(pc.orbit(Complex::new(0.0, 0.0)).iterations, 1);
        assert_eq!(pc.orbit(Complex::new(3.0, 0.0)).iterations, 0);
    }

    #[test]
    fn iteration_scheme_stores_the_escape_step() {
        let pc = colorer(PixelScheme::Iteration, InnerScheme::Black, 100);
        assert_eq!(pc.band(Complex::new(2.0, 0.0)), 1);
        assert_eq!(pc.band(Complex::new(1.0, 2.0)), 0);
        assert_eq!(pc.band(Complex::new(0.0, 0.0)), 100);
    }

    #[test]
    fn magnitude_pins_points_outside_the_circle() {
        let pc = colorer(PixelScheme::Magnitude, InnerScheme::Black, 101);
        assert_eq!(pc.band(Complex::new(3.0, 0.0)), 100);
        assert_eq!(pc.band(Complex::new(1.0, 2.0)), 100);
        // 1.5 → 3.75 escapes with |z|² = 14.0625 out of 36
        assert_eq!(pc.band(Complex::new(1.5, 0.0)), 39);
    }

    #[test]
    fn trig_schemes_follow_the_final_z() {
        let cap = 103;
        let orbit = Orbit {
            iterations: 3,
            z: Complex::new(0.0, 3.0),
        };
        let point = Complex::new(0.5, 0.5);
        assert_eq!(colorer(PixelScheme::Cosine, InnerScheme::Black, cap).classify(point, &orbit), 51);
        assert_eq!(colorer(PixelScheme::Sine, InnerScheme::Black, cap).classify(point, &orbit), 102);
        // straight up is a quarter turn
        assert_eq!(colorer(PixelScheme::Angle, InnerScheme::Black, cap).classify(point, &orbit), 25);
        assert_eq!(
            colorer(PixelScheme::IterationShiftAngle, InnerScheme::Black, cap).classify(point, &orbit),
            28
        );
    }

    #[test]
    fn angles_below_the_axis_wrap_past_a_half_turn() {
        assert!((angle(Complex::new(0.0, -1.0)) - 1.5 * PI).abs() < 1e-12);
        assert!((angle(Complex::new(-1.0, 0.0)) - PI).abs() < 1e-12);
        assert!((angle(Complex::new(0.0, 0.0)) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn shifted_bands_wrap_by_cap_minus_one() {
        let pc = colorer(PixelScheme::IterationShiftSine, InnerScheme::Black, 11);
        assert_eq!(pc.shift(4, 5), 9);
        assert_eq!(pc.shift(10, 0), 10);
        assert_eq!(pc.shift(10, 1), 1);
        assert_eq!(pc.shift(10, 10), 10);
        // sine of straight up is 1: band 10, shifted by iteration 7
        let orbit = Orbit {
            iterations: 7,
            z: Complex::new(0.0, 5.0),
        };
        assert_eq!(pc.classify(Complex::new(0.0, 0.0), &orbit), 7);
    }

    #[test]
    fn inner_schemes() {
        let inside = Orbit {
            iterations: 50,
            z: Complex::new(-1.0, 0.0),
        };
        let p = Complex::new(0.0, 0.0);
        assert_eq!(colorer(PixelScheme::Iteration, InnerScheme::Black, 50).classify(p, &inside), 50);
        assert_eq!(colorer(PixelScheme::Iteration, InnerScheme::Angle, 50).classify(p, &inside), 24);
    }

    #[test]
    fn every_band_fits_the_table() {
        for &scheme in crate::params::PIXEL_SCHEMES.iter() {
            for &cap in &[1, 2, 7, 64] {
                let pc = colorer(scheme, InnerScheme::Angle, cap);
                for k in 0..200 {
                    let t = f64::from(k) * 0.173;
                    let point = Complex::new(2.5 * t.cos() * (t / 30.0), 2.5 * t.sin() * (t / 30.0));
                    assert!(pc.band(point) < cap, "{:?} cap {} overflowed", scheme, cap);
                }
            }
        }
    }

    #[test]
    fn paint_maps_the_cap_to_black() {
        let bands = vec![Color::WHITE, Color::rgb(1, 2, 3)];
        assert_eq!(paint(&bands, 1), Color::rgb(1, 2, 3));
        assert_eq!(paint(&bands, 2), Color::BLACK);
    }
}
