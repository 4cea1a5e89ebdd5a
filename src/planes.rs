//! Contains the PlaneMapper struct, which describes a relationship
//! between a raster on the integral plane with an origin at its upper
//! left corner, and a window on the complex plane given by a center
//! and a zoom factor.
use num::Complex;

use crate::params::ViewParameters;

/// Describes the width and height of an integral plane that is assumed
/// to start at 0,0 and grow right and down.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel in the raster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of the raster to points of the complex plane.  At zoom
/// 1 the longer screen axis spans exactly 4 units, and pixels are
/// square.  Raster y grows downward while the imaginary axis grows
/// upward, so rows step *down* the imaginary axis.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The size of the raster.
    pub integral_plane: IntegralPlane,
    /// The complex coordinate of pixel 0,0.
    pub upper_left: Complex<f64>,
    // Complex units per pixel along x and along y.
    steps: (f64, f64),
    // Pre-mapped column and row coordinates.
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl PlaneMapper {
    /// Builds the mapping for an already validated view.
    pub fn new(view: &ViewParameters) -> PlaneMapper {
        let width = f64::from(view.width);
        let height = f64::from(view.height);
        let aspect = width / height;
        let zoom = view.zoom;
        let center = view.center;

        let (upper_left, steps) = if aspect >= 1.0 {
            (
                Complex::new(center.re - 2.0 / zoom, center.im + 2.0 / (zoom * aspect)),
                (4.0 / (width * zoom), 4.0 / (height * zoom * aspect)),
            )
        } else {
            (
                Complex::new(center.re - (2.0 * aspect) / zoom, center.im + 2.0 / zoom),
                (4.0 * aspect / (width * zoom), 4.0 / (height * zoom)),
            )
        };

        let xs = (0..view.width)
            .map(|x| upper_left.re + f64::from(x) * steps.0)
            .collect();
        let ys = (0..view.height)
            .map(|y| upper_left.im - f64::from(y) * steps.1)
            .collect();

        PlaneMapper {
            integral_plane: IntegralPlane(view.width as usize, view.height as usize),
            upper_left,
            steps,
            xs,
            ys,
        }
    }

    /// The total number of pixels in the raster.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Raster width in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Raster height in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// Complex units per pixel, along x and along y.
    pub fn steps(&self) -> (f64, f64) {
        self.steps
    }

    /// Given a pixel of the raster, the complex coordinate it samples.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(self.xs[pixel.0], self.ys[pixel.1])
    }

    /// Given a pixel, the linear offset from the root of the raster.
    #[inline]
    pub fn pixel_to_offset(&self, pixel: &Pixel) -> usize {
        pixel.1 * self.integral_plane.0 + pixel.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(width: u32, height: u32, center: Complex<f64>, zoom: f64) -> ViewParameters {
        ViewParameters {
            width,
            height,
            center,
            zoom,
            ..ViewParameters::default()
        }
    }

    #[test]
    fn square_raster_spans_four_units() {
        let pm = PlaneMapper::new(&view(4, 4, Complex::new(0.0, 0.0), 1.0));
        assert_eq!(pm.upper_left, Complex::new(-2.0, 2.0));
        assert_eq!(pm.steps(), (1.0, 1.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 1)), Complex::new(1.0, 1.0));
    }

    #[test]
    fn wide_raster_keeps_square_pixels() {
        let pm = PlaneMapper::new(&view(8, 4, Complex::new(0.0, 0.0), 1.0));
        assert_eq!(pm.upper_left, Complex::new(-2.0, 1.0));
        assert_eq!(pm.steps(), (0.5, 0.5));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 2)), Complex::new(0.0, 0.0));
    }

    #[test]
    fn tall_raster_spans_four_units_vertically() {
        let pm = PlaneMapper::new(&view(4, 8, Complex::new(1.0, -1.0), 1.0));
        assert_eq!(pm.upper_left, Complex::new(0.0, 1.0));
        assert_eq!(pm.steps(), (0.5, 0.5));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 7)), Complex::new(0.0, -2.5));
    }

    #[test]
    fn zoom_shrinks_the_window() {
        let pm = PlaneMapper::new(&view(4, 4, Complex::new(-1.0, 0.5), 4.0));
        assert_eq!(pm.upper_left, Complex::new(-1.5, 1.0));
        assert_eq!(pm.steps(), (0.25, 0.25));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(-1.0, 0.5));
    }

    #[test]
    fn offsets_are_row_major() {
        let pm = PlaneMapper::new(&view(5, 3, Complex::new(0.0, 0.0), 1.0));
        assert_eq!(pm.len(), 15);
        assert!(!pm.is_empty());
        assert_eq!(pm.pixel_to_offset(&Pixel(0, 0)), 0);
        assert_eq!(pm.pixel_to_offset(&Pixel(4, 0)), 4);
        assert_eq!(pm.pixel_to_offset(&Pixel(1, 2)), 11);
    }
}
