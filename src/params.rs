//! The description of a single view: where to look, how hard to look,
//! and how to color what comes back.  A `ViewParameters` is a plain
//! value owned by the caller; the renderer only ever reads it.

use std::fmt;
use std::str::FromStr;

use num::Complex;

use crate::error::{check_resources, FractalError, Result, MAX_POWER};
use crate::mixer::ShapingMode;

/// Which member of the family to draw.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Variant {
    /// c varies with the pixel, z starts at zero.
    Mandelbrot,
    /// c is this constant, z starts at the pixel.
    Julia(Complex<f64>),
}

/// How an escaped pixel chooses its band.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelScheme {
    /// The step on which the orbit escaped.
    Iteration,
    /// The final |z|², scaled against the largest escape magnitude.
    Magnitude,
    /// The cosine of the final z's angle.
    Cosine,
    /// The sine of the final z's angle.
    Sine,
    /// Magnitude, shifted by the angle band.
    MagnitudeShiftAngle,
    /// Iteration, shifted by the angle band.
    IterationShiftAngle,
    /// The final z's angle around the origin.
    Angle,
    /// Magnitude, shifted by the cosine band.
    MagnitudeShiftCosine,
    /// Magnitude, shifted by the sine band.
    MagnitudeShiftSine,
    /// Iteration, shifted by the cosine band.
    IterationShiftCosine,
    /// Iteration, shifted by the sine band.
    IterationShiftSine,
}

/// Every pixel scheme, in code order.
pub const PIXEL_SCHEMES: [PixelScheme; 11] = [
    PixelScheme::Iteration,
    PixelScheme::Magnitude,
    PixelScheme::Cosine,
    PixelScheme::Sine,
    PixelScheme::MagnitudeShiftAngle,
    PixelScheme::IterationShiftAngle,
    PixelScheme::Angle,
    PixelScheme::MagnitudeShiftCosine,
    PixelScheme::MagnitudeShiftSine,
    PixelScheme::IterationShiftCosine,
    PixelScheme::IterationShiftSine,
];

impl PixelScheme {
    /// Lowercase name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            PixelScheme::Iteration => "iteration",
            PixelScheme::Magnitude => "magnitude",
            PixelScheme::Cosine => "cosine",
            PixelScheme::Sine => "sine",
            PixelScheme::MagnitudeShiftAngle => "magnitude-angle",
            PixelScheme::IterationShiftAngle => "iteration-angle",
            PixelScheme::Angle => "angle",
            PixelScheme::MagnitudeShiftCosine => "magnitude-cosine",
            PixelScheme::MagnitudeShiftSine => "magnitude-sine",
            PixelScheme::IterationShiftCosine => "iteration-cosine",
            PixelScheme::IterationShiftSine => "iteration-sine",
        }
    }

    /// 1-based position in the list of schemes.
    pub fn code(self) -> u8 {
        PIXEL_SCHEMES.iter().position(|&s| s == self).unwrap_or(0) as u8 + 1
    }
}

impl fmt::Display for PixelScheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the name or the 1-based code.
impl FromStr for PixelScheme {
    type Err = FractalError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<usize>() {
            return code
                .checked_sub(1)
                .and_then(|i| PIXEL_SCHEMES.get(i))
                .cloned()
                .ok_or_else(|| FractalError::invalid(format!("pixel scheme must be 1-11, got {}", code)));
        }
        PIXEL_SCHEMES
            .iter()
            .cloned()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FractalError::invalid(format!("unknown pixel scheme: {}", s)))
    }
}

/// How a pixel that never escaped is painted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InnerScheme {
    /// Flat black; the stored value is the cap.
    Black,
    /// The angle band of the final z.
    Angle,
}

impl fmt::Display for InnerScheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            InnerScheme::Black => "black",
            InnerScheme::Angle => "angle",
        })
    }
}

impl FromStr for InnerScheme {
    type Err = FractalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" | "0" => Ok(InnerScheme::Black),
            "angle" | "1" => Ok(InnerScheme::Angle),
            _ => Err(FractalError::invalid(format!("unknown inner scheme: {}", s))),
        }
    }
}

/// A single view, fixed for the length of one render.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewParameters {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// The point of the complex plane at the middle of the raster.
    pub center: Complex<f64>,
    /// Magnification of the 4-unit reference square.  Must be > 0.
    pub zoom: f64,
    /// Exponent of z → z^power + c.  At least 2.
    pub power: u32,
    /// Mandelbrot, or Julia with its constant.
    pub variant: Variant,
    /// Steps an orbit may take before it counts as inside.
    pub iteration_cap: u32,
    /// Guess pixels whose neighbors agree instead of iterating them.
    pub speed_pass: bool,
    /// How escaped pixels pick a band.
    pub pixel_scheme: PixelScheme,
    /// How pixels inside the set are painted.
    pub inner_scheme: InnerScheme,
    /// Number of row bands rendered at once.  Never changes the result.
    pub threads: usize,
}

impl Default for ViewParameters {
    fn default() -> Self {
        ViewParameters {
            width: 512,
            height: 512,
            center: Complex::new(0.0, 0.0),
            zoom: 1.0,
            power: 2,
            variant: Variant::Mandelbrot,
            iteration_cap: 256,
            speed_pass: false,
            pixel_scheme: PixelScheme::Iteration,
            inner_scheme: InnerScheme::Black,
            threads: 1,
        }
    }
}

impl ViewParameters {
    /// Checks every field and the overall size of the render.  Nothing
    /// is allocated for a view that fails here.
    pub fn validate(&self) -> Result<()> {
        if self.width < 1 || self.height < 1 {
            return Err(FractalError::invalid(format!(
                "raster must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.zoom > 0.0) || !self.zoom.is_finite() {
            return Err(FractalError::invalid(format!("zoom must be positive, got {}", self.zoom)));
        }
        if self.power < 2 || self.power > MAX_POWER {
            return Err(FractalError::invalid(format!(
                "power must be between 2 and {}, got {}",
                MAX_POWER, self.power
            )));
        }
        if self.iteration_cap < 1 {
            return Err(FractalError::invalid("iteration cap must be at least 1"));
        }
        if self.threads < 1 {
            return Err(FractalError::invalid("thread count must be at least 1"));
        }
        if !self.center.re.is_finite() || !self.center.im.is_finite() {
            return Err(FractalError::invalid("center must be finite"));
        }
        check_resources(self.width, self.height, self.iteration_cap, self.power)
    }

    /// Pixels in the raster.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Never true for a validated view.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(2^power + 2)^2`, the largest squared magnitude an orbit can
    /// reach on the step it escapes.
    pub fn max_escape_magnitude(&self) -> f64 {
        let bound = 2f64.powi(self.power as i32) + 2.0;
        bound * bound
    }
}

const HEADER: &str = "FractView parameters:";

/// Everything the flat text parameter file holds: a view plus the
/// banding it was colored with.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamsRecord {
    /// The view itself.  `threads` is not part of the record.
    pub view: ViewParameters,
    /// Band shaping, stored as its numeric code.
    pub mode: ShapingMode,
    /// Palette repeats over the cap.
    pub repeats: u32,
}

impl Default for ParamsRecord {
    fn default() -> Self {
        ParamsRecord {
            view: ViewParameters::default(),
            mode: ShapingMode::Linear,
            repeats: 2,
        }
    }
}

/// One label line, then one value line, per field.
impl fmt::Display for ParamsRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let v = &self.view;
        let (is_mandelbrot, julia) = match v.variant {
            Variant::Mandelbrot => (true, Complex::new(0.0, 0.0)),
            Variant::Julia(k) => (false, k),
        };
        writeln!(f, "{}", HEADER)?;
        writeln!(f, "width:\n{}", v.width)?;
        writeln!(f, "height:\n{}", v.height)?;
        writeln!(f, "fx:\n{}", v.center.re)?;
        writeln!(f, "fy:\n{}", v.center.im)?;
        writeln!(f, "fz:\n{}", v.zoom)?;
        writeln!(f, "iterations:\n{}", v.iteration_cap)?;
        writeln!(f, "colorrepeats:\n{}", self.repeats)?;
        writeln!(f, "colormode:\n{}", self.mode.code())?;
        writeln!(f, "fpower:\n{}", v.power)?;
        writeln!(f, "ismandlebrot:\n{}", is_mandelbrot)?;
        writeln!(f, "juliaX:\n{}", julia.re)?;
        writeln!(f, "juliaY:\n{}", julia.im)?;
        writeln!(f, "speedpass:\n{}", v.speed_pass)?;
        writeln!(f, "pixelscheme:\n{}", v.pixel_scheme.code())?;
        writeln!(f, "innerscheme:\n{}", v.inner_scheme)
    }
}

fn field<T: FromStr>(label: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| FractalError::invalid(format!("bad value for {}: {:?}", label, value)))
}

/// Unknown labels are skipped; missing ones keep their defaults.  The
/// parsed view is not validated here.
impl FromStr for ParamsRecord {
    type Err = FractalError;

    fn from_str(s: &str) -> Result<Self> {
        let mut record = ParamsRecord::default();
        let mut is_mandelbrot = true;
        let mut julia = Complex::new(0.0, 0.0);

        let mut lines = s.lines().map(str::trim).filter(|l| !l.is_empty());
        match lines.next() {
            Some(first) if first.starts_with("FractView") && first.ends_with("parameters:") => (),
            _ => return Err(FractalError::invalid("not a FractView parameter record")),
        }

        while let Some(label) = lines.next() {
            let label = label.trim_end_matches(':');
            let value = lines
                .next()
                .ok_or_else(|| FractalError::invalid(format!("no value for {}", label)))?;
            let v = &mut record.view;
            match label {
                "width" => v.width = field(label, value)?,
                "height" => v.height = field(label, value)?,
                "fx" => v.center.re = field(label, value)?,
                "fy" => v.center.im = field(label, value)?,
                "fz" => v.zoom = field(label, value)?,
                "iterations" => v.iteration_cap = field(label, value)?,
                "colorrepeats" => record.repeats = field(label, value)?,
                "colormode" => record.mode = ShapingMode::from_code(field(label, value)?)?,
                "fpower" => v.power = field(label, value)?,
                "ismandlebrot" => is_mandelbrot = field(label, value)?,
                "juliaX" => julia.re = field(label, value)?,
                "juliaY" => julia.im = field(label, value)?,
                "speedpass" => v.speed_pass = field(label, value)?,
                "pixelscheme" => v.pixel_scheme = value.parse()?,
                "innerscheme" => v.inner_scheme = value.parse()?,
                _ => (),
            }
        }

        record.view.variant = if is_mandelbrot {
            Variant::Mandelbrot
        } else {
            Variant::Julia(julia)
        };
        Ok(record)
    }
}
