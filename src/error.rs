//! The failure taxonomy shared by every part of the renderer.  Every
//! fallible operation returns a [`Result`], and nothing in the core
//! swallows or coerces a bad input.

use failure::Fail;

/// The largest raster, in pixels, the engine will allocate.
pub const MAX_PIXELS: usize = 1 << 26;

/// The largest iteration cap the engine will accept.
pub const MAX_ITERATION_CAP: u32 = 1 << 24;

/// The largest exponent the escape loop will raise z to.
pub const MAX_POWER: u32 = 1 << 10;

/// Upper bound on pixels × iteration cap × power, the worst-case count
/// of complex multiplications for one render.
pub const MAX_WORK: u64 = 1 << 40;

/// Everything that can go wrong between a gradient and a raster.
#[derive(Debug, Fail)]
pub enum FractalError {
    /// A caller-supplied value is out of its legal range.
    #[fail(display = "invalid parameter: {}", _0)]
    InvalidParameter(String),

    /// The requested render would need more memory or time than we
    /// are willing to commit to.
    #[fail(
        display = "render of {} pixels at {} iterations exceeds resource limits",
        pixels, iteration_cap
    )]
    ResourceLimit {
        /// width × height of the refused render
        pixels: u64,
        /// iteration cap of the refused render
        iteration_cap: u32,
    },

    /// The progress sink asked for the render to stop.
    #[fail(display = "render cancelled")]
    Cancelled,

    /// Reading or writing a parameter record or an image failed.
    #[fail(display = "i/o error: {}", _0)]
    Io(#[cause] std::io::Error),

    /// The image encoder refused the raster.
    #[fail(display = "image error: {}", _0)]
    Image(#[cause] image::ImageError),
}

impl FractalError {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        FractalError::InvalidParameter(msg.into())
    }
}

impl From<std::io::Error> for FractalError {
    fn from(err: std::io::Error) -> Self {
        FractalError::Io(err)
    }
}

impl From<image::ImageError> for FractalError {
    fn from(err: image::ImageError) -> Self {
        FractalError::Image(err)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FractalError>;

/// Refuses renders whose buffers or escape loop would be unreasonably
/// large.  Called after the individual parameters have been validated,
/// and before anything is allocated.
pub fn check_resources(width: u32, height: u32, iteration_cap: u32, power: u32) -> Result<()> {
    let pixels = u64::from(width) * u64::from(height);
    let work = u128::from(pixels) * u128::from(iteration_cap) * u128::from(power);
    if pixels > MAX_PIXELS as u64
        || iteration_cap > MAX_ITERATION_CAP
        || work > u128::from(MAX_WORK)
    {
        return Err(FractalError::ResourceLimit {
            pixels,
            iteration_cap,
        });
    }
    Ok(())
}
