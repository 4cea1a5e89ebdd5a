extern crate clap;
extern crate env_logger;
extern crate fractview;
extern crate image;
extern crate log;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ColorType, RgbImage};
use log::{debug, info};
use num::Complex;
use std::fs::{self, File};
use std::path::Path;
use std::str::FromStr;

use fractview::color::to_rgb_bytes;
use fractview::{
    Color, CycleDirection, FixedPalette, FractalEngine, FractalError, GradientSource, InnerScheme,
    LogProgress, PaletteRegistry, ParamsRecord, PixelScheme, ShapingMode, Variant,
};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

// "from,to,steps", colors as #rrggbb
fn parse_duotone(s: &str) -> Option<(Color, Color, usize)> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    match (
        Color::from_str(parts[0]),
        Color::from_str(parts[1]),
        usize::from_str(parts[2]),
    ) {
        (Ok(from), Ok(to), Ok(steps)) => Some((from, to, steps)),
        _ => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_parse<T>(s: &str) -> Result<(), String>
where
    T: FromStr<Err = FractalError>,
{
    T::from_str(s).map(|_| ()).map_err(|e| e.to_string())
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const ZOOM: &str = "zoom";
const POWER: &str = "power";
const JULIA: &str = "julia";
const ITERATIONS: &str = "iterations";
const PALETTE: &str = "palette";
const DUOTONE: &str = "duotone";
const MIRROR: &str = "mirror";
const MODE: &str = "mode";
const REPEATS: &str = "repeats";
const SCHEME: &str = "scheme";
const INNER: &str = "inner";
const SPEED: &str = "speed";
const THREADS: &str = "threads";
const CYCLE: &str = "cycle";
const PARAMS: &str = "params";
const SAVE_PARAMS: &str = "save-params";
const LIST_PALETTES: &str = "list-palettes";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("fractview")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Escape-time Mandelbrot and Julia renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required_unless(LIST_PALETTES)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; .png, or .ppm/.pnm for a binary pixmap"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("512x512")
                .validator(|s| validate_pair::<u32>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Point of the complex plane at the middle of the image"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse zoom",
                        "Zoom must be positive",
                    )
                })
                .help("Magnification; 1 shows a 4-unit square"),
        )
        .arg(
            Arg::with_name(POWER)
                .long(POWER)
                .short("p")
                .takes_value(true)
                .default_value("2")
                .validator(|s| {
                    validate_range(
                        &s,
                        2,
                        64,
                        "Could not parse power",
                        "Power must be between 2 and 64",
                    )
                })
                .help("Exponent of the iterated polynomial"),
        )
        .arg(
            Arg::with_name(JULIA)
                .long(JULIA)
                .short("j")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse Julia constant"))
                .help("Render the Julia set for this constant instead of the Mandelbrot set"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("256")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        fractview::error::MAX_ITERATION_CAP,
                        "Could not parse iteration count",
                        &format!(
                            "Iteration count must be between 1 and {}",
                            fractview::error::MAX_ITERATION_CAP
                        ),
                    )
                })
                .help("Iteration cap"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .takes_value(true)
                .default_value("rainbow")
                .help("rainbow, gray1, gray2, or a registry index"),
        )
        .arg(
            Arg::with_name(DUOTONE)
                .long(DUOTONE)
                .takes_value(true)
                .validator(|s| match parse_duotone(&s) {
                    Some(_) => Ok(()),
                    None => Err("Duotone must look like #rrggbb,#rrggbb,steps".to_string()),
                })
                .help("Two-color gradient, used instead of --palette"),
        )
        .arg(
            Arg::with_name(MIRROR)
                .long(MIRROR)
                .help("Mirror the duotone gradient back to its first color"),
        )
        .arg(
            Arg::with_name(MODE)
                .long(MODE)
                .takes_value(true)
                .default_value("linear")
                .validator(|s| validate_parse::<ShapingMode>(&s))
                .help("Band shaping, 1 to 8 or by name"),
        )
        .arg(
            Arg::with_name(REPEATS)
                .long(REPEATS)
                .short("r")
                .takes_value(true)
                .default_value("2")
                .validator(|s| {
                    validate_range(
                        &s,
                        1u32,
                        65_536,
                        "Could not parse repeat count",
                        "Repeat count must be between 1 and 65536",
                    )
                })
                .help("How many times the palette repeats over the iteration cap"),
        )
        .arg(
            Arg::with_name(SCHEME)
                .long(SCHEME)
                .takes_value(true)
                .default_value("iteration")
                .validator(|s| validate_parse::<PixelScheme>(&s))
                .help("Pixel coloring scheme, 1 to 11 or by name"),
        )
        .arg(
            Arg::with_name(INNER)
                .long(INNER)
                .takes_value(true)
                .default_value("black")
                .validator(|s| validate_parse::<InnerScheme>(&s))
                .help("Coloring of points that never escape: black or angle"),
        )
        .arg(
            Arg::with_name(SPEED)
                .long(SPEED)
                .help("Guess pixels whose neighbors agree instead of iterating them"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(CYCLE)
                .long(CYCLE)
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| match i64::from_str(&s) {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Could not parse cycle shift".to_string()),
                })
                .help("Rotate the colors by this many bands after rendering"),
        )
        .arg(
            Arg::with_name(PARAMS)
                .long(PARAMS)
                .takes_value(true)
                .help("Load the view and banding from a saved parameter file"),
        )
        .arg(
            Arg::with_name(SAVE_PARAMS)
                .long(SAVE_PARAMS)
                .takes_value(true)
                .help("Write the parameters of this render to a file"),
        )
        .arg(
            Arg::with_name(LIST_PALETTES)
                .long(LIST_PALETTES)
                .help("List the built-in palettes and exit"),
        )
        .get_matches()
}

// The command line as a parameter record.  Values are already checked
// by the validators.
fn record_from_args(matches: &ArgMatches) -> ParamsRecord {
    let mut record = ParamsRecord::default();
    let view = &mut record.view;
    let (width, height) = parse_pair(matches.value_of(SIZE).unwrap(), 'x').unwrap();
    view.width = width;
    view.height = height;
    view.center = parse_complex(matches.value_of(CENTER).unwrap()).unwrap();
    view.zoom = f64::from_str(matches.value_of(ZOOM).unwrap()).unwrap();
    view.power = u32::from_str(matches.value_of(POWER).unwrap()).unwrap();
    view.iteration_cap = u32::from_str(matches.value_of(ITERATIONS).unwrap()).unwrap();
    view.pixel_scheme = matches.value_of(SCHEME).unwrap().parse().unwrap();
    view.inner_scheme = matches.value_of(INNER).unwrap().parse().unwrap();
    view.speed_pass = matches.is_present(SPEED);
    if let Some(k) = matches.value_of(JULIA) {
        view.variant = Variant::Julia(parse_complex(k).unwrap());
    }
    record.mode = matches.value_of(MODE).unwrap().parse().unwrap();
    record.repeats = u32::from_str(matches.value_of(REPEATS).unwrap()).unwrap();
    record
}

fn color_table(
    matches: &ArgMatches,
    registry: &mut PaletteRegistry,
) -> fractview::Result<fractview::ColorTable> {
    if let Some(arg) = matches.value_of(DUOTONE) {
        let (from, to, steps) = parse_duotone(arg)
            .ok_or_else(|| FractalError::InvalidParameter(format!("bad duotone: {}", arg)))?;
        let index = registry.append(GradientSource::Duotone {
            name: arg.to_string(),
            from,
            to,
            steps,
            mirror: matches.is_present(MIRROR),
        })?;
        return registry.get(index);
    }

    let palette = matches.value_of(PALETTE).unwrap();
    let index = match usize::from_str(palette) {
        Ok(index) => index,
        Err(_) => match FixedPalette::from_str(palette)? {
            FixedPalette::Rainbow => 0,
            FixedPalette::GrayscaleOne => 1,
            FixedPalette::GrayscaleTwo => 2,
        },
    };
    registry.get(index)
}

fn write_image(outfile: &str, pixels: &[Color], bounds: (u32, u32)) -> fractview::Result<()> {
    let path = Path::new(outfile);
    let bytes = to_rgb_bytes(pixels);
    let is_pnm = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.eq_ignore_ascii_case("ppm") || ext.eq_ignore_ascii_case("pnm"),
        None => false,
    };
    if is_pnm {
        let output = File::create(&path)?;
        let mut encoder =
            PnmEncoder::new(output).with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary));
        encoder.encode(&bytes[..], bounds.0, bounds.1, ColorType::Rgb8)?;
        return Ok(());
    }
    let buffer = RgbImage::from_raw(bounds.0, bounds.1, bytes).ok_or_else(|| {
        FractalError::InvalidParameter("raster does not match its dimensions".to_string())
    })?;
    buffer.save(&path)?;
    Ok(())
}

fn run(matches: &ArgMatches) -> fractview::Result<()> {
    let mut registry = PaletteRegistry::new();
    if matches.is_present(LIST_PALETTES) {
        for line in registry.describe_all() {
            println!("{}", line);
        }
        return Ok(());
    }

    let mut record = match matches.value_of(PARAMS) {
        Some(file) => {
            debug!("loading parameters from {}", file);
            fs::read_to_string(file)?.parse::<ParamsRecord>()?
        }
        None => record_from_args(matches),
    };
    record.view.threads = usize::from_str(matches.value_of(THREADS).unwrap()).unwrap();

    let table = color_table(matches, &mut registry)?;
    let mut engine = FractalEngine::new(table, record.mode, record.repeats)?;
    engine.render(&record.view, &mut LogProgress::default())?;

    if let Some(shift) = matches.value_of(CYCLE) {
        let shift = i64::from_str(shift).unwrap();
        let direction = if shift < 0 {
            CycleDirection::Down
        } else {
            CycleDirection::Up
        };
        engine.cycle_colors(shift.unsigned_abs() as usize, direction)?;
    }

    let output = matches.value_of(OUTPUT).unwrap();
    write_image(output, engine.pixels(), (record.view.width, record.view.height))?;
    info!("wrote {}", output);

    if let Some(file) = matches.value_of(SAVE_PARAMS) {
        fs::write(file, record.to_string())?;
        info!("saved parameters to {}", file);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
