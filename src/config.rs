//! Everything a render needs to know before it starts, and the
//! command line that fills it in.

use crate::color::Palette;
use crate::error::{RenderError, Result};
use crate::geometry::{make_rect, Bound, Point, Rect, RectSize};
use clap::{App, Arg, ArgMatches};
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

/// Image width when none is given.
pub const DEFAULT_WIDTH: u32 = 1024;
/// Image height when none is given.
pub const DEFAULT_HEIGHT: u32 = 768;
/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 65_536;
/// Largest accepted process group.
pub const MAX_WORKERS: usize = 256;
/// Output file when none is given.
pub const DEFAULT_OUTPUT: &str = "test.png";

const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const WORKERS: &str = "workers";
const CENTER: &str = "center";
const EXTENT: &str = "extent";
const PALETTE: &str = "palette";
const OUTPUT: &str = "output";

/// Given a string and a separator, returns the two values
/// separated by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> std::result::Result<(), String> {
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
) -> std::result::Result<(), String> {
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

fn validate_extent(s: &str) -> std::result::Result<(), String> {
    match parse_pair::<f64>(s, ',') {
        Some((w, h)) if w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite() => Ok(()),
        Some(_) => Err("Region extent must be positive in both directions".to_string()),
        None => Err("Could not parse region extent".to_string()),
    }
}

/// The parameters of one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Size of the whole image in pixels.
    pub bound: Bound,
    /// The region of the plane the whole image depicts.
    pub region: Rect,
    /// Size of the process group, coordinator included.
    pub workers: usize,
    /// How escape counts become colors.
    pub palette: Palette,
    /// Where the image sink writes.
    pub output: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            bound: Bound::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            region: default_region(),
            workers: default_workers(),
            palette: Palette::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// The plane region rendered when none is given: the square of side 2
/// centered on the origin.
pub fn default_region() -> Rect {
    make_rect(Point::new(0.0, 0.0), RectSize::new(2.0, 2.0))
}

impl RenderConfig {
    /// The command-line interface.
    pub fn app<'a, 'b>() -> App<'a, 'b> {
        App::new("mandelband")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Banded Mandelbrot renderer")
            .arg(
                Arg::with_name(WIDTH)
                    .long(WIDTH)
                    .short("w")
                    .takes_value(true)
                    .validator(|s| {
                        validate_range(
                            &s,
                            0,
                            MAX_DIMENSION,
                            "Could not parse image width",
                            &format!("Image width must be between 0 and {}", MAX_DIMENSION),
                        )
                    })
                    .help("Image width in pixels; 0 selects 1024"),
            )
            .arg(
                Arg::with_name(HEIGHT)
                    .long(HEIGHT)
                    .short("t")
                    .takes_value(true)
                    .validator(|s| {
                        validate_range(
                            &s,
                            0,
                            MAX_DIMENSION,
                            "Could not parse image height",
                            &format!("Image height must be between 0 and {}", MAX_DIMENSION),
                        )
                    })
                    .help("Image height in pixels; 0 selects 768"),
            )
            .arg(
                Arg::with_name(WORKERS)
                    .long(WORKERS)
                    .short("n")
                    .takes_value(true)
                    .validator(|s| {
                        validate_range(
                            &s,
                            1,
                            MAX_WORKERS,
                            "Could not parse participant count",
                            &format!("Participant count must be between 1 and {}", MAX_WORKERS),
                        )
                    })
                    .help("Number of participants in the process group (default: one per CPU)"),
            )
            .arg(
                Arg::with_name(CENTER)
                    .long(CENTER)
                    .short("c")
                    .takes_value(true)
                    .allow_hyphen_values(true)
                    .default_value("0,0")
                    .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse region center"))
                    .help("Center of the rendered region of the plane"),
            )
            .arg(
                Arg::with_name(EXTENT)
                    .long(EXTENT)
                    .short("e")
                    .takes_value(true)
                    .default_value("2,2")
                    .validator(|s| validate_extent(&s))
                    .help("Width and height of the rendered region of the plane"),
            )
            .arg(
                Arg::with_name(PALETTE)
                    .long(PALETTE)
                    .short("p")
                    .takes_value(true)
                    .possible_values(&["gray", "grey", "hue"])
                    .default_value("gray")
                    .help("How escape counts are colored"),
            )
            .arg(
                Arg::with_name(OUTPUT)
                    .long(OUTPUT)
                    .short("o")
                    .takes_value(true)
                    .default_value(DEFAULT_OUTPUT)
                    .help("Output file; the extension picks the format"),
            )
    }

    /// Build a configuration from already-validated matches.
    pub fn from_matches(matches: &ArgMatches) -> Result<RenderConfig> {
        let width = dimension(matches.value_of(WIDTH), DEFAULT_WIDTH, WIDTH)?;
        let height = dimension(matches.value_of(HEIGHT), DEFAULT_HEIGHT, HEIGHT)?;

        let workers = match matches.value_of(WORKERS) {
            None => default_workers(),
            Some(s) => usize::from_str(s)
                .map_err(|_| RenderError::Config(format!("bad participant count '{}'", s)))?,
        };
        if workers == 0 || workers > MAX_WORKERS {
            return Err(RenderError::Config(format!(
                "participant count must be between 1 and {}",
                MAX_WORKERS
            )));
        }

        let center = matches
            .value_of(CENTER)
            .and_then(|s| parse_pair::<f64>(s, ','))
            .ok_or_else(|| RenderError::Config("bad region center".to_string()))?;
        let extent = matches
            .value_of(EXTENT)
            .and_then(|s| parse_pair::<f64>(s, ','))
            .ok_or_else(|| RenderError::Config("bad region extent".to_string()))?;
        if !(extent.0 > 0.0 && extent.1 > 0.0) {
            return Err(RenderError::Config(
                "region extent must be positive".to_string(),
            ));
        }

        let palette = match matches.value_of(PALETTE) {
            Some(s) => s.parse()?,
            None => Palette::default(),
        };

        Ok(RenderConfig {
            bound: Bound::new(width, height),
            region: make_rect(
                Point::new(center.0, center.1),
                RectSize::new(extent.0, extent.1),
            ),
            workers,
            palette,
            output: PathBuf::from(matches.value_of(OUTPUT).unwrap_or(DEFAULT_OUTPUT)),
        })
    }

    /// Parse a full argument list, program name first.
    pub fn from_args<I, T>(args: I) -> Result<RenderConfig>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = RenderConfig::app()
            .get_matches_from_safe(args)
            .map_err(|err| RenderError::Config(err.message))?;
        RenderConfig::from_matches(&matches)
    }
}

/// One participant per CPU, within the accepted range.
pub fn default_workers() -> usize {
    num_cpus::get().max(1).min(MAX_WORKERS)
}

// Zero means "not set".
fn dimension(value: Option<&str>, default: u32, name: &str) -> Result<u32> {
    match value {
        None => Ok(default),
        Some(s) => match u32::from_str(s) {
            Ok(0) => Ok(default),
            Ok(n) if n <= MAX_DIMENSION => Ok(n),
            _ => Err(RenderError::Config(format!("bad image {} '{}'", name, s))),
        },
    }
}
