// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate freactal;
extern crate image;
extern crate log;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::{format_err, Error};
use freactal::{render_threaded, Color, FractalMode, RenderParams};
use image::ColorType;
use log::{error, info};
use num::Complex;
use std::path::Path;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (
            T::from_str(s[..index].trim()),
            T::from_str(s[index + 1..].trim()),
        ) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

fn validate_size(s: &str) -> Result<(), String> {
    match parse_pair::<usize>(s, 'x') {
        Some((w, h)) if w >= 1 && h >= 1 && w <= MAX_SIDE && h <= MAX_SIDE => Ok(()),
        Some(_) => Err(format!("Image sides must be between 1 and {}", MAX_SIDE)),
        None => Err("Could not parse output image size".to_string()),
    }
}

fn validate_complex(s: &str, err: &str) -> Result<(), String> {
    match parse_complex(s) {
        Some(c) if c.re.is_finite() && c.im.is_finite() => Ok(()),
        _ => Err(err.to_string()),
    }
}

fn validate_scale(s: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(scale) if scale.is_finite() && scale > 0.0 => Ok(()),
        Ok(_) => Err("Scale must be greater than zero".to_string()),
        Err(_) => Err("Could not parse scale".to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
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

const MAX_SIDE: usize = 16_384;

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const SCALE: &str = "scale";
const OFFSET: &str = "offset";
const JULIA: &str = "julia";
const PRESET: &str = "preset";
const CONSTANT: &str = "constant";
const BACKGROUND: &str = "background";
const COLOUR: &str = "colour";
const THREADS: &str = "threads";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("freactal")
        .version("0.1.0")
        .about("Escape-time Mandelbrot and Julia renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; the format follows the extension"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_size(&s))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(SCALE)
                .long(SCALE)
                .takes_value(true)
                .default_value("4")
                .validator(|s| validate_scale(&s))
                .help("Width of the visible window; larger values zoom out"),
        )
        .arg(
            Arg::with_name(OFFSET)
                .long(OFFSET)
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.15,0.001")
                .validator(|s| validate_complex(&s, "Could not parse offset"))
                .help("Pan applied to the view, as re,im"),
        )
        .arg(
            Arg::with_name(JULIA)
                .long(JULIA)
                .short("j")
                .help("Draw a Julia set instead of the Mandelbrot"),
        )
        .arg(
            Arg::with_name(PRESET)
                .long(PRESET)
                .short("p")
                .takes_value(true)
                .possible_values(&["a", "b", "c", "d", "e", "f", "g", "h", "i"])
                .help("Julia constant preset (implies --julia); defaults to a"),
        )
        .arg(
            Arg::with_name(CONSTANT)
                .long(CONSTANT)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .conflicts_with(PRESET)
                .validator(|s| validate_complex(&s, "Could not parse Julia constant"))
                .help("Julia constant as re,im (implies --julia)"),
        )
        .arg(
            Arg::with_name(BACKGROUND)
                .long(BACKGROUND)
                .short("b")
                .takes_value(true)
                .default_value("0,0,0")
                .validator(|s| Color::from_str(&s).map(|_| ()))
                .help("Background colour as r,g,b in [0, 1]"),
        )
        .arg(
            Arg::with_name(COLOUR)
                .long(COLOUR)
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(|s| Color::from_str(&s).map(|_| ()))
                .help("Palette entry as r,g,b in [0, 1]; repeat to build a palette"),
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
                .help("Number of threads to use in the renderer"),
        )
        .get_matches()
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, Error> {
    matches
        .value_of(name)
        .ok_or_else(|| format_err!("Missing value for --{}", name))
}

fn mode(matches: &ArgMatches) -> Result<FractalMode, Error> {
    if let Some(constant) = matches.value_of(CONSTANT) {
        let c = parse_complex(constant).ok_or_else(|| format_err!("Bad constant {}", constant))?;
        return Ok(FractalMode::Julia(c));
    }
    if matches.is_present(JULIA) || matches.is_present(PRESET) {
        let preset = matches.value_of(PRESET).unwrap_or("a");
        return FractalMode::julia_preset(preset)
            .ok_or_else(|| format_err!("Unknown Julia preset {}", preset));
    }
    Ok(FractalMode::Mandelbrot)
}

fn params(matches: &ArgMatches) -> Result<RenderParams, Error> {
    let defaults = RenderParams::default();
    let palette = match matches.values_of(COLOUR) {
        Some(colours) => colours
            .map(|c| Color::from_str(c).map_err(|e| format_err!("{}", e)))
            .collect::<Result<Vec<Color>, Error>>()?,
        None => defaults.palette,
    };
    let background =
        Color::from_str(value(matches, BACKGROUND)?).map_err(|e| format_err!("{}", e))?;
    let offset = value(matches, OFFSET)?;
    Ok(RenderParams {
        background,
        palette,
        scale: f64::from_str(value(matches, SCALE)?)?,
        offset: parse_complex(offset).ok_or_else(|| format_err!("Bad offset {}", offset))?,
        mode: mode(matches)?,
    })
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let size = value(matches, SIZE)?;
    let (width, height) =
        parse_pair::<usize>(size, 'x').ok_or_else(|| format_err!("Bad image size {}", size))?;
    let threads = usize::from_str(value(matches, THREADS)?)?;
    let params = params(matches)?;
    info!(
        "Rendering {}x{} {:?} at scale {} offset {} on {} threads",
        width, height, params.mode, params.scale, params.offset, threads
    );

    let mut pixels = vec![0u8; width * height * 4];
    render_threaded(&mut pixels, width, height, &params, threads)?;

    let outfile = Path::new(value(matches, OUTPUT)?);
    image::save_buffer(outfile, &pixels, width as u32, height as u32, ColorType::RGBA(8))?;
    info!("Wrote {}", outfile.display());
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        error!("Render failure: {}", e);
        std::process::exit(1);
    }
}
