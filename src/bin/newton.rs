// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate log;
extern crate newton;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use log::info;
use std::io;
use std::process;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;

use newton::input::{parse_complex, parse_pair, read_roots};
use newton::painter::paint;
use newton::{
    Complex, ComplexRootedPolynomial, FractalError, FractalProducer, IterationConfig,
    NewtonRaphson, ParallelProducer, SchedulerConfig, Viewport,
};

fn validate_size(s: &str) -> Result<(), String> {
    match parse_pair::<usize>(s, 'x') {
        Some((w, h)) if w > 0 && h > 0 => Ok(()),
        Some(_) => Err("Image dimensions must be positive".to_string()),
        None => Err("Could not parse output image size".to_string()),
    }
}

fn validate_complex(s: &str, err: &str) -> Result<(), String> {
    match parse_complex(s) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_positive(s: &str, isnotanumber_err: &str, isnotpositive_err: &str) -> Result<(), String> {
    match usize::from_str(s) {
        Ok(0) => Err(isnotpositive_err.to_string()),
        Ok(_) => Ok(()),
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const WORKERS: &str = "workers";
const TRACKS: &str = "tracks";
const ITERATIONS: &str = "iterations";

fn args<'a>(default_workers: &'a str, default_tracks: &'a str) -> ArgMatches<'a> {
    App::new("newton")
        .version("0.1.0")
        .about("Newton-Raphson fractal renderer. Reads the polynomial's roots from stdin.")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("newton.png")
                .help("Output file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x800")
                .validator(|s| validate_size(&s))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2,-2")
                .validator(|s| validate_complex(&s, "Could not parse left lower corner"))
                .help("Left lower corner of the complex plane"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("2,2")
                .validator(|s| validate_complex(&s, "Could not parse right upper corner"))
                .help("Right upper corner of the complex plane"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .long(WORKERS)
                .short("w")
                .takes_value(true)
                .default_value(default_workers)
                .validator(|s| {
                    validate_positive(
                        &s,
                        "Could not parse worker count",
                        "Worker count must be positive",
                    )
                })
                .help("Number of worker threads"),
        )
        .arg(
            Arg::with_name(TRACKS)
                .long(TRACKS)
                .short("t")
                .takes_value(true)
                .default_value(default_tracks)
                .validator(|s| {
                    validate_positive(
                        &s,
                        "Could not parse track count",
                        "Track count must be positive",
                    )
                })
                .help("Number of horizontal bands the image is split into"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("4096")
                .validator(|s| {
                    validate_positive(
                        &s,
                        "Could not parse iteration count",
                        "Iteration count must be positive",
                    )
                })
                .help("Maximum number of Newton steps per pixel"),
        )
        .get_matches()
}

// The validators have already run, so these lookups cannot miss.
fn count(matches: &ArgMatches, name: &str) -> usize {
    matches
        .value_of(name)
        .and_then(|s| usize::from_str(s).ok())
        .unwrap_or(1)
}

fn corner(matches: &ArgMatches, name: &str) -> Complex {
    matches
        .value_of(name)
        .and_then(parse_complex)
        .unwrap_or(Complex::ZERO)
}

fn run(matches: &ArgMatches) -> Result<(), FractalError> {
    let (width, height) = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair::<usize>(s, 'x'))
        .unwrap_or((800, 800));
    let viewport = Viewport::from_corners(
        width,
        height,
        corner(matches, LEFTLOWER),
        corner(matches, RIGHTUPPER),
    )?;
    let scheduling = SchedulerConfig::new(count(matches, WORKERS), count(matches, TRACKS))?;
    let iteration = IterationConfig {
        max_iterations: count(matches, ITERATIONS),
        ..IterationConfig::default()
    };

    let stdin = io::stdin();
    let roots = read_roots(stdin.lock(), &mut io::stdout())?;
    println!("Image of fractal will appear shortly. Thank you.");

    let rooted = ComplexRootedPolynomial::new(Complex::ONE, roots);
    let newton = NewtonRaphson::new(rooted, iteration)?;
    info!("rooted form: {}", newton.rooted());
    info!("coefficient form: {}", newton.polynomial());

    let producer = ParallelProducer::new(newton, scheduling);
    let outfile = matches.value_of(OUTPUT).unwrap_or("newton.png");
    let mut written = Ok(());
    producer.produce(&viewport, 0, &AtomicBool::new(false), |buffer, colors, _| {
        written = paint(&buffer, width, height, colors).save(outfile);
    })?;
    written.map_err(|e| FractalError::Io(e.to_string()))?;
    info!("wrote {}", outfile);
    Ok(())
}

fn main() {
    env_logger::init();
    let cpus = num_cpus::get();
    let (default_workers, default_tracks) = (cpus.to_string(), (4 * cpus).to_string());
    let matches = args(&default_workers, &default_tracks);

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        process::exit(1);
    }
}
