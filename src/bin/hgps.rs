//! `hgps`: convert a Harbor GPS CSV log into fixed-width columns
//!
//! Use: `hgps input.csv avg_secs min_sats > output.txt`

use anyhow::{anyhow, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use harbor_parser::cli::{init_logging, invocation_args, log_summary, LONG_VERSION};
use harbor_parser::{convert_gps, open_input, write_invocation, ConvertOptions, QualityFilter};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::debug;

fn build_command() -> Command {
    Command::new("hgps")
        .version(LONG_VERSION)
        .about("Convert Harbor GPS data into simple column format. Perform averaging if requested.")
        .override_usage("hgps input.csv avg_secs min_sats > output.txt")
        .arg(
            Arg::new("input")
                .help("Harbor GPS CSV data file to process")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("avg_secs")
                .help("Number of seconds for averaging; zero for no averaging")
                .required(true)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64))
                .index(2),
        )
        .arg(
            Arg::new("min_sats")
                .help("Minimum number of satellites for a valid record (0 satellites means no lock)")
                .required(true)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i32))
                .index(3),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Log why lines were passed through as comments (to stderr)")
                .action(ArgAction::SetTrue),
        )
}

fn run(matches: &ArgMatches) -> Result<()> {
    let input_path = matches
        .get_one::<PathBuf>("input")
        .ok_or_else(|| anyhow!("missing input file"))?;
    let avg_secs = *matches
        .get_one::<f64>("avg_secs")
        .ok_or_else(|| anyhow!("missing avg_secs"))?;
    let min_sats = *matches
        .get_one::<i32>("min_sats")
        .ok_or_else(|| anyhow!("missing min_sats"))?;

    let options = ConvertOptions::new(avg_secs);
    debug!(
        input = %input_path.display(),
        avg_secs,
        min_sats,
        averaging = options.averaging_enabled(),
        "starting GPS conversion"
    );

    let input = open_input(input_path)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_invocation(&mut out, &invocation_args()).context("writing to standard output")?;

    let stats = convert_gps(input, &mut out, options, QualityFilter::new(min_sats))
        .with_context(|| format!("converting {}", input_path.display()))?;
    log_summary(&stats);
    Ok(())
}

fn main() {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("debug"));

    if let Err(e) = run(&matches) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
