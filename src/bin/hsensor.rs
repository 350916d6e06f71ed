//! `hsensor`: convert a Harbor sensor CSV log into fixed-width columns
//!
//! Use: `hsensor input.csv avg_secs > output.txt`

use anyhow::{anyhow, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use harbor_parser::cli::{init_logging, invocation_args, log_summary, LONG_VERSION};
use harbor_parser::{convert_sensor, open_input, write_invocation, ConvertOptions};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::debug;

fn build_command() -> Command {
    Command::new("hsensor")
        .version(LONG_VERSION)
        .about("Convert Harbor sensor data into simple column format. Perform averaging if requested.")
        .override_usage("hsensor input.csv avg_secs > output.txt")
        .arg(
            Arg::new("input")
                .help("Harbor sensor CSV data file to process")
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

    let options = ConvertOptions::new(avg_secs);
    debug!(
        input = %input_path.display(),
        avg_secs,
        averaging = options.averaging_enabled(),
        "starting sensor conversion"
    );

    let input = open_input(input_path)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_invocation(&mut out, &invocation_args()).context("writing to standard output")?;

    let stats = convert_sensor(input, &mut out, options)
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
