//! Shared command-line support for the `hgps` and `hsensor` binaries

use crate::pipeline::ConversionStats;
use tracing::{debug, info, warn};

/// Package version plus the git SHA it was built from
pub const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VERGEN_GIT_SHA"), ")");

/// Set up diagnostics on stderr; stdout carries converted data only.
///
/// `RUST_LOG` takes precedence over the `--debug` flag.
pub fn init_logging(debug: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", level);
}

/// Arguments as typed, for the `#` echo line at the top of the output
pub fn invocation_args() -> Vec<String> {
    std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

pub fn log_summary(stats: &ConversionStats) {
    info!(
        lines = stats.lines_read,
        parsed = stats.records_parsed,
        rows = stats.rows_written,
        buckets = stats.buckets_emitted,
        comments = stats.comment_lines,
        malformed = stats.malformed_lines,
        rejected = stats.rejected_records,
        "conversion finished"
    );
    if let Some(err) = &stats.read_error {
        warn!("input ended early after {} lines: {}", stats.lines_read, err);
    }
}
