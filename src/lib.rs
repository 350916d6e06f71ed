//! Harbor log converter
//!
//! Converts Harbor data-logger CSV files (GPS fixes or multi-channel sensor
//! readings) into space-separated fixed-width columns, optionally averaging
//! consecutive records over fixed time buckets.
//!
//! # Features
//!
//! - **`cli`** (default): Build the `hgps` and `hsensor` binaries
//! - **`serde`**: Enable serialization/deserialization of records and options
//!
//! # Quick Start
//!
//! Convert a GPS log, averaging over 60 s and dropping fixes with fewer than
//! four satellites:
//! ```rust,no_run
//! use harbor_parser::{convert_gps, open_input, ConvertOptions, QualityFilter};
//! use std::path::Path;
//!
//! let input = open_input(Path::new("gps.csv")).unwrap();
//! let mut out = std::io::stdout().lock();
//! let stats = convert_gps(input, &mut out, ConvertOptions::new(60.0), QualityFilter::new(4)).unwrap();
//! eprintln!("{} rows written", stats.rows_written);
//! ```
//!
//! # Pipeline
//!
//! Each line goes through [`classify_line`], then [`RecordParser`], then a
//! [`RecordFilter`], and finally either straight to output or into an
//! [`Accumulator`]. [`Converter`] drives the whole pass.
//!
//! # Output
//!
//! The first line echoes the invocation (written by the binaries via
//! [`write_invocation`]). Lines that are not converted are echoed behind a
//! `"# "` marker. Averaged GPS rows carry a trailing count of the fixes in
//! the bucket; sensor rows have the same layout raw or averaged.

pub mod averaging;
#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod export;
pub mod filters;
pub mod parser;
pub mod pipeline;
pub mod types;

pub use averaging::*;
pub use error::{HarborError, RecordError};
pub use export::*;
pub use filters::*;
pub use parser::*;
pub use pipeline::*;
pub use types::*;
