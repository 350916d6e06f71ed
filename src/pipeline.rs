//! Streaming conversion driver
//!
//! One pass over the input: every line is classified, data lines are parsed
//! and filtered, and accepted records are either written straight away or
//! folded into the open averaging bucket. Anything that cannot be converted
//! is echoed as a comment so no input line is ever lost.

use crate::averaging::{Accumulator, GpsAccumulator, SensorAccumulator};
use crate::error::{HarborError, RecordError, Result};
use crate::export::{write_comment, write_row, FormatRow};
use crate::filters::{AcceptAll, QualityFilter, RecordFilter};
use crate::parser::{classify_line, LineKind, RecordParser};
use crate::types::{GpsRecord, Record, SensorRecord};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options shared by both log variants
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConvertOptions {
    /// Bucket length in seconds; zero, negative or NaN disables averaging
    pub avg_secs: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { avg_secs: 0.0 }
    }
}

impl ConvertOptions {
    pub fn new(avg_secs: f64) -> Self {
        Self { avg_secs }
    }

    pub fn averaging_enabled(&self) -> bool {
        self.avg_secs > 0.0
    }
}

/// Counters collected over one conversion run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConversionStats {
    pub lines_read: u64,
    /// Lines that did not start with a digit
    pub comment_lines: u64,
    /// Data lines that parsed into a record, whether or not they passed the filter
    pub records_parsed: u64,
    /// Digit-leading lines that failed the field pattern
    pub malformed_lines: u64,
    /// Parsed records dropped by the quality filter
    pub rejected_records: u64,
    pub records_accepted: u64,
    pub rows_written: u64,
    pub buckets_emitted: u64,
    /// Set when reading stopped on an I/O error instead of end of input
    pub read_error: Option<String>,
}

/// Single-pass converter owning the parser, filter and open bucket
pub struct Converter<R, A, F> {
    parser: RecordParser<R>,
    filter: F,
    options: ConvertOptions,
    accumulator: A,
    bucket_start: Option<f64>,
    stats: ConversionStats,
}

pub type GpsConverter = Converter<GpsRecord, GpsAccumulator, QualityFilter>;
pub type SensorConverter = Converter<SensorRecord, SensorAccumulator, AcceptAll>;

impl<R, A, F> Converter<R, A, F>
where
    R: Record + FormatRow,
    A: Accumulator<Record = R>,
    F: RecordFilter<R>,
{
    pub fn new(options: ConvertOptions, filter: F) -> Result<Self> {
        Ok(Self {
            parser: RecordParser::new()?,
            filter,
            options,
            accumulator: A::default(),
            bucket_start: None,
            stats: ConversionStats::default(),
        })
    }

    pub fn stats(&self) -> &ConversionStats {
        &self.stats
    }

    /// Handle one raw input line (terminator included, if any)
    pub fn process_line<W: Write>(&mut self, line: &[u8], out: &mut W) -> Result<()> {
        self.stats.lines_read += 1;

        if classify_line(line) == LineKind::Comment {
            self.stats.comment_lines += 1;
            write_comment(out, line)?;
            return Ok(());
        }

        match self.accept(line) {
            Ok(record) => {
                self.stats.records_parsed += 1;
                self.emit(record, out)
            }
            Err(reason) => {
                if reason.is_quality_rejection() {
                    self.stats.records_parsed += 1;
                    self.stats.rejected_records += 1;
                } else {
                    self.stats.malformed_lines += 1;
                }
                debug!(line = self.stats.lines_read, %reason, "passing line through as comment");
                write_comment(out, line)?;
                Ok(())
            }
        }
    }

    fn accept(&self, line: &[u8]) -> std::result::Result<R, RecordError> {
        let text = std::str::from_utf8(line).map_err(|_| RecordError::InvalidEncoding)?;
        let record = self.parser.parse(text)?;
        self.filter.check(&record)?;
        Ok(record)
    }

    fn emit<W: Write>(&mut self, record: R, out: &mut W) -> Result<()> {
        self.stats.records_accepted += 1;

        if !self.options.averaging_enabled() {
            write_row(out, &record)?;
            self.stats.rows_written += 1;
            return Ok(());
        }

        let tsecs = record.tsecs();
        let crossed = match self.bucket_start {
            None => true,
            Some(start) => tsecs - start > self.options.avg_secs,
        };
        if crossed {
            self.flush_bucket(out)?;
            self.bucket_start = Some(tsecs);
        }
        self.accumulator.fold(&record);
        Ok(())
    }

    fn flush_bucket<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if let Some(averaged) = self.accumulator.flush() {
            write_row(out, &averaged)?;
            self.stats.rows_written += 1;
            self.stats.buckets_emitted += 1;
        }
        Ok(())
    }

    /// Flush whatever bucket is still open and return the run statistics
    pub fn finish<W: Write>(mut self, out: &mut W) -> Result<ConversionStats> {
        self.flush_bucket(out)?;
        out.flush()?;
        Ok(self.stats)
    }

    /// Convert a whole input stream.
    ///
    /// A read error ends the loop like end of input does; the open bucket is
    /// still flushed and the error is recorded in the returned stats. Write
    /// errors are returned.
    pub fn run<I: BufRead, W: Write>(mut self, mut input: I, out: &mut W) -> Result<ConversionStats> {
        let mut line = Vec::new();
        loop {
            line.clear();
            match input.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => self.process_line(&line, out)?,
                Err(err) => {
                    warn!(
                        line = self.stats.lines_read + 1,
                        error = %err,
                        "input read failed, ending conversion early"
                    );
                    self.stats.read_error = Some(err.to_string());
                    break;
                }
            }
        }
        self.finish(out)
    }
}

/// Convert a Harbor GPS log
pub fn convert_gps<I: BufRead, W: Write>(
    input: I,
    out: &mut W,
    options: ConvertOptions,
    filter: QualityFilter,
) -> Result<ConversionStats> {
    GpsConverter::new(options, filter)?.run(input, out)
}

/// Convert a Harbor sensor log
pub fn convert_sensor<I: BufRead, W: Write>(
    input: I,
    out: &mut W,
    options: ConvertOptions,
) -> Result<ConversionStats> {
    SensorConverter::new(options, AcceptAll)?.run(input, out)
}

pub fn open_input(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| HarborError::FileOpen {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    fn gps_line(tsecs: f64, hms: &str, nsats: i32) -> String {
        format!("{tsecs:.1},15/03/25,{hms},1.5,103.5,10.0,{nsats}\n")
    }

    fn run_gps(input: &str, avg_secs: f64, min_sats: i32) -> (String, ConversionStats) {
        let mut out = Vec::new();
        let stats = convert_gps(
            Cursor::new(input.as_bytes()),
            &mut out,
            ConvertOptions::new(avg_secs),
            QualityFilter::new(min_sats),
        )
        .unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    #[test]
    fn test_averaging_enabled() {
        assert!(!ConvertOptions::default().averaging_enabled());
        assert!(!ConvertOptions::new(-1.0).averaging_enabled());
        assert!(!ConvertOptions::new(f64::NAN).averaging_enabled());
        assert!(ConvertOptions::new(0.5).averaging_enabled());
    }

    #[test]
    fn test_bucket_boundaries() {
        let input: String = (0..6)
            .map(|t| gps_line(t as f64, "10:00:00", 6))
            .collect();
        let (output, stats) = run_gps(&input, 2.0, 4);
        let counts: Vec<&str> = output
            .lines()
            .map(|l| l.split_whitespace().last().unwrap())
            .collect();

        // t=0,1,2 then t=3,4,5 (boundary is strictly greater than avg_secs)
        assert_eq!(counts, vec!["3", "3"]);
        assert_eq!(stats.buckets_emitted, 2);
        assert_eq!(stats.records_accepted, 6);
    }

    #[test]
    fn test_rejected_lines_do_not_touch_bucket() {
        let input = [
            gps_line(0.0, "10:00:00", 6),
            gps_line(1.0, "10:00:01", 0),
            "1.5,garbage\n".to_string(),
            gps_line(2.0, "10:00:02", 6),
        ]
        .concat();
        let (output, stats) = run_gps(&input, 10.0, 4);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], format!("# {}", gps_line(1.0, "10:00:01", 0).trim_end()));
        assert_eq!(lines[1], "# 1.5,garbage");
        assert!(lines[2].ends_with("  2"));
        assert_eq!(lines.len(), 3);
        assert_eq!(stats.rejected_records, 1);
        assert_eq!(stats.malformed_lines, 1);
        assert_eq!(stats.records_parsed, 3);
        assert_eq!(stats.records_accepted, 2);
    }

    #[test]
    fn test_stats_count_every_line() {
        let input = format!("Harbor GPS\n\n{}", gps_line(0.0, "10:00:00", 6));
        let (_, stats) = run_gps(&input, 0.0, 4);
        assert_eq!(stats.lines_read, 3);
        assert_eq!(stats.comment_lines, 2);
        assert_eq!(stats.rows_written, 1);
        assert_eq!(stats.buckets_emitted, 0);
        assert_eq!(stats.read_error, None);
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        let (output, stats) = run_gps("", 60.0, 4);
        assert!(output.is_empty());
        assert_eq!(stats, ConversionStats::default());
    }

    #[test]
    fn test_non_utf8_data_line_is_passed_through() {
        let mut out = Vec::new();
        let stats = convert_sensor(
            Cursor::new(b"1.0,\xff\xfe\n".to_vec()),
            &mut out,
            ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(out, b"# 1.0,\xff\xfe\n");
        assert_eq!(stats.malformed_lines, 1);
    }

    /// Yields its data once, then fails
    struct FlakyReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::Other, "device unplugged")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_read_error_flushes_open_bucket() {
        let input = [gps_line(0.0, "10:00:00", 6), gps_line(1.0, "10:00:01", 6)].concat();
        let reader = io::BufReader::new(FlakyReader {
            data: Cursor::new(input.into_bytes()),
        });
        let mut out = Vec::new();
        let stats = GpsConverter::new(ConvertOptions::new(60.0), QualityFilter::new(4))
            .unwrap()
            .run(reader, &mut out)
            .unwrap();

        let output = String::from_utf8(out).unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(output.trim_end().ends_with("  2"));
        assert_eq!(stats.read_error.as_deref(), Some("device unplugged"));
    }

    #[test]
    fn test_open_missing_input() {
        let err = open_input(Path::new("/nonexistent/harbor/gps.csv")).unwrap_err();
        assert!(matches!(err, HarborError::FileOpen { .. }));
        assert_eq!(err.to_string(), "/nonexistent/harbor/gps.csv");
        assert!(std::error::Error::source(&err).is_some());
    }
}
