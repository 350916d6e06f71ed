//! Fixed-width column output
//!
//! Rows follow C `printf` conventions (`%6.1f`, `%2d`, `%f`): right-aligned,
//! single space between columns, one newline-terminated line per record.
//! Comment lines are the input bytes behind a `"# "` marker.

use crate::types::{AveragedGps, FieldDef, FieldValue, GpsRecord, Record, SensorRecord};
use std::fmt::Write as _;
use std::io::{self, Write};

pub const COMMENT_PREFIX: &[u8] = b"# ";

/// Width of the trailing fold-count column on averaged GPS rows
const COUNT_WIDTH: usize = 3;

/// Something that renders as one output row (without the newline)
pub trait FormatRow {
    fn format_row(&self) -> String;
}

/// Render values column by column using the schema's widths and precisions
pub fn format_fields(schema: &[FieldDef], values: &[FieldValue]) -> String {
    let mut row = String::new();
    for (i, (field, value)) in schema.iter().zip(values).enumerate() {
        if i > 0 {
            row.push(' ');
        }
        // Writing into a String cannot fail
        let _ = match *value {
            FieldValue::Float(v) => write!(
                row,
                "{:>width$.prec$}",
                v,
                width = field.width,
                prec = field.precision
            ),
            FieldValue::Int(v) => write!(row, "{:>width$}", v, width = field.width),
        };
    }
    row
}

impl FormatRow for GpsRecord {
    fn format_row(&self) -> String {
        format_fields(Self::SCHEMA, &self.fields())
    }
}

impl FormatRow for AveragedGps {
    fn format_row(&self) -> String {
        format!(
            "{} {:>width$}",
            self.record.format_row(),
            self.count,
            width = COUNT_WIDTH
        )
    }
}

impl FormatRow for SensorRecord {
    fn format_row(&self) -> String {
        format_fields(Self::SCHEMA, &self.fields())
    }
}

pub fn write_row<W: Write, T: FormatRow>(out: &mut W, row: &T) -> io::Result<()> {
    writeln!(out, "{}", row.format_row())
}

/// Echo a raw input line as a comment, keeping its bytes untouched
pub fn write_comment<W: Write>(out: &mut W, line: &[u8]) -> io::Result<()> {
    out.write_all(COMMENT_PREFIX)?;
    out.write_all(line)?;
    if !line.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// First output line: the invocation arguments as a comment
pub fn write_invocation<W: Write, S: AsRef<str>>(out: &mut W, args: &[S]) -> io::Result<()> {
    let joined: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
    out.write_all(COMMENT_PREFIX)?;
    writeln!(out, "{}", joined.join(" "))
}
