//! Field schemas shared by every record variant
//!
//! A record is described by an ordered table of [`FieldDef`]s. The table drives
//! both directions: the parser compiles it into an input pattern and the
//! formatter walks it to render fixed-width columns.

use std::fmt;

/// Numeric type of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Int,
}

/// Definition of one field: name, type, input delimiter and output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Delimiter following this field on input, `None` for the last field
    pub separator: Option<char>,
    /// Minimum output width (0 = no padding)
    pub width: usize,
    /// Decimal places for float output, ignored for integers
    pub precision: usize,
}

impl FieldDef {
    pub const fn float(
        name: &'static str,
        separator: Option<char>,
        width: usize,
        precision: usize,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Float,
            separator,
            width,
            precision,
        }
    }

    pub const fn int(name: &'static str, separator: Option<char>, width: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Int,
            separator,
            width,
            precision: 0,
        }
    }
}

/// A parsed field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Int(i32),
}

impl FieldValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            FieldValue::Float(v) => v,
            FieldValue::Int(v) => v as f64,
        }
    }

    /// Integer view of the value; floats are truncated toward zero
    pub fn as_i32(&self) -> i32 {
        match *self {
            FieldValue::Float(v) => v as i32,
            FieldValue::Int(v) => v,
        }
    }
}

/// A record type with a fixed field schema
pub trait Record: Sized {
    /// Ordered field table, matching both input and output column order
    const SCHEMA: &'static [FieldDef];

    /// Build a record from freshly parsed input values.
    ///
    /// `values` always holds exactly `SCHEMA.len()` entries whose kinds match
    /// the schema.
    fn from_fields(values: &[FieldValue]) -> Self;

    /// Field values in schema order, as written to output
    fn fields(&self) -> Vec<FieldValue>;

    /// Seconds since the start of the dataset
    fn tsecs(&self) -> f64;
}

/// Render a schema in `scanf` notation, e.g. `%f,%d/%d`
pub fn input_pattern(schema: &[FieldDef]) -> String {
    let mut pattern = String::new();
    for field in schema {
        pattern.push_str(match field.kind {
            FieldKind::Float => "%f",
            FieldKind::Int => "%d",
        });
        if let Some(sep) = field.separator {
            pattern.push(sep);
        }
    }
    pattern
}

/// Distinct delimiters used by a schema
pub fn separators(schema: &[FieldDef]) -> Vec<char> {
    let mut seps: Vec<char> = Vec::new();
    for sep in schema.iter().filter_map(|f| f.separator) {
        if !seps.contains(&sep) {
            seps.push(sep);
        }
    }
    seps
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Float => write!(f, "float"),
            FieldKind::Int => write!(f, "integer"),
        }
    }
}
