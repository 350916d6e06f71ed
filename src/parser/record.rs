//! Schema-driven record parsing
//!
//! Each [`Record`] schema is compiled into one anchored regex that mirrors a
//! `scanf` format: optional whitespace before every number, literal delimiters
//! between them, and nothing but whitespace after the last one.

use crate::error::{RecordError, Result};
use crate::types::{input_pattern, separators, FieldDef, FieldKind, FieldValue, Record};
use regex::Regex;
use std::marker::PhantomData;

const FLOAT_TOKEN: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";
const INT_TOKEN: &str = r"[-+]?\d+";

/// Parser for one record type, built once per conversion run
#[derive(Debug)]
pub struct RecordParser<R> {
    pattern: Regex,
    _record: PhantomData<R>,
}

impl<R: Record> RecordParser<R> {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(&line_regex(R::SCHEMA))?;
        Ok(Self {
            pattern,
            _record: PhantomData,
        })
    }

    /// Parse a data line into a record
    pub fn parse(&self, line: &str) -> std::result::Result<R, RecordError> {
        let values = self.parse_fields(line)?;
        Ok(R::from_fields(&values))
    }

    /// Parse a data line into raw field values in schema order
    pub fn parse_fields(&self, line: &str) -> std::result::Result<Vec<FieldValue>, RecordError> {
        let Some(captures) = self.pattern.captures(line) else {
            return Err(diagnose(R::SCHEMA, line));
        };

        R::SCHEMA
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let token = captures.get(i + 1).map_or("", |m| m.as_str());
                parse_token(field, token)
            })
            .collect()
    }
}

fn line_regex(schema: &[FieldDef]) -> String {
    let mut re = String::from("^");
    for field in schema {
        re.push_str(r"\s*(");
        re.push_str(match field.kind {
            FieldKind::Float => FLOAT_TOKEN,
            FieldKind::Int => INT_TOKEN,
        });
        re.push(')');
        if let Some(sep) = field.separator {
            re.push_str(&regex::escape(&sep.to_string()));
        }
    }
    re.push_str(r"\s*$");
    re
}

fn parse_token(field: &FieldDef, token: &str) -> std::result::Result<FieldValue, RecordError> {
    let invalid = || RecordError::InvalidField {
        field: field.name,
        kind: field.kind,
        token: token.to_string(),
    };
    match field.kind {
        FieldKind::Float => token
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|_| invalid()),
        FieldKind::Int => token
            .parse::<i32>()
            .map(FieldValue::Int)
            .map_err(|_| invalid()),
    }
}

/// Work out the most specific reason a line failed the pattern
fn diagnose(schema: &[FieldDef], line: &str) -> RecordError {
    let seps = separators(schema);
    let tokens: Vec<&str> = line.trim_end().split(|c| seps.contains(&c)).collect();

    if tokens.len() != schema.len() {
        return RecordError::FieldCount {
            expected: schema.len(),
            found: tokens.len(),
        };
    }

    for (field, token) in schema.iter().zip(&tokens) {
        if let Err(err) = parse_token(field, token.trim_start()) {
            return err;
        }
    }

    RecordError::Layout {
        pattern: input_pattern(schema),
    }
}
