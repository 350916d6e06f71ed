use crate::types::FieldKind;
use std::fmt;
use std::path::PathBuf;

/// Fatal errors that stop a conversion run
#[derive(Debug)]
pub enum HarborError {
    /// Input file could not be opened
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    /// I/O errors while writing output
    Io(std::io::Error),
    /// Record schema could not be compiled into a line pattern
    Schema(String),
}

impl fmt::Display for HarborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarborError::FileOpen { path, .. } => write!(f, "{}", path.display()),
            HarborError::Io(_) => write!(f, "I/O error"),
            HarborError::Schema(msg) => write!(f, "Invalid record schema: {}", msg),
        }
    }
}

impl std::error::Error for HarborError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarborError::FileOpen { source, .. } => Some(source),
            HarborError::Io(err) => Some(err),
            HarborError::Schema(_) => None,
        }
    }
}

impl From<std::io::Error> for HarborError {
    fn from(err: std::io::Error) -> Self {
        HarborError::Io(err)
    }
}

impl From<regex::Error> for HarborError {
    fn from(err: regex::Error) -> Self {
        HarborError::Schema(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HarborError>;

/// Why a data line was passed through as a comment instead of converted
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    /// Line is not valid UTF-8
    InvalidEncoding,
    /// Wrong number of tokens for the schema
    FieldCount { expected: usize, found: usize },
    /// Token count matches but punctuation does not follow the pattern
    Layout { pattern: String },
    /// Token is not a number of the expected kind (or overflows it)
    InvalidField {
        field: &'static str,
        kind: FieldKind,
        token: String,
    },
    /// GPS fix with fewer satellites than the quality threshold
    QualityRejected { nsats: i32, min_sats: i32 },
}

impl RecordError {
    /// True for records that parsed cleanly but failed the quality filter
    pub fn is_quality_rejection(&self) -> bool {
        matches!(self, RecordError::QualityRejected { .. })
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::InvalidEncoding => write!(f, "line is not valid UTF-8"),
            RecordError::FieldCount { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            RecordError::Layout { pattern } => {
                write!(f, "line does not match pattern {}", pattern)
            }
            RecordError::InvalidField { field, kind, token } => {
                write!(f, "invalid {} '{}' for field '{}'", kind, token, field)
            }
            RecordError::QualityRejected { nsats, min_sats } => {
                write!(f, "{} satellites in view, minimum is {}", nsats, min_sats)
            }
        }
    }
}

impl std::error::Error for RecordError {}
