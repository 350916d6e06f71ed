//! Line classification
//!
//! Only lines whose first byte is an ASCII digit can hold a record; everything
//! else (headers, blank lines, status messages) is echoed as a comment.

/// Kind of a raw input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Data,
    Comment,
}

pub fn classify_line(line: &[u8]) -> LineKind {
    match line.first() {
        Some(byte) if byte.is_ascii_digit() => LineKind::Data,
        _ => LineKind::Comment,
    }
}
