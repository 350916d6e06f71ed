//! Record quality filters
//!
//! A filter decides whether a cleanly parsed record is converted or passed
//! through as a comment. GPS fixes are gated on satellite count; sensor
//! readings are always accepted.
//!
//! # Usage
//!
//! The GPS receiver reports 0 satellites while it has no lock at all, so a
//! threshold of 1 drops those fixes. Positions can still be obtained with
//! fewer than the 4 satellites needed for a full 4-D fix once the receiver has
//! lock, which is why the threshold is left to the caller.

use crate::error::RecordError;
use crate::types::GpsRecord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Accept/reject gate applied after parsing
pub trait RecordFilter<R> {
    fn check(&self, record: &R) -> Result<(), RecordError>;
}

/// Filter that accepts every record
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl<R> RecordFilter<R> for AcceptAll {
    fn check(&self, _record: &R) -> Result<(), RecordError> {
        Ok(())
    }
}

/// Minimum satellite count (inclusive) for a GPS fix to be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QualityFilter {
    pub min_sats: i32,
}

impl QualityFilter {
    pub fn new(min_sats: i32) -> Self {
        Self { min_sats }
    }
}

impl Default for QualityFilter {
    /// Drops no-lock fixes only
    fn default() -> Self {
        Self { min_sats: 1 }
    }
}

impl RecordFilter<GpsRecord> for QualityFilter {
    fn check(&self, record: &GpsRecord) -> Result<(), RecordError> {
        if record.nsats < self.min_sats {
            return Err(RecordError::QualityRejected {
                nsats: record.nsats,
                min_sats: self.min_sats,
            });
        }
        Ok(())
    }
}
