//! Processing summary types
//!
//! A [`ProcessingResult`] describes one run over one or more input files.

use super::error::ProcessingError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;

/// Counts for a group of validated records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub valid: usize,
    pub rejected: usize,

    /// Sum of the amounts of accepted records only
    pub accepted_amount: Decimal,
}

impl BatchStats {
    /// Fold another set of counts into this one
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` if the accepted amounts cannot be added; `self`
    /// is left unchanged.
    pub fn merge(&mut self, other: BatchStats) -> Result<(), ProcessingError> {
        self.accepted_amount = self
            .accepted_amount
            .checked_add(other.accepted_amount)
            .ok_or_else(|| ProcessingError::arithmetic_overflow("accepted amounts"))?;
        self.total += other.total;
        self.valid += other.valid;
        self.rejected += other.rejected;
        Ok(())
    }
}

/// Outcome of processing a set of input files
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingResult {
    /// True when no input file failed
    pub success: bool,
    pub total_records: usize,
    pub valid_records: usize,
    pub rejected_records: usize,
    pub accepted_amount: Decimal,

    /// Message of the last file failure, if any
    pub error_message: Option<String>,
    pub processed_files: Vec<String>,
    pub failed_files: Vec<String>,

    #[serde(serialize_with = "serialize_duration_ms")]
    pub processing_time: Duration,
}

impl ProcessingResult {
    pub fn new() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Record a file whose records were all validated
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` if the file's accepted amount no longer fits in
    /// the run total. Nothing is recorded in that case.
    pub fn record_file(
        &mut self,
        file_name: String,
        stats: BatchStats,
    ) -> Result<(), ProcessingError> {
        self.accepted_amount = self
            .accepted_amount
            .checked_add(stats.accepted_amount)
            .ok_or_else(|| ProcessingError::arithmetic_overflow("accepted amounts"))?;
        self.total_records += stats.total;
        self.valid_records += stats.valid;
        self.rejected_records += stats.rejected;
        self.processed_files.push(file_name);
        Ok(())
    }

    /// Record a file that could not be processed
    pub fn record_failure(&mut self, file_name: String, message: String) {
        self.success = false;
        self.error_message = Some(message);
        self.failed_files.push(file_name);
    }
}

fn serialize_duration_ms<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u128(duration.as_millis())
}
