//! Field-level parsing shared by every input format
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::ProcessingError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Naive date-time layouts accepted after RFC 3339, tried in order
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which end of a date range a bound belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEdge {
    Start,
    End,
}

/// Parse a signed decimal amount, keeping the scale of the source text
///
/// Plain decimal notation is tried first, then scientific notation
/// (`1.5e2`), which JSON numbers may use.
pub fn parse_amount(raw: &str, line: Option<u64>) -> Result<Decimal, ProcessingError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ProcessingError::missing_field(line, "amount"));
    }

    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| ProcessingError::invalid_record(line, format!("invalid amount '{}'", raw)))
}

/// Parse a transaction timestamp
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS[.fff]`
/// and bare `YYYY-MM-DD`. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str, line: Option<u64>) -> Result<DateTime<Utc>, ProcessingError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ProcessingError::missing_field(line, "timestamp"));
    }

    parse_datetime(raw)
        .ok_or_else(|| ProcessingError::invalid_record(line, format!("invalid timestamp '{}'", raw)))
}

/// Parse one bound of a date range
///
/// A bare date as the `End` bound covers that whole day, so
/// `2024-01-01|2024-01-01` selects everything on the first of January.
pub fn parse_range_bound(raw: &str, edge: RangeEdge) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        let time = match edge {
            RangeEdge::Start => NaiveTime::MIN,
            RangeEdge::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)?,
        };
        return Some(date.and_time(time).and_utc());
    }

    parse_datetime(raw)
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        })
}
