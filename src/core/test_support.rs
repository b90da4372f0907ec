//! Shared fixtures for store and report tests

use crate::core::validate_transaction;
use crate::types::{ParsedTransaction, TransactionRecord, ValidationMode};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

pub(crate) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

/// Strictly validated record for `card` with an amount in cents
pub(crate) fn record(card: &str, cents: i64, timestamp: DateTime<Utc>) -> TransactionRecord {
    validate_transaction(
        ParsedTransaction::new(card, Decimal::new(cents, 2), timestamp),
        ValidationMode::Strict,
    )
}

/// Two Visa, one MasterCard, one Amex, one bad-Luhn and one unknown-network
/// record spread over 1-5 January 2024
pub(crate) fn sample_records() -> Vec<TransactionRecord> {
    vec![
        record("4532015112830366", 10050, at(1, 10)),
        record("5555555555554444", 20075, at(2, 11)),
        record("4532015112830367", 5000, at(3, 9)),
        record("378282246310005", 3000, at(3, 12)),
        record("1234567890123456", 999, at(4, 8)),
        record("4111111111111111", 1000, at(5, 15)),
    ]
}
