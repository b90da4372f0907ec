//! CSV format handling for transaction input and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to parsed transactions
//! - Report serialization (transaction rows and network distribution)
//!
//! All functions are pure (no I/O beyond the given writer) for easy testing.

use crate::core::report::{NetworkDistribution, TransactionView};
use crate::io::fields::{parse_amount, parse_timestamp};
use crate::types::{ParsedTransaction, ProcessingError};
use chrono::SecondsFormat;
use csv::Writer;
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: cardNumber, timestamp, amount.
/// Every field is optional so that a short row surfaces as a missing field
/// on that record rather than a parse error for the whole file.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvRecord {
    #[serde(rename = "cardNumber")]
    pub card_number: Option<String>,
    pub timestamp: Option<String>,
    pub amount: Option<String>,
}

/// Convert a CsvRecord to a ParsedTransaction
///
/// The card number is only trimmed; validation decides what else is wrong
/// with it.
///
/// # Errors
///
/// `InvalidRecord` when a field is missing or the amount or timestamp cannot
/// be read. `line` is attached to the error.
pub fn convert_csv_record(
    csv_record: CsvRecord,
    line: Option<u64>,
) -> Result<ParsedTransaction, ProcessingError> {
    let card_number = csv_record
        .card_number
        .map(|card| card.trim().to_string())
        .filter(|card| !card.is_empty())
        .ok_or_else(|| ProcessingError::missing_field(line, "cardNumber"))?;

    let timestamp = parse_timestamp(csv_record.timestamp.as_deref().unwrap_or_default(), line)?;
    let amount = parse_amount(csv_record.amount.as_deref().unwrap_or_default(), line)?;

    Ok(ParsedTransaction::new(card_number, amount, timestamp))
}

/// Write transaction views as CSV
///
/// Columns: card_number, card_network, amount, timestamp, is_valid,
/// rejection_reason. Rows are written in the given order; the reason is
/// empty for accepted transactions.
pub fn write_transactions_csv(
    transactions: &[TransactionView],
    output: &mut dyn Write,
) -> Result<(), ProcessingError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "card_number",
            "card_network",
            "amount",
            "timestamp",
            "is_valid",
            "rejection_reason",
        ])
        .map_err(|e| ProcessingError::output(format!("Failed to write CSV header: {}", e)))?;

    for transaction in transactions {
        writer
            .write_record(&[
                transaction.card_number.clone(),
                transaction.card_network.clone(),
                transaction.amount.to_string(),
                transaction
                    .timestamp
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
                transaction.is_valid.to_string(),
                transaction
                    .rejection_reason
                    .map(|reason| reason.to_string())
                    .unwrap_or_default(),
            ])
            .map_err(|e| {
                ProcessingError::output(format!("Failed to write transaction record: {}", e))
            })?;
    }

    writer
        .flush()
        .map_err(|e| ProcessingError::output(format!("Failed to flush output: {}", e)))?;

    Ok(())
}

/// Write a card network distribution as CSV
///
/// Columns: card_network, count, percentage (two decimal places).
pub fn write_distribution_csv(
    distribution: &[NetworkDistribution],
    output: &mut dyn Write,
) -> Result<(), ProcessingError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["card_network", "count", "percentage"])
        .map_err(|e| ProcessingError::output(format!("Failed to write CSV header: {}", e)))?;

    for share in distribution {
        writer
            .write_record(&[
                share.card_network.clone(),
                share.count.to_string(),
                format!("{:.2}", share.percentage),
            ])
            .map_err(|e| {
                ProcessingError::output(format!("Failed to write distribution record: {}", e))
            })?;
    }

    writer
        .flush()
        .map_err(|e| ProcessingError::output(format!("Failed to flush output: {}", e)))?;

    Ok(())
}
