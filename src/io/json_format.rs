//! JSON format handling
//!
//! Input is a top-level array of transaction objects. Property names are
//! matched ignoring case, and amounts may be JSON numbers or strings.

use crate::io::fields::{parse_amount, parse_timestamp};
use crate::types::{ParsedTransaction, ProcessingError};
use log::warn;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;

/// Parse a JSON document into transactions
///
/// Entries that are not objects, miss a field or hold an unreadable value
/// are skipped with a warning.
///
/// # Errors
///
/// `ParseError` when the document is not valid JSON or not an array.
pub fn parse_json(content: &str) -> Result<Vec<ParsedTransaction>, ProcessingError> {
    let document: Value = serde_json::from_str(content)?;

    let Value::Array(entries) = document else {
        return Err(ProcessingError::ParseError {
            format: "JSON".to_string(),
            line: None,
            message: "expected a top-level array of transactions".to_string(),
        });
    };

    let mut transactions = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match convert_json_entry(entry) {
            Ok(transaction) => transactions.push(transaction),
            Err(e) => warn!("Skipping JSON entry {}: {}", index, e),
        }
    }

    Ok(transactions)
}

/// Convert one array entry into a ParsedTransaction
pub fn convert_json_entry(entry: &Value) -> Result<ParsedTransaction, ProcessingError> {
    let Value::Object(object) = entry else {
        return Err(ProcessingError::invalid_record(None, "entry is not an object"));
    };

    let card_number = field_text(object, "cardNumber")
        .map(|card| card.trim().to_string())
        .filter(|card| !card.is_empty())
        .ok_or_else(|| ProcessingError::missing_field(None, "cardNumber"))?;

    let timestamp = parse_timestamp(&field_text(object, "timestamp").unwrap_or_default(), None)?;
    let amount = parse_amount(&field_text(object, "amount").unwrap_or_default(), None)?;

    Ok(ParsedTransaction::new(card_number, amount, timestamp))
}

/// Text of a string or number property, looked up ignoring case
fn field_text(object: &Map<String, Value>, name: &str) -> Option<String> {
    let value = object
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)?;

    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Write any serializable report as pretty-printed JSON followed by a newline
pub fn write_json<T: Serialize>(value: &T, output: &mut dyn Write) -> Result<(), ProcessingError> {
    serde_json::to_writer_pretty(&mut *output, value)
        .map_err(|e| ProcessingError::output(format!("Failed to write JSON: {}", e)))?;
    writeln!(output).map_err(|e| ProcessingError::output(format!("Failed to flush output: {}", e)))?;
    Ok(())
}
