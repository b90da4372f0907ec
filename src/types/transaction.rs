//! Transaction-related types for the card processor
//!
//! A transaction moves through two shapes: a [`ParsedTransaction`] built by an
//! input parser, and a [`TransactionRecord`] built once from the parsed data
//! and its validation outcome. Records are not re-validated afterwards.

use super::card::CardNetwork;
use super::validation::{RejectionReason, ValidationOutcome};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Transaction identifier
///
/// Random (v4) UUID assigned when the parser creates the transaction.
pub type TransactionId = Uuid;

/// Transaction as read from an input file, before validation
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransaction {
    /// Unique identifier assigned at creation
    pub id: TransactionId,

    /// Card number exactly as supplied by the source (surrounding whitespace trimmed)
    pub card_number: String,

    /// Signed amount with the scale of the source value preserved
    pub amount: Decimal,

    /// When the transaction occurred
    pub timestamp: DateTime<Utc>,

    /// When this record was created by the parser
    pub created_at: DateTime<Utc>,
}

impl ParsedTransaction {
    /// Create a parsed transaction with a fresh identifier
    pub fn new(card_number: impl Into<String>, amount: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_number: card_number.into(),
            amount,
            timestamp,
            created_at: Utc::now(),
        }
    }
}

/// Validated transaction record
///
/// `rejection_reason` is `Some` exactly when `is_valid` is false, and the
/// network of a rejected record is always `CardNetwork::Unknown`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub id: TransactionId,

    /// Raw card number; only ever leaves the crate masked
    pub card_number: String,

    pub card_network: CardNetwork,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub is_valid: bool,
    pub rejection_reason: Option<RejectionReason>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Finalize a parsed transaction with its validation outcome
    pub fn from_parsed(parsed: ParsedTransaction, outcome: ValidationOutcome) -> Self {
        Self {
            id: parsed.id,
            card_number: parsed.card_number,
            card_network: outcome.network(),
            amount: parsed.amount,
            timestamp: parsed.timestamp,
            is_valid: outcome.is_valid(),
            rejection_reason: outcome.rejection_reason(),
            created_at: parsed.created_at,
            updated_at: parsed.created_at,
        }
    }

    /// Refresh the bookkeeping timestamp (called when the record is stored)
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parsed(card: &str) -> ParsedTransaction {
        ParsedTransaction::new(
            card,
            Decimal::new(10050, 2),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_parsed_transactions_get_distinct_ids() {
        let a = parsed("4532015112830366");
        let b = parsed("4532015112830366");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_from_parsed_accepted() {
        let source = parsed("4532015112830366");
        let id = source.id;
        let record =
            TransactionRecord::from_parsed(source, ValidationOutcome::accepted(CardNetwork::Visa));

        assert_eq!(record.id, id);
        assert!(record.is_valid);
        assert_eq!(record.rejection_reason, None);
        assert_eq!(record.card_network, CardNetwork::Visa);
        assert_eq!(record.amount, Decimal::new(10050, 2));
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_from_parsed_rejected() {
        let record = TransactionRecord::from_parsed(
            parsed("4532015112830367"),
            ValidationOutcome::rejected(RejectionReason::FailedLuhnCheck),
        );

        assert!(!record.is_valid);
        assert_eq!(
            record.rejection_reason,
            Some(RejectionReason::FailedLuhnCheck)
        );
        assert_eq!(record.card_network, CardNetwork::Unknown);
    }

    #[test]
    fn test_touch_moves_updated_at_forward() {
        let mut record = TransactionRecord::from_parsed(
            parsed("4532015112830366"),
            ValidationOutcome::accepted(CardNetwork::Visa),
        );
        let before = record.updated_at;
        record.touch();
        assert!(record.updated_at >= before);
        assert_eq!(record.created_at, before);
    }
}
