//! Batch validation
//!
//! Applies the validator to every record of a batch independently. A
//! rejection never affects any other record, so results are the same
//! whether a batch is validated here or split across tasks by
//! [`crate::core::r#async::BatchProcessor`].

use super::validator::validate_transaction;
use crate::types::{
    BatchStats, ParsedTransaction, ProcessingError, TransactionRecord, ValidationMode,
};

/// Runs validation over whole batches with a fixed mode
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchValidationRunner {
    mode: ValidationMode,
}

impl BatchValidationRunner {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Validate every transaction, keeping input order
    pub fn run(&self, batch: Vec<ParsedTransaction>) -> Vec<TransactionRecord> {
        batch
            .into_iter()
            .map(|parsed| validate_transaction(parsed, self.mode))
            .collect()
    }
}

/// Validate a batch with the given mode
pub fn validate_batch(batch: Vec<ParsedTransaction>, mode: ValidationMode) -> Vec<TransactionRecord> {
    BatchValidationRunner::new(mode).run(batch)
}

/// Split validated records into accepted and rejected subsets
pub fn partition(
    records: &[TransactionRecord],
) -> (Vec<&TransactionRecord>, Vec<&TransactionRecord>) {
    records.iter().partition(|record| record.is_valid)
}

/// Count accepted and rejected records and total the accepted amounts
///
/// # Errors
///
/// `ArithmeticOverflow` when the accepted amounts cannot be summed as a
/// `Decimal`.
pub fn summarize(records: &[TransactionRecord]) -> Result<BatchStats, ProcessingError> {
    records
        .iter()
        .try_fold(BatchStats::default(), |mut stats, record| {
            stats.total += 1;
            if record.is_valid {
                stats.valid += 1;
                stats.accepted_amount = stats
                    .accepted_amount
                    .checked_add(record.amount)
                    .ok_or_else(|| ProcessingError::arithmetic_overflow("accepted amounts"))?;
            } else {
                stats.rejected += 1;
            }
            Ok(stats)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CardNetwork, RejectionReason};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn at_noon() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn parsed(card: &str, cents: i64) -> ParsedTransaction {
        ParsedTransaction::new(card, Decimal::new(cents, 2), at_noon())
    }

    fn mixed_batch() -> Vec<ParsedTransaction> {
        vec![
            parsed("4532015112830366", 10050),  // valid Visa
            parsed("4532015112830367", 2000),   // bad Luhn Visa
            parsed("1234567890123456", 999),    // unknown network
            parsed("5555555555554444", 20075),  // valid MasterCard
            parsed("3782-822463-10005", 5000),  // formatted Amex
            parsed("6011111111111117", -1500),  // valid Discover refund
        ]
    }

    #[test]
    fn test_run_keeps_order_and_ids() {
        let batch = mixed_batch();
        let ids: Vec<_> = batch.iter().map(|p| p.id).collect();

        let records = BatchValidationRunner::new(ValidationMode::Strict).run(batch);

        assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_strict_batch_outcomes() {
        let records = validate_batch(mixed_batch(), ValidationMode::Strict);

        let reasons: Vec<_> = records.iter().map(|r| r.rejection_reason).collect();
        assert_eq!(
            reasons,
            vec![
                None,
                Some(RejectionReason::FailedLuhnCheck),
                Some(RejectionReason::UnknownCardType),
                None,
                Some(RejectionReason::NonNumericCharacters),
                None,
            ]
        );
        assert_eq!(records[3].card_network, CardNetwork::MasterCard);
        assert_eq!(records[5].card_network, CardNetwork::Discover);
    }

    #[test]
    fn test_lenient_batch_accepts_bad_luhn() {
        let records = validate_batch(mixed_batch(), ValidationMode::Lenient);

        assert!(records[1].is_valid);
        assert_eq!(records[1].card_network, CardNetwork::Visa);
        assert!(!records[2].is_valid);
    }

    #[test]
    fn test_partition_counts_add_up() {
        for mode in [ValidationMode::Strict, ValidationMode::Lenient] {
            let records = validate_batch(mixed_batch(), mode);
            let (accepted, rejected) = partition(&records);

            assert_eq!(accepted.len() + rejected.len(), records.len());
            assert!(accepted.iter().all(|r| r.is_valid));
            assert!(rejected.iter().all(|r| !r.is_valid));
        }
    }

    #[test]
    fn test_summarize_totals_only_accepted_amounts() {
        let records = validate_batch(mixed_batch(), ValidationMode::Strict);
        let stats = summarize(&records).unwrap();

        let (accepted, _) = partition(&records);
        let expected: Decimal = accepted.iter().map(|r| r.amount).sum();

        assert_eq!(stats.total, 6);
        assert_eq!(stats.valid, 3);
        assert_eq!(stats.rejected, 3);
        assert_eq!(stats.accepted_amount, expected);
        assert_eq!(stats.accepted_amount, Decimal::new(28625, 2));
    }

    #[test]
    fn test_empty_batch() {
        let records = validate_batch(Vec::new(), ValidationMode::Strict);
        assert!(records.is_empty());
        assert_eq!(summarize(&records), Ok(BatchStats::default()));
    }

    #[test]
    fn test_summarize_overflow_is_an_error() {
        let records = validate_batch(
            vec![
                ParsedTransaction::new("4532015112830366", Decimal::MAX, at_noon()),
                ParsedTransaction::new("5555555555554444", Decimal::MAX, at_noon()),
            ],
            ValidationMode::Strict,
        );

        assert_eq!(
            summarize(&records),
            Err(ProcessingError::arithmetic_overflow("accepted amounts"))
        );
    }

    #[test]
    fn test_rejected_amounts_never_overflow() {
        let records = validate_batch(
            vec![
                ParsedTransaction::new("4532015112830366", Decimal::MAX, at_noon()),
                ParsedTransaction::new("4532015112830367", Decimal::MAX, at_noon()),
                ParsedTransaction::new("1234567890123456", Decimal::MAX, at_noon()),
            ],
            ValidationMode::Strict,
        );

        let stats = summarize(&records).unwrap();
        assert_eq!(stats.valid + stats.rejected, 3);
        assert_eq!(stats.accepted_amount, Decimal::MAX);
    }
}
