//! Core traits for transaction storage and querying
//!
//! This module defines the repository abstraction that allows both the
//! single-threaded and the concurrent stores to back the same reports.

use super::batch::summarize;
use crate::types::{CardNetwork, ProcessingError, TransactionId, TransactionRecord};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// One page of a listing query
///
/// Pages are numbered from 1. Both the number and the size must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: usize,
    size: usize,
}

impl Page {
    /// Default number of records per page
    pub const DEFAULT_SIZE: usize = 20;

    /// Create a page, rejecting zero page numbers or sizes
    pub fn new(number: usize, size: usize) -> Result<Self, ProcessingError> {
        if number == 0 || size == 0 {
            return Err(ProcessingError::invalid_page(number, size));
        }
        Ok(Self { number, size })
    }

    /// A single page holding every record
    pub fn everything() -> Self {
        Self {
            number: 1,
            size: usize::MAX,
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of records to skip before this page starts
    pub fn offset(&self) -> usize {
        (self.number - 1).saturating_mul(self.size)
    }

    /// Cut this page out of an already ordered listing
    pub fn apply(&self, records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
        records
            .into_iter()
            .skip(self.offset())
            .take(self.size)
            .collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// Order records newest first; records with equal timestamps keep their order
pub fn newest_first(mut records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

/// Trait for storing and querying validated transactions
///
/// Implementations provide storage plus a predicate scan; the listing and
/// aggregate queries are built on top of those. Accepted and rejected
/// records are stored alike.
pub trait TransactionRepository {
    /// Store a record, refreshing its `updated_at`, and return the stored copy
    fn add(&mut self, record: TransactionRecord) -> TransactionRecord;

    /// Get a record by ID
    fn get(&self, id: TransactionId) -> Option<TransactionRecord>;

    /// Records matching `predicate`, in insertion order
    fn select(&self, predicate: &dyn Fn(&TransactionRecord) -> bool) -> Vec<TransactionRecord>;

    /// Number of records matching `predicate`
    fn count(&self, predicate: &dyn Fn(&TransactionRecord) -> bool) -> usize;

    /// Store several records, returning how many were stored
    fn add_range(&mut self, records: Vec<TransactionRecord>) -> usize {
        let mut stored = 0;
        for record in records {
            self.add(record);
            stored += 1;
        }
        stored
    }

    /// Every record, newest first
    fn all(&self, page: Page) -> Vec<TransactionRecord> {
        page.apply(newest_first(self.select(&|_| true)))
    }

    /// Records of one card network, newest first
    fn by_network(&self, network: CardNetwork, page: Page) -> Vec<TransactionRecord> {
        page.apply(newest_first(
            self.select(&|record| record.card_network == network),
        ))
    }

    /// Records whose timestamp lies within `start..=end`, newest first
    fn by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: Page,
    ) -> Vec<TransactionRecord> {
        page.apply(newest_first(self.select(&|record| {
            record.timestamp >= start && record.timestamp <= end
        })))
    }

    /// Rejected records, newest first
    fn rejected(&self, page: Page) -> Vec<TransactionRecord> {
        page.apply(newest_first(self.select(&|record| !record.is_valid)))
    }

    fn total_count(&self) -> usize {
        self.count(&|_| true)
    }

    fn count_by_network(&self, network: CardNetwork) -> usize {
        self.count(&|record| record.card_network == network)
    }

    fn rejected_count(&self) -> usize {
        self.count(&|record| !record.is_valid)
    }

    /// Sum of accepted amounts
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` when the sum does not fit in a `Decimal`.
    fn total_amount(&self) -> Result<Decimal, ProcessingError> {
        summarize(&self.select(&|record| record.is_valid)).map(|stats| stats.accepted_amount)
    }

    /// Sum of accepted amounts for one card network
    fn total_amount_by_network(&self, network: CardNetwork) -> Result<Decimal, ProcessingError> {
        summarize(&self.select(&|record| record.is_valid && record.card_network == network))
            .map(|stats| stats.accepted_amount)
    }
}
