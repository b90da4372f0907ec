//! In-memory transaction storage
//!
//! This module provides the TransactionStore component that keeps every
//! validated record (accepted and rejected) for later reporting.
//!
//! # Duplicate Handling
//!
//! If a record with an already stored ID is added, only the first occurrence
//! is kept. Subsequent records with the same ID are ignored.

use crate::core::traits::TransactionRepository;
use crate::types::{TransactionId, TransactionRecord};
use std::collections::HashMap;

/// Single-threaded transaction store
///
/// Keeps records in insertion order with an ID index for lookups.
#[derive(Debug, Default)]
pub struct TransactionStore {
    /// Records in insertion order
    records: Vec<TransactionRecord>,

    /// Position of each record in `records`
    index: HashMap<TransactionId, usize>,
}

impl TransactionStore {
    /// Create a new empty transaction store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TransactionRepository for TransactionStore {
    fn add(&mut self, mut record: TransactionRecord) -> TransactionRecord {
        if let Some(&position) = self.index.get(&record.id) {
            // First occurrence wins
            return self.records[position].clone();
        }

        record.touch();
        self.index.insert(record.id, self.records.len());
        self.records.push(record.clone());
        record
    }

    fn get(&self, id: TransactionId) -> Option<TransactionRecord> {
        self.index
            .get(&id)
            .map(|&position| self.records[position].clone())
    }

    fn select(&self, predicate: &dyn Fn(&TransactionRecord) -> bool) -> Vec<TransactionRecord> {
        self.records
            .iter()
            .filter(|&record| predicate(record))
            .cloned()
            .collect()
    }

    fn count(&self, predicate: &dyn Fn(&TransactionRecord) -> bool) -> usize {
        self.records.iter().filter(|&record| predicate(record)).count()
    }
}
