//! Thread-safe transaction storage for async batch processing
//!
//! This module provides the `AsyncTransactionStore` struct, which stores
//! validated records using concurrent data structures so that validation
//! tasks can insert their results directly.
//!
//! # Design
//!
//! Records live in a `DashMap` keyed by transaction ID. Each record carries an
//! insertion sequence number. Batches reserve a contiguous block of sequence
//! numbers up front, so records inserted concurrently by different tasks still
//! list in the order they were read.
//!
//! # Thread Safety
//!
//! All operations take `&self` and are safe to call from multiple threads;
//! DashMap serializes access per shard and the sequence counter is atomic.

use crate::core::traits::TransactionRepository;
use crate::types::{TransactionId, TransactionRecord};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A stored record and its insertion position
#[derive(Debug, Clone)]
struct SequencedRecord {
    sequence: u64,
    record: TransactionRecord,
}

/// Thread-safe transaction store for async batch processing
///
/// Shared between tasks through `Arc`. Implements [`TransactionRepository`]
/// so reports can be produced from it exactly as from the single-threaded
/// store.
#[derive(Debug, Default)]
pub struct AsyncTransactionStore {
    /// Concurrent map of transaction ID to stored record
    records: DashMap<TransactionId, SequencedRecord>,

    /// Next unreserved sequence number
    next_sequence: AtomicU64,
}

impl AsyncTransactionStore {
    /// Create a new empty AsyncTransactionStore
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Reserve `count` consecutive sequence numbers, returning the first
    pub fn reserve(&self, count: usize) -> u64 {
        self.next_sequence.fetch_add(count as u64, Ordering::SeqCst)
    }

    /// Store a record at a previously reserved sequence number (thread-safe)
    ///
    /// If a record with the same ID is already stored, the new record is
    /// ignored (first occurrence wins) and the stored copy is returned.
    pub fn insert(&self, sequence: u64, mut record: TransactionRecord) -> TransactionRecord {
        let entry = self.records.entry(record.id).or_insert_with(move || {
            record.touch();
            SequencedRecord { sequence, record }
        });
        entry.record.clone()
    }

    /// Store a record at the next free sequence number (thread-safe)
    pub fn push(&self, record: TransactionRecord) -> TransactionRecord {
        let sequence = self.reserve(1);
        self.insert(sequence, record)
    }

    /// Sequence number the next reservation will start at
    pub fn watermark(&self) -> u64 {
        self.next_sequence.load(Ordering::SeqCst)
    }

    /// Remove every record stored at or after `sequence`, returning how many were removed
    ///
    /// Used to drop the records of a file that failed part way through.
    pub fn discard_from(&self, sequence: u64) -> usize {
        let before = self.records.len();
        self.records.retain(|_, entry| entry.sequence < sequence);
        before.saturating_sub(self.records.len())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TransactionRepository for AsyncTransactionStore {
    fn add(&mut self, record: TransactionRecord) -> TransactionRecord {
        self.push(record)
    }

    fn get(&self, id: TransactionId) -> Option<TransactionRecord> {
        self.records.get(&id).map(|entry| entry.record.clone())
    }

    fn select(&self, predicate: &dyn Fn(&TransactionRecord) -> bool) -> Vec<TransactionRecord> {
        let mut matching: Vec<SequencedRecord> = self
            .records
            .iter()
            .filter(|entry| predicate(&entry.value().record))
            .map(|entry| entry.value().clone())
            .collect();

        matching.sort_by_key(|entry| entry.sequence);
        matching.into_iter().map(|entry| entry.record).collect()
    }

    fn count(&self, predicate: &dyn Fn(&TransactionRecord) -> bool) -> usize {
        self.records
            .iter()
            .filter(|entry| predicate(&entry.value().record))
            .count()
    }
}
