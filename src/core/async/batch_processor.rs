//! Parallel batch validation for async processing
//!
//! This module provides the `BatchProcessor` struct, which splits a batch of
//! parsed transactions into contiguous chunks and validates the chunks on
//! separate tokio tasks.
//!
//! # Design
//!
//! Validation of one record never looks at another, so chunks need no
//! coordination. Before splitting, the processor reserves one sequence number
//! per record in the shared store; each chunk inserts its records at their
//! reserved positions, so the stored order matches the input order no matter
//! which task finishes first.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<AsyncTransactionStore>  (shared record storage)
//!     ├── BatchValidationRunner       (validation mode)
//!     └── max_concurrent_tasks        (upper bound on chunks per batch)
//! ```

use std::sync::Arc;

use super::AsyncTransactionStore;
use crate::core::batch::{summarize, BatchValidationRunner};
use crate::types::{BatchStats, ParsedTransaction, ProcessingError, ValidationMode};

/// Contiguous slice of a batch handed to one task
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Sequence number reserved for the first transaction of the chunk
    pub first_sequence: u64,

    /// Transactions in input order
    pub transactions: Vec<ParsedTransaction>,
}

/// Batch processor with chunk-based parallel validation
///
/// Cloneable and cheap to share across async tasks.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Shared store receiving every validated record
    store: Arc<AsyncTransactionStore>,

    runner: BatchValidationRunner,

    max_concurrent_tasks: usize,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// A `max_concurrent_tasks` of zero is treated as one.
    pub fn new(
        store: Arc<AsyncTransactionStore>,
        mode: ValidationMode,
        max_concurrent_tasks: usize,
    ) -> Self {
        Self {
            store,
            runner: BatchValidationRunner::new(mode),
            max_concurrent_tasks: max_concurrent_tasks.max(1),
        }
    }

    /// Split a batch into at most `max_concurrent_tasks` contiguous chunks
    ///
    /// # Guarantees
    ///
    /// - Each transaction appears in exactly one chunk
    /// - Chunks preserve input order, and so does concatenating them
    /// - Chunk `first_sequence` values count up from `first_sequence`
    pub fn partition_into_chunks(
        &self,
        batch: Vec<ParsedTransaction>,
        first_sequence: u64,
    ) -> Vec<Chunk> {
        if batch.is_empty() {
            return Vec::new();
        }

        let chunk_size = batch.len().div_ceil(self.max_concurrent_tasks);
        let mut chunks = Vec::with_capacity(self.max_concurrent_tasks);
        let mut sequence = first_sequence;
        let mut remaining = batch.into_iter();

        loop {
            let transactions: Vec<ParsedTransaction> =
                remaining.by_ref().take(chunk_size).collect();
            if transactions.is_empty() {
                break;
            }

            let len = transactions.len() as u64;
            chunks.push(Chunk {
                first_sequence: sequence,
                transactions,
            });
            sequence += len;
        }

        chunks
    }

    /// Validate one chunk and insert its records into the store
    ///
    /// Nothing is inserted when the chunk cannot be summarized.
    pub fn process_chunk(&self, chunk: Chunk) -> Result<BatchStats, ProcessingError> {
        let records = self.runner.run(chunk.transactions);
        let stats = summarize(&records)?;

        for (offset, record) in records.into_iter().enumerate() {
            self.store.insert(chunk.first_sequence + offset as u64, record);
        }

        Ok(stats)
    }

    /// Validate a batch across tokio tasks and store every record
    ///
    /// Every task is awaited before returning, so no chunk is still writing
    /// to the store afterwards.
    ///
    /// # Errors
    ///
    /// The first chunk failure, or `RuntimeError` if a task could not be
    /// joined. Chunks that succeeded have already stored their records;
    /// callers discard them with [`AsyncTransactionStore::discard_from`].
    pub async fn process_batch(
        &self,
        batch: Vec<ParsedTransaction>,
    ) -> Result<BatchStats, ProcessingError> {
        let first_sequence = self.store.reserve(batch.len());
        let chunks = self.partition_into_chunks(batch, first_sequence);

        let mut tasks = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move { processor.process_chunk(chunk) }));
        }

        let mut stats = BatchStats::default();
        let mut failure = None;
        for task in tasks {
            let outcome = task
                .await
                .map_err(|e| ProcessingError::runtime(format!("Validation task failed: {}", e)))
                .and_then(|chunk| chunk)
                .and_then(|chunk_stats| stats.merge(chunk_stats));

            if let Err(e) = outcome {
                failure.get_or_insert(e);
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(stats),
        }
    }
}
