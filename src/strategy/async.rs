//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. Transactions are read in batches and each batch
//! is validated in parallel chunks.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_tasks)
//!     ├── AsyncReader (batch CSV reading) / io::FileFormat (JSON, XML)
//!     ├── BatchProcessor (chunking + tokio tasks)
//!     └── AsyncTransactionStore (thread-safe record storage)
//! ```
//!
//! # Ordering
//!
//! Files and batches are processed one after another. Within a batch, chunks
//! run concurrently but write to sequence numbers reserved up front, so the
//! stored order, and therefore every report, matches the sync strategy.

use crate::core::r#async::{AsyncTransactionStore, BatchProcessor};
use crate::io::async_reader::AsyncReader;
use crate::io::{open_error, FileFormat};
use crate::strategy::{emit_report, file_name, ProcessingRequest, ProcessingStrategy};
use crate::types::{BatchStats, ProcessingError, ProcessingResult};
use chrono::Utc;
use log::{error, info, warn};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Configuration for batch processing
///
/// Controls how many transactions are read per batch and how many tasks
/// (and runtime worker threads) validate each batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of transactions per batch
    pub batch_size: usize,
    /// Maximum number of chunks validated concurrently per batch
    pub max_concurrent_tasks: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_tasks: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, replacing zero values with defaults
    pub fn new(batch_size: usize, max_concurrent_tasks: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_tasks = if max_concurrent_tasks == 0 {
            warn!(
                "Invalid max_concurrent_tasks ({}), using default ({})",
                max_concurrent_tasks, default.max_concurrent_tasks
            );
            default.max_concurrent_tasks
        } else {
            max_concurrent_tasks
        };

        Self {
            batch_size,
            max_concurrent_tasks,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// # Configuration
///
/// - `batch_size`: Number of transactions per batch (default: 1000)
/// - `max_concurrent_tasks`: Tasks per batch and worker threads (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    /// Batch processing configuration
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Parse, validate and store one file
    ///
    /// On error, records of earlier batches of this file may already be in
    /// the store; the caller discards them.
    async fn process_file(
        &self,
        path: &Path,
        processor: &BatchProcessor,
    ) -> Result<BatchStats, ProcessingError> {
        let mut stats = BatchStats::default();

        match FileFormat::from_path(path)? {
            FileFormat::Csv => {
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|e| open_error(path, e))?;

                // Wrap tokio file in a compatibility layer for csv-async
                let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
                let mut reader = AsyncReader::new(compat_file);

                loop {
                    let batch = reader.read_batch(self.config.batch_size).await;
                    if batch.is_empty() {
                        break;
                    }
                    stats.merge(processor.process_batch(batch).await?)?;
                }
            }
            format => {
                let content = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| open_error(path, e))?;
                let mut transactions = format.parse(&content)?;

                while !transactions.is_empty() {
                    let rest = transactions.split_off(self.config.batch_size.min(transactions.len()));
                    stats.merge(processor.process_batch(transactions).await?)?;
                    transactions = rest;
                }
            }
        }

        Ok(stats)
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process every input file on a tokio multi-threaded runtime, then write the report
    fn process(
        &self,
        request: &ProcessingRequest,
        output: &mut dyn Write,
    ) -> Result<ProcessingResult, ProcessingError> {
        let started = Instant::now();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_tasks)
            .enable_all()
            .build()
            .map_err(|e| ProcessingError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

        let store = Arc::new(AsyncTransactionStore::new());
        let processor = BatchProcessor::new(
            Arc::clone(&store),
            request.mode,
            self.config.max_concurrent_tasks,
        );

        let mut result = runtime.block_on(async {
            let mut result = ProcessingResult::new();

            for path in &request.inputs {
                let name = file_name(path);
                let watermark = store.watermark();

                let outcome = match self.process_file(path, &processor).await {
                    Ok(stats) => result.record_file(name.clone(), stats).map(|()| stats),
                    Err(e) => Err(e),
                };

                match outcome {
                    Ok(stats) => {
                        info!(
                            "Processed {}: {} records, {} valid, {} rejected",
                            name, stats.total, stats.valid, stats.rejected
                        );
                    }
                    Err(e) => {
                        let discarded = store.discard_from(watermark);
                        error!(
                            "Failed to process {}: {} ({} stored records discarded)",
                            name, e, discarded
                        );
                        result.record_failure(name, e.to_string());
                    }
                }
            }

            result
        });

        result.processing_time = started.elapsed();
        emit_report(store.as_ref(), &request.report, Utc::now(), output)?;

        Ok(result)
    }
}
