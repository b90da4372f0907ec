//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It coordinates between the readers (for input),
//! the batch validator, and the TransactionStore that backs the report.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - JSON and XML parsing to `io::load_file`
//! - Validation to `BatchValidationRunner`
//! - Reporting to `strategy::emit_report`

use crate::core::{summarize, BatchValidationRunner, TransactionRepository, TransactionStore};
use crate::io::{load_file, FileFormat, SyncReader};
use crate::strategy::{emit_report, file_name, ProcessingRequest, ProcessingStrategy};
use crate::types::{
    BatchStats, ParsedTransaction, ProcessingError, ProcessingResult, TransactionRecord,
};
use chrono::Utc;
use log::{error, info, warn};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use card_processor::strategy::{ProcessingRequest, ProcessingStrategy, SyncProcessingStrategy};
/// use std::io;
/// use std::path::PathBuf;
///
/// let request = ProcessingRequest {
///     inputs: vec![PathBuf::from("transactions.csv")],
///     mode: Default::default(),
///     report: Default::default(),
/// };
///
/// let result = SyncProcessingStrategy
///     .process(&request, &mut io::stdout())
///     .expect("Processing failed");
/// println!("{} valid transactions", result.valid_records);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl SyncProcessingStrategy {
    /// Parse and validate one file; the caller stores the records
    fn process_file(
        &self,
        path: &Path,
        runner: &BatchValidationRunner,
    ) -> Result<(Vec<TransactionRecord>, BatchStats), ProcessingError> {
        let transactions = read_transactions(path)?;
        let records = runner.run(transactions);
        let stats = summarize(&records)?;
        Ok((records, stats))
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process every input file in order, then write the report
    fn process(
        &self,
        request: &ProcessingRequest,
        output: &mut dyn Write,
    ) -> Result<ProcessingResult, ProcessingError> {
        let started = Instant::now();
        let runner = BatchValidationRunner::new(request.mode);
        let mut store = TransactionStore::new();
        let mut result = ProcessingResult::new();
        info!(
            "Validating {} file(s) in {:?} mode",
            request.inputs.len(),
            runner.mode()
        );

        for path in &request.inputs {
            let name = file_name(path);
            let outcome = self
                .process_file(path, &runner)
                .and_then(|(records, stats)| {
                    result.record_file(name.clone(), stats)?;
                    Ok((records, stats))
                });

            match outcome {
                Ok((records, stats)) => {
                    store.add_range(records);
                    info!(
                        "Processed {}: {} records, {} valid, {} rejected",
                        name, stats.total, stats.valid, stats.rejected
                    );
                }
                Err(e) => {
                    error!("Failed to process {}: {}", name, e);
                    result.record_failure(name, e.to_string());
                }
            }
        }

        result.processing_time = started.elapsed();
        emit_report(&store, &request.report, Utc::now(), output)?;

        Ok(result)
    }
}

/// Read every transaction from a file, skipping unreadable CSV rows
fn read_transactions(path: &Path) -> Result<Vec<ParsedTransaction>, ProcessingError> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => {
            let mut transactions = Vec::new();
            for row in SyncReader::new(path)? {
                match row {
                    Ok(transaction) => transactions.push(transaction),
                    Err(e) => warn!("Skipping CSV row: {}", e),
                }
            }
            Ok(transactions)
        }
        FileFormat::Json | FileFormat::Xml => load_file(path),
    }
}
