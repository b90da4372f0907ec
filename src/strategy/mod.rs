//! Processing strategy module
//!
//! This module defines the Strategy pattern for complete processing pipelines:
//! parsing every input file, validating and storing the transactions, and
//! writing the requested report. Different implementations (synchronous,
//! asynchronous batch) are selected at runtime and produce identical records.

use crate::cli::StrategyType;
use crate::core::report::{build_dashboard, build_report, DashboardRange, ReportQuery};
use crate::core::{Page, TransactionRepository};
use crate::io::{write_distribution_csv, write_json, write_transactions_csv};
use crate::types::{ProcessingError, ProcessingResult, ValidationMode};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Report output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Transaction rows, or network distribution rows for the dashboard
    #[default]
    Csv,

    /// The full report structure, pretty-printed
    Json,
}

/// Which report to produce once every file is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Listing { query: ReportQuery, page: Page },
    Dashboard(DashboardRange),
}

impl Default for ReportKind {
    fn default() -> Self {
        ReportKind::Listing {
            query: ReportQuery::All,
            page: Page::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub format: OutputFormat,
}

/// Everything a strategy needs for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingRequest {
    pub inputs: Vec<PathBuf>,

    /// Applied to every record of every file
    pub mode: ValidationMode,

    pub report: ReportRequest,
}

/// Processing strategy trait for complete processing pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Process every input file and write the requested report to `output`
    ///
    /// A file that cannot be opened or parsed is recorded in
    /// `failed_files` and the remaining files are still processed. Rows
    /// that cannot be read are logged and skipped.
    ///
    /// # Errors
    ///
    /// Only fatal problems: the runtime cannot be created, the report query
    /// is invalid, or the output cannot be written.
    fn process(
        &self,
        request: &ProcessingRequest,
        output: &mut dyn Write,
    ) -> Result<ProcessingResult, ProcessingError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` only applies to the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

/// Build the requested report from a populated repository and write it
///
/// Relative dashboard ranges are resolved against `now`.
pub fn emit_report(
    repository: &dyn TransactionRepository,
    request: &ReportRequest,
    now: DateTime<Utc>,
    output: &mut dyn Write,
) -> Result<(), ProcessingError> {
    match request.kind {
        ReportKind::Listing { query, page } => {
            let report = build_report(repository, &query, page)?;
            match request.format {
                OutputFormat::Csv => write_transactions_csv(&report.transactions, output),
                OutputFormat::Json => write_json(&report, output),
            }
        }
        ReportKind::Dashboard(range) => {
            let stats = build_dashboard(repository, &range, now)?;
            match request.format {
                OutputFormat::Csv => write_distribution_csv(&stats.card_network_distribution, output),
                OutputFormat::Json => write_json(&stats, output),
            }
        }
    }
}

/// Name a file the way processing results and logs refer to it
pub(crate) fn file_name(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{at, sample_records};
    use crate::core::TransactionStore;

    fn loaded_store() -> TransactionStore {
        let mut store = TransactionStore::new();
        store.add_range(sample_records());
        store
    }

    fn emit(request: ReportRequest) -> String {
        let mut output = Vec::new();
        emit_report(&loaded_store(), &request, at(20, 0), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_default_request_lists_first_page_as_csv() {
        let output = emit(ReportRequest::default());
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("****-****-****-1111,Visa,10.00,2024-01-05T15:00:00Z"));
    }

    #[test]
    fn test_rejected_listing() {
        let output = emit(ReportRequest {
            kind: ReportKind::Listing {
                query: ReportQuery::Rejected,
                page: Page::default(),
            },
            format: OutputFormat::Csv,
        });

        assert_eq!(
            output,
            "card_number,card_network,amount,timestamp,is_valid,rejection_reason\n\
             ****-****-****-3456,Unknown,9.99,2024-01-04T08:00:00Z,false,Unknown card type\n\
             ****-****-****-0367,Unknown,50.00,2024-01-03T09:00:00Z,false,Invalid card number (failed Luhn algorithm check)\n"
        );
    }

    #[test]
    fn test_dashboard_csv() {
        let output = emit(ReportRequest {
            kind: ReportKind::Dashboard(DashboardRange::LastDays(30)),
            format: OutputFormat::Csv,
        });

        assert_eq!(
            output,
            "card_network,count,percentage\n\
             Visa,2,33.33\n\
             MasterCard,1,16.67\n\
             American Express,1,16.67\n\
             Unknown,2,33.33\n"
        );
    }

    #[test]
    fn test_listing_json_never_contains_raw_numbers() {
        let output = emit(ReportRequest {
            kind: ReportKind::default(),
            format: OutputFormat::Json,
        });

        let report: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(report["summary"]["total_count"], 6);
        assert_eq!(report["summary"]["total_amount"], "341.25");
        assert!(!output.contains("4532015112830366"));
        assert!(output.contains("****-****-****-0366"));
    }

    #[test]
    fn test_dashboard_json() {
        let output = emit(ReportRequest {
            kind: ReportKind::Dashboard(DashboardRange::LastDays(30)),
            format: OutputFormat::Json,
        });

        let stats: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(stats["total_transactions"], 6);
        assert_eq!(stats["average_amount"], "85.31");
        assert_eq!(stats["recent_transactions"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_invalid_date_range_is_fatal() {
        let mut output = Vec::new();
        let result = emit_report(
            &loaded_store(),
            &ReportRequest {
                kind: ReportKind::Listing {
                    query: ReportQuery::ByDateRange {
                        start: at(5, 0),
                        end: at(1, 0),
                    },
                    page: Page::default(),
                },
                format: OutputFormat::Csv,
            },
            at(20, 0),
            &mut output,
        );

        assert!(matches!(result, Err(ProcessingError::InvalidDateRange { .. })));
        assert!(output.is_empty());
    }
}
