use crate::core::report::{DashboardRange, ReportQuery};
use crate::core::Page;
use crate::io::fields::{parse_range_bound, RangeEdge};
use crate::strategy::{BatchConfig, OutputFormat, ProcessingRequest, ReportKind, ReportRequest};
use crate::types::{CardNetwork, ProcessingError, ValidationMode};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Validate and classify payment card transactions
#[derive(Parser, Debug)]
#[command(name = "card-processor")]
#[command(about = "Validate and classify payment card transactions", long_about = None)]
pub struct CliArgs {
    /// Input files containing transaction records
    #[arg(
        value_name = "INPUT",
        required = true,
        help = "Input files (.csv, .json or .xml)"
    )]
    pub inputs: Vec<PathBuf>,

    /// Validation mode applied to every record
    #[arg(
        long = "mode",
        value_name = "MODE",
        default_value = "lenient",
        help = "'strict' enforces the Luhn checksum (real data), 'lenient' skips it (test data)"
    )]
    pub mode: ValidationMode,

    /// Treat input as real card data (same as --mode strict)
    #[arg(long = "real-data", conflicts_with = "mode")]
    pub real_data: bool,

    /// Parsing strategy to use for processing transactions
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Parsing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of transactions per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of transactions per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent validation tasks (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of tasks validating a batch concurrently (default: CPU cores)"
    )]
    pub max_concurrent_tasks: Option<usize>,

    /// Report written to stdout once all files are processed
    #[arg(long = "report", value_name = "REPORT", default_value = "all")]
    pub report: ReportType,

    /// Card network for `--report network`
    #[arg(
        long = "network",
        value_name = "NETWORK",
        required_if_eq("report", "network"),
        help = "Card network, e.g. visa, mastercard, \"American Express\""
    )]
    pub network: Option<CardNetwork>,

    /// Range start for `--report dates`
    #[arg(long = "start", value_name = "DATE", required_if_eq("report", "dates"))]
    pub start: Option<String>,

    /// Range end for `--report dates`; a bare date covers the whole day
    #[arg(long = "end", value_name = "DATE", required_if_eq("report", "dates"))]
    pub end: Option<String>,

    /// Range for `--report dashboard`
    #[arg(
        long = "range",
        value_name = "RANGE",
        default_value = "7d",
        help = "7d, 30d, 90d or YYYY-MM-DD|YYYY-MM-DD"
    )]
    pub range: String,

    /// Page number for listing reports (from 1)
    #[arg(long = "page", value_name = "PAGE", default_value_t = 1)]
    pub page: usize,

    /// Records per page for listing reports
    #[arg(long = "page-size", value_name = "SIZE", default_value_t = Page::DEFAULT_SIZE)]
    pub page_size: usize,

    /// Output encoding
    #[arg(long = "format", value_name = "FORMAT", default_value = "csv")]
    pub format: OutputFormat,
}

/// Available parsing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportType {
    /// Every transaction
    All,
    /// Transactions of one card network
    Network,
    /// Transactions within a date range
    Dates,
    /// Rejected transactions only
    Rejected,
    /// Dashboard statistics
    Dashboard,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Values not given on the command line fall back to defaults; zero
    /// values are replaced with defaults by `BatchConfig::new`.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_tasks.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_tasks
                    .unwrap_or(default.max_concurrent_tasks),
            )
        } else {
            BatchConfig::default()
        }
    }

    pub fn validation_mode(&self) -> ValidationMode {
        if self.real_data {
            ValidationMode::from_real_data(true)
        } else {
            self.mode
        }
    }

    /// Build the report request, validating pages and dates up front
    pub fn to_report_request(&self) -> Result<ReportRequest, ProcessingError> {
        let page = Page::new(self.page, self.page_size)?;

        let kind = match self.report {
            ReportType::All => ReportKind::Listing {
                query: ReportQuery::All,
                page,
            },
            ReportType::Network => {
                let network = self
                    .network
                    .ok_or_else(|| ProcessingError::unknown_card_network(""))?;
                ReportKind::Listing {
                    query: ReportQuery::ByNetwork(network),
                    page,
                }
            }
            ReportType::Dates => {
                let start = date_bound(self.start.as_deref(), RangeEdge::Start)?;
                let end = date_bound(self.end.as_deref(), RangeEdge::End)?;
                if end < start {
                    return Err(ProcessingError::invalid_date_range(start, end));
                }
                ReportKind::Listing {
                    query: ReportQuery::ByDateRange { start, end },
                    page,
                }
            }
            ReportType::Rejected => ReportKind::Listing {
                query: ReportQuery::Rejected,
                page,
            },
            ReportType::Dashboard => ReportKind::Dashboard(self.range.parse::<DashboardRange>()?),
        };

        Ok(ReportRequest {
            kind,
            format: self.format,
        })
    }

    pub fn to_processing_request(&self) -> Result<ProcessingRequest, ProcessingError> {
        Ok(ProcessingRequest {
            inputs: self.inputs.clone(),
            mode: self.validation_mode(),
            report: self.to_report_request()?,
        })
    }
}

fn date_bound(
    raw: Option<&str>,
    edge: RangeEdge,
) -> Result<chrono::DateTime<chrono::Utc>, ProcessingError> {
    let raw = raw.unwrap_or_default();
    parse_range_bound(raw, edge).ok_or_else(|| ProcessingError::invalid_date(raw))
}
