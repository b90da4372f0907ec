//! Card Processor CLI
//!
//! Command-line interface for validating and classifying payment card
//! transactions from CSV, JSON and XML files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transactions.csv > report.csv
//! cargo run -- --mode strict --strategy sync a.csv b.json c.xml
//! cargo run -- --report network --network visa --format json transactions.csv
//! cargo run -- --report dates --start 2024-01-01 --end 2024-01-31 transactions.csv
//! cargo run -- --report dashboard --range "2024-01-01|2024-03-31" transactions.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 transactions.csv
//! ```
//!
//! Every input file is parsed and validated, all records (accepted and
//! rejected) are stored, and the requested report is written to stdout.
//! Logs go to stderr; set `RUST_LOG` to change the level (default `info`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Invalid arguments, a fatal error, or at least one input file failed

use card_processor::cli;
use card_processor::strategy;
use log::{error, info};
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    let request = match args.to_processing_request() {
        Ok(request) => request,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    // Create the appropriate processing strategy based on CLI arguments
    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    // Report goes to stdout
    let mut output = std::io::stdout();
    let result = match strategy.process(&request, &mut output) {
        Ok(result) => result,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    info!(
        "Processed {} of {} files in {} ms: {} records, {} valid, {} rejected, accepted amount {}",
        result.processed_files.len(),
        result.processed_files.len() + result.failed_files.len(),
        result.processing_time.as_millis(),
        result.total_records,
        result.valid_records,
        result.rejected_records,
        result.accepted_amount
    );

    if !result.success {
        error!("Failed files: {}", result.failed_files.join(", "));
        process::exit(1);
    }
}
