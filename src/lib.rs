//! Card Processor Library
//! # Overview
//!
//! This library validates and classifies payment card transactions read
//! from CSV, JSON and XML files, with both a sync and an async processing
//! strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (CardNetwork, TransactionRecord, ValidationMode, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::network`] - Card network detection from number prefixes
//!   - [`core::luhn`] - Luhn checksum verification
//!   - [`core::validator`] - Per-transaction validation
//!   - [`core::batch`] - Batch validation
//!   - [`core::transaction_store`] - Storage of validated records
//!   - [`core::report`] - Listing reports and dashboard statistics
//! - [`io`] - File parsing and report output
//! - [`strategy`] - Sync and async processing pipelines
//!
//! # Validation
//!
//! Each card number is checked in order, stopping at the first failure:
//!
//! 1. **Characters**: only ASCII digits are accepted
//! 2. **Network**: the prefix and length must match Visa, MasterCard,
//!    American Express or Discover
//! 3. **Checksum**: in strict mode the Luhn check must pass; in lenient mode
//!    only the length is re-checked
//!
//! Rejected transactions are stored with network `Unknown` and exactly one
//! rejection reason. Only masked card numbers ever appear in reports or logs.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{
    detect_network, is_luhn_valid, mask_card_number, validate_batch, validate_card,
    validate_transaction, AsyncTransactionStore, BatchValidationRunner, Page,
    TransactionRepository, TransactionStore,
};
pub use types::{
    CardNetwork, ParsedTransaction, ProcessingError, ProcessingResult, RejectionReason,
    TransactionId, TransactionRecord, ValidationMode, ValidationOutcome,
};
