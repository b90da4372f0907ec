//! Core business logic module
//!
//! This module contains the card validation components and the storage they
//! feed:
//! - `network` - Card network detection from number prefixes
//! - `luhn` - Luhn checksum verification
//! - `mask` - Display masking of card numbers
//! - `validator` - Single transaction validation
//! - `batch` - Batch validation and summaries
//! - `traits` - Repository abstraction shared by both stores
//! - `transaction_store` - Single-threaded record storage
//! - `report` - Listing reports and the dashboard
//! - `async` - Concurrent store and parallel batch processor

pub mod r#async;
pub mod batch;
pub mod luhn;
pub mod mask;
pub mod network;
pub mod report;
pub mod traits;
pub mod transaction_store;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::{partition, summarize, validate_batch, BatchValidationRunner};
pub use luhn::is_luhn_valid;
pub use mask::mask_card_number;
pub use network::{detect_network, CARD_LENGTH_RANGE};
pub use r#async::{AsyncTransactionStore, BatchProcessor};
pub use report::{
    build_dashboard, build_report, DashboardRange, DashboardStats, NetworkDistribution, Report,
    ReportQuery, ReportSummary, TransactionView,
};
pub use traits::{Page, TransactionRepository};
pub use transaction_store::TransactionStore;
pub use validator::{validate_card, validate_transaction};
