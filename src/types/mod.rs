//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `card`: Card network identification
//! - `transaction`: Parsed and validated transaction records
//! - `validation`: Validation modes, rejection reasons and outcomes
//! - `processing`: Per-run processing summaries
//! - `error`: Error types for the card processor

pub mod card;
pub mod error;
pub mod processing;
pub mod transaction;
pub mod validation;

pub use card::CardNetwork;
pub use error::ProcessingError;
pub use processing::{BatchStats, ProcessingResult};
pub use transaction::{ParsedTransaction, TransactionId, TransactionRecord};
pub use validation::{RejectionReason, ValidationMode, ValidationOutcome};
