//! Validation policy and outcome types
//!
//! The validator never fails: every card number maps to either an accepted
//! outcome carrying its network, or a rejected outcome carrying exactly one
//! [`RejectionReason`].

use super::card::CardNetwork;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation policy applied to a whole batch
///
/// Chosen once per request, never per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Real card data: the Luhn checksum is enforced
    Strict,

    /// Synthetic test data: the checksum is skipped and only the length is re-checked
    #[default]
    Lenient,
}

impl ValidationMode {
    /// Map the legacy `isRealData` request flag onto a mode
    pub fn from_real_data(is_real_data: bool) -> Self {
        if is_real_data {
            ValidationMode::Strict
        } else {
            ValidationMode::Lenient
        }
    }

    pub fn enforces_luhn(&self) -> bool {
        matches!(self, ValidationMode::Strict)
    }
}

/// Why a record was rejected
///
/// This is the complete set of reasons the validator can produce. The
/// `Display` text is the stable wire form stored on records and written to reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    NonNumericCharacters,
    UnknownCardType,
    FailedLuhnCheck,
    InvalidLength,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::NonNumericCharacters => "Card number contains non-numeric characters",
            RejectionReason::UnknownCardType => "Unknown card type",
            RejectionReason::FailedLuhnCheck => "Invalid card number (failed Luhn algorithm check)",
            RejectionReason::InvalidLength => "Invalid card number length",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RejectionReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Result of validating one card number
///
/// A rejected outcome always carries `CardNetwork::Unknown`; the constructors
/// are the only way to build one, so the network/reason pairing cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOutcome {
    network: CardNetwork,
    rejection_reason: Option<RejectionReason>,
}

impl ValidationOutcome {
    /// Accepted outcome for a detected network
    pub fn accepted(network: CardNetwork) -> Self {
        Self {
            network,
            rejection_reason: None,
        }
    }

    /// Rejected outcome; the network is reset to `Unknown`
    pub fn rejected(reason: RejectionReason) -> Self {
        Self {
            network: CardNetwork::Unknown,
            rejection_reason: Some(reason),
        }
    }

    pub fn network(&self) -> CardNetwork {
        self.network
    }

    pub fn is_valid(&self) -> bool {
        self.rejection_reason.is_none()
    }

    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        self.rejection_reason
    }
}
