//! Card network types
//!
//! Defines the set of card-issuing schemes the processor recognises.

use super::error::ProcessingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card-issuing scheme derived from a card number
///
/// The network is never taken from input data; it is always derived by
/// [`crate::core::detect_network`]. Rejected records always carry `Unknown`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum CardNetwork {
    Visa,
    MasterCard,
    AmericanExpress,
    Discover,
    #[default]
    Unknown,
}

impl CardNetwork {
    /// Every network, in reporting order
    pub const ALL: [CardNetwork; 5] = [
        CardNetwork::Visa,
        CardNetwork::MasterCard,
        CardNetwork::AmericanExpress,
        CardNetwork::Discover,
        CardNetwork::Unknown,
    ];

    /// Human readable name used in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            CardNetwork::Visa => "Visa",
            CardNetwork::MasterCard => "MasterCard",
            CardNetwork::AmericanExpress => "American Express",
            CardNetwork::Discover => "Discover",
            CardNetwork::Unknown => "Unknown",
        }
    }

    /// Identifier form of the variant (`AmericanExpress` rather than `American Express`)
    pub fn variant_name(&self) -> &'static str {
        match self {
            CardNetwork::Visa => "Visa",
            CardNetwork::MasterCard => "MasterCard",
            CardNetwork::AmericanExpress => "AmericanExpress",
            CardNetwork::Discover => "Discover",
            CardNetwork::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CardNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for CardNetwork {
    type Err = ProcessingError;

    /// Parse a network from its variant or display name, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CardNetwork::ALL
            .into_iter()
            .find(|network| {
                network.variant_name().eq_ignore_ascii_case(wanted)
                    || network.display_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ProcessingError::unknown_card_network(s))
    }
}
