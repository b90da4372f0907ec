//! Transaction validation
//!
//! Combines network detection, the Luhn checksum and length rules into a
//! single accept/reject decision. Each step short-circuits on failure:
//!
//! 1. Every character must be an ASCII digit
//! 2. The number must belong to a known network
//! 3. `Strict` mode: the Luhn checksum must pass.
//!    `Lenient` mode: the length must be within 13..=19.
//!
//! Any rejection resets the network to `Unknown`, including a Luhn failure on
//! a number whose prefix matched a network.

use super::luhn::is_luhn_valid;
use super::mask::mask_card_number;
use super::network::{detect_network, CARD_LENGTH_RANGE};
use crate::types::{
    CardNetwork, ParsedTransaction, RejectionReason, TransactionRecord, ValidationMode,
    ValidationOutcome,
};
use log::debug;

/// Validate a card number under the given mode
///
/// Never fails: malformed and empty input map to a rejected outcome.
///
/// # Examples
///
/// ```
/// use card_processor::core::validate_card;
/// use card_processor::types::{CardNetwork, RejectionReason, ValidationMode};
///
/// let strict = validate_card("4532015112830367", ValidationMode::Strict);
/// assert_eq!(strict.rejection_reason(), Some(RejectionReason::FailedLuhnCheck));
/// assert_eq!(strict.network(), CardNetwork::Unknown);
///
/// let lenient = validate_card("4532015112830367", ValidationMode::Lenient);
/// assert!(lenient.is_valid());
/// assert_eq!(lenient.network(), CardNetwork::Visa);
/// ```
pub fn validate_card(card_number: &str, mode: ValidationMode) -> ValidationOutcome {
    if !card_number.bytes().all(|b| b.is_ascii_digit()) {
        return reject(card_number, RejectionReason::NonNumericCharacters);
    }

    let network = detect_network(card_number);
    debug!(
        "Detected {} for card {}",
        network,
        mask_card_number(card_number)
    );
    if network == CardNetwork::Unknown {
        return reject(card_number, RejectionReason::UnknownCardType);
    }

    if mode.enforces_luhn() {
        if !is_luhn_valid(card_number) {
            return reject(card_number, RejectionReason::FailedLuhnCheck);
        }
    } else {
        // Detection already gates length for every current network; this
        // only fires if a network with other lengths is added.
        if !CARD_LENGTH_RANGE.contains(&card_number.len()) {
            return reject(card_number, RejectionReason::InvalidLength);
        }
        debug!(
            "Skipped Luhn check for test data card {}",
            mask_card_number(card_number)
        );
    }

    ValidationOutcome::accepted(network)
}

/// Validate a parsed transaction and build its finalized record
pub fn validate_transaction(parsed: ParsedTransaction, mode: ValidationMode) -> TransactionRecord {
    let outcome = validate_card(&parsed.card_number, mode);
    TransactionRecord::from_parsed(parsed, outcome)
}

fn reject(card_number: &str, reason: RejectionReason) -> ValidationOutcome {
    debug!(
        "Rejected card {}: {}",
        mask_card_number(card_number),
        reason
    );
    ValidationOutcome::rejected(reason)
}
