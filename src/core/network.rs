//! Card network detection
//!
//! Maps a card number to its issuing network using prefix and length rules.
//! Spaces and hyphens are ignored; anything else that is not a digit makes
//! the prefix rules fail, so such numbers come back as `Unknown`.

use crate::types::CardNetwork;
use std::ops::RangeInclusive;

/// Card number lengths any supported network can have
pub const CARD_LENGTH_RANGE: RangeInclusive<usize> = 13..=19;

/// Detect the card network of a card number
///
/// Returns `CardNetwork::Unknown` for empty input, for numbers whose length
/// (after removing spaces and hyphens) is outside 13..=19, and for numbers
/// matching no network rule.
///
/// # Examples
///
/// ```
/// use card_processor::core::detect_network;
/// use card_processor::types::CardNetwork;
///
/// assert_eq!(detect_network("4532015112830366"), CardNetwork::Visa);
/// assert_eq!(detect_network("3782 822463 10005"), CardNetwork::AmericanExpress);
/// assert_eq!(detect_network("1234567890123456"), CardNetwork::Unknown);
/// ```
pub fn detect_network(card_number: &str) -> CardNetwork {
    if card_number.trim().is_empty() {
        return CardNetwork::Unknown;
    }

    let digits = strip_separators(card_number);
    if !CARD_LENGTH_RANGE.contains(&digits.len()) {
        return CardNetwork::Unknown;
    }

    if is_visa(&digits) {
        CardNetwork::Visa
    } else if is_mastercard(&digits) {
        CardNetwork::MasterCard
    } else if is_american_express(&digits) {
        CardNetwork::AmericanExpress
    } else if is_discover(&digits) {
        CardNetwork::Discover
    } else {
        CardNetwork::Unknown
    }
}

/// Remove the separators people commonly type inside card numbers
pub(crate) fn strip_separators(card_number: &str) -> String {
    card_number
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect()
}

// Visa: starts with 4, length 13, 16 or 19
fn is_visa(digits: &str) -> bool {
    digits.starts_with('4') && matches!(digits.len(), 13 | 16 | 19)
}

// MasterCard: 51-55 or 2221-2720, length 16
fn is_mastercard(digits: &str) -> bool {
    digits.len() == 16
        && (prefix_in(digits, 2, 51..=55) || prefix_in(digits, 4, 2221..=2720))
}

// American Express: 34 or 37, length 15
fn is_american_express(digits: &str) -> bool {
    digits.len() == 15 && (digits.starts_with("34") || digits.starts_with("37"))
}

// Discover: 6011, 65, 644-649 or 622126-622925, length 16
fn is_discover(digits: &str) -> bool {
    digits.len() == 16
        && (digits.starts_with("6011")
            || digits.starts_with("65")
            || prefix_in(digits, 3, 644..=649)
            || prefix_in(digits, 6, 622126..=622925))
}

/// True when the first `len` characters are digits forming a number inside `range`
fn prefix_in(digits: &str, len: usize, range: RangeInclusive<u32>) -> bool {
    digits
        .get(..len)
        .filter(|prefix| prefix.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|prefix| prefix.parse::<u32>().ok())
        .is_some_and(|value| range.contains(&value))
}
