//! Display masking for card numbers

use super::network::strip_separators;

const MASK_PREFIX: &str = "****-****-****-";

/// Mask a card number for display, keeping only its last four digits
///
/// The output always has three masked groups regardless of the card's
/// length. Numbers shorter than four characters (after removing spaces and
/// hyphens) are returned as they are, and blank input yields an empty string.
///
/// # Examples
///
/// ```
/// use card_processor::core::mask_card_number;
///
/// assert_eq!(mask_card_number("4532015112830366"), "****-****-****-0366");
/// assert_eq!(mask_card_number("123"), "123");
/// assert_eq!(mask_card_number(""), "");
/// ```
pub fn mask_card_number(card_number: &str) -> String {
    if card_number.trim().is_empty() {
        return String::new();
    }

    let cleaned = strip_separators(card_number);
    let count = cleaned.chars().count();
    if count < 4 {
        return cleaned;
    }

    let last_four: String = cleaned.chars().skip(count - 4).collect();
    format!("{}{}", MASK_PREFIX, last_four)
}
