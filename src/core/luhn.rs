//! Luhn (mod 10) checksum

use super::network::CARD_LENGTH_RANGE;

/// Check a card number against the Luhn checksum
///
/// Returns `false` rather than failing when the input is blank, contains
/// anything other than ASCII digits (spaces and hyphens included), or has a
/// length outside 13..=19.
///
/// Digits are processed right to left; every second digit starting with the
/// one left of the check digit is doubled, with 9 subtracted from doubles
/// above 9. The number is valid when the sum is a multiple of 10.
///
/// # Examples
///
/// ```
/// use card_processor::core::is_luhn_valid;
///
/// assert!(is_luhn_valid("4532015112830366"));
/// assert!(!is_luhn_valid("4532015112830367"));
/// ```
pub fn is_luhn_valid(card_number: &str) -> bool {
    if card_number.trim().is_empty()
        || !card_number.bytes().all(|b| b.is_ascii_digit())
        || !CARD_LENGTH_RANGE.contains(&card_number.len())
    {
        return false;
    }

    let sum: u32 = card_number
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(index, digit)| {
            if index % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}
