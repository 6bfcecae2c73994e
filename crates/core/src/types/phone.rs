//! Phone number input mask.

/// Number of digits the `(NNN) NNN-NNNN` mask holds.
const PHONE_DIGITS: usize = 10;

/// Apply the `(NNN) NNN-NNNN` mask to raw input.
///
/// Non-digit characters are dropped and digits beyond the tenth are ignored.
/// Partial input is formatted as far as it goes, without placeholder
/// characters.
///
/// ```
/// use skymates_core::mask_phone;
///
/// assert_eq!(mask_phone("7144859360"), "(714) 485-9360");
/// assert_eq!(mask_phone("71448"), "(714) 48");
/// assert_eq!(mask_phone(""), "");
/// ```
#[must_use]
pub fn mask_phone(raw: &str) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect();

    let mut masked = String::with_capacity(14);
    for (i, digit) in digits.iter().enumerate() {
        match i {
            0 => masked.push('('),
            3 => masked.push_str(") "),
            6 => masked.push('-'),
            _ => {}
        }
        masked.push(*digit);
    }
    masked
}

/// Whether a masked phone number has all ten digits.
#[must_use]
pub fn is_complete_phone(masked: &str) -> bool {
    masked.chars().filter(char::is_ascii_digit).count() == PHONE_DIGITS
}
