//! Display-only transforms for sensitive values.
//!
//! Nothing here is ever written back into a [`CreditApplication`]; the stored
//! SSN stays in its canonical `123-45-6789` form and masking is recomputed on
//! every render.
//!
//! [`CreditApplication`]: crate::models::CreditApplication

const SSN_MASK_PREFIX: &str = "***-**-";
const SSN_MAX_DIGITS: usize = 9;

/// Masks an SSN down to its last four digits.
///
/// Non-digits are dropped and anything past nine digits is ignored. Partial
/// input still masks, showing whatever tail has been typed so far, so the
/// field can be masked while the applicant is typing.
///
/// ```
/// use credit_core::masking::mask_ssn;
///
/// assert_eq!(mask_ssn("123-45-6789"), "***-**-6789");
/// assert_eq!(mask_ssn("123"), "***-**-123");
/// assert_eq!(mask_ssn(""), "");
/// ```
pub fn mask_ssn(raw: &str) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(SSN_MAX_DIGITS)
        .collect();

    if digits.is_empty() {
        return String::new();
    }

    let tail_start = digits.len().saturating_sub(4);
    let mut masked = String::with_capacity(SSN_MASK_PREFIX.len() + 4);
    masked.push_str(SSN_MASK_PREFIX);
    masked.extend(&digits[tail_start..]);
    masked
}
