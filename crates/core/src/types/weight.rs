//! Pack weights as written on the label (`"250g"`, `"500 g"`).
//!
//! Weights are free text on the backend. Only the leading integer is
//! meaningful and is read as grams; anything without one counts as zero.

/// Parse the leading integer of a weight label as grams.
///
/// Leading whitespace and an optional sign are accepted; parsing stops at the
/// first non-digit. Labels without a leading number yield `0`.
///
/// ```
/// use chickyen_core::grams_prefix;
///
/// assert_eq!(grams_prefix("250g"), 250);
/// assert_eq!(grams_prefix(" 500 g"), 500);
/// assert_eq!(grams_prefix("approx 1kg"), 0);
/// ```
#[must_use]
pub fn grams_prefix(label: &str) -> i64 {
    let trimmed = label.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, trimmed.get(1..).unwrap_or_default()),
        Some(b'+') => (false, trimmed.get(1..).unwrap_or_default()),
        _ => (false, trimmed),
    };

    let value = digits
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0_i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d)));

    if negative { -value } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_grams() {
        assert_eq!(grams_prefix("100g"), 100);
        assert_eq!(grams_prefix("0g"), 0);
    }

    #[test]
    fn test_whitespace_and_sign() {
        assert_eq!(grams_prefix("  750 grams"), 750);
        assert_eq!(grams_prefix("+20g"), 20);
        assert_eq!(grams_prefix("-5g"), -5);
    }

    #[test]
    fn test_unparsable_defaults_to_zero() {
        assert_eq!(grams_prefix(""), 0);
        assert_eq!(grams_prefix("g250"), 0);
        assert_eq!(grams_prefix("-"), 0);
    }

    #[test]
    fn test_stops_at_first_non_digit() {
        assert_eq!(grams_prefix("1.5kg"), 1);
    }
}
