//! Currency amount parsing for statement fields.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse a statement amount like "₹ 45,320.75", "Rs. 1,200.00" or "$99.50".
///
/// Currency symbols/words and thousand separators are stripped; the remainder
/// must be a plain numeral or the amount is rejected (`None`). Rejection is a
/// normal outcome, not an error.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let mut s = raw.trim().to_string();
    for marker in ["₹", "$", "Rs.", "Rs ", "RS.", "INR", "inr", "rs."] {
        s = s.replace(marker, "");
    }
    let s = s.replace([',', ' '], "");
    // Indian statements sometimes suffix amounts with "/-".
    let s = s.trim_end_matches("/-").trim();

    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    Decimal::from_str(s).ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_symbols_and_separators_stripped() {
        assert_eq!(parse_amount("₹ 45,320.75"), Some(dec("45320.75")));
        assert_eq!(parse_amount("Rs. 1,200.00"), Some(dec("1200.00")));
        assert_eq!(parse_amount("$99.50"), Some(dec("99.50")));
        assert_eq!(parse_amount("INR 12,345.00"), Some(dec("12345.00")));
        assert_eq!(parse_amount("2,500.00/-"), Some(dec("2500.00")));
    }

    #[test]
    fn test_plain_numerals() {
        assert_eq!(parse_amount("1234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("500"), Some(dec("500")));
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert_eq!(parse_amount("N/A"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("see reverse"), None);
        assert_eq!(parse_amount("1.2.3.4"), None);
    }
}
