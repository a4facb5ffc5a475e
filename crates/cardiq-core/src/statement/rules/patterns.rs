//! Common regex patterns for statement field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Currency token: symbol or word followed by an amount, e.g. "₹ 45,320.75"
    pub static ref CURRENCY_TOKEN: Regex = Regex::new(
        r"(?:[₹$]|\bRs\.?|\bINR\b)\s*([\d,]+(?:\.\d{1,2})?)"
    ).unwrap();

    // A labeled amount even without a currency symbol, e.g. "Total Due: 45,320.75"
    pub static ref BARE_AMOUNT: Regex = Regex::new(
        r"\b\d[\d,]*\.\d{2}\b"
    ).unwrap();

    // Numeric dates: 12/08/2024, 12-08-24, 12.08.2024
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{2,4})\b"
    ).unwrap();

    // ISO-style: 2024-08-12
    pub static ref DATE_ISO: Regex = Regex::new(
        r"\b(\d{4})[/\-.](\d{1,2})[/\-.](\d{1,2})\b"
    ).unwrap();

    // Day then month name: "12 Aug 2024", "12-Aug-2024", "12 August, 2024"
    pub static ref DATE_DAY_MONTHNAME: Regex = Regex::new(
        r"(?i)\b(\d{1,2})[\s/\-]*([A-Za-z]{3,9})[\s/\-,]+(\d{2,4})\b"
    ).unwrap();

    // Month name then day: "Aug 12, 2024"
    pub static ref DATE_MONTHNAME_DAY: Regex = Regex::new(
        r"(?i)\b([A-Za-z]{3,9})[\s/\-]+(\d{1,2}),?\s+(\d{4})\b"
    ).unwrap();

    // Any date-shaped token, for range splitting and the type-pattern fallback.
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"(?ix)
          \d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}
        | \d{4}[/\-.]\d{1,2}[/\-.]\d{1,2}
        | \d{1,2}[\ /\-][A-Za-z]{3,9}[\ /\-,]+\d{2,4}
        | [A-Za-z]{3,9}\ +\d{1,2},?\ +\d{4}
        "
    ).unwrap();

    // "ending 4532", "ending with 4532", "last 4 digits: 4532"
    pub static ref ENDING_LAST4: Regex = Regex::new(
        r"(?i)\b(?:ending|last)\s*(?:number|with|in|4|four)?\s*(?:digits?)?\s*[:\-]?\s*(\d{4})\b"
    ).unwrap();

    pub static ref FOUR_DIGIT_GROUP: Regex = Regex::new(r"\b(\d{4})\b").unwrap();

    // Lines that talk about the card itself.
    pub static ref CARD_CONTEXT: Regex = Regex::new(
        r"(?i)\b(?:card|ending|last)\b"
    ).unwrap();

    // Known card variant vocabulary across the targeted issuers.
    pub static ref VARIANT_TOKEN: Regex = Regex::new(
        r"(?i)\b(Platinum|Gold|Regalia|Magnus|Prime|Infinite|Classic|Elite)\b"
    ).unwrap();

    // Lines that talk about money owed.
    pub static ref DUE_CONTEXT: Regex = Regex::new(
        r"(?i)\b(?:due|payable|balance|outstanding)\b"
    ).unwrap();

    // OCR cleanup: "Date:12/08" -> "Date: 12/08"
    pub static ref GLUED_COLON: Regex = Regex::new(
        r"([A-Za-z0-9]):([A-Za-z0-9])"
    ).unwrap();

    // OCR cleanup: "12to15", "2024to01-Feb". Only repaired when a digit is
    // adjacent; letter-adjacent repair would split words like "October".
    pub static ref GLUED_TO_AFTER_DIGIT: Regex = Regex::new(
        r"(?i)(\d)to([A-Za-z0-9])"
    ).unwrap();
    pub static ref GLUED_TO_BEFORE_DIGIT: Regex = Regex::new(
        r"(?i)([A-Za-z0-9])to(\d)"
    ).unwrap();
}
