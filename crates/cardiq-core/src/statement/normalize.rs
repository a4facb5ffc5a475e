//! Candidate normalization: raw span text to a canonical typed value.
//!
//! Returning `None` rejects the candidate. Rejection is an expected outcome
//! that only removes that candidate from the field's pool; it never aborts
//! the field or the request.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::config::DateOrder;
use crate::models::statement::FieldValue;

use super::rules::amounts::parse_amount;
use super::rules::cleanup::clean_line;
use super::rules::dates::{parse_date, parse_date_range};
use super::spec::ValueType;

lazy_static! {
    // A locator span sometimes drags the label along ("Card Variant: Gold").
    static ref LABEL_PREFIX: Regex = Regex::new(
        r"(?i)^card[\s:.\-]*(?:variant|type|name)[\s:.\-]*"
    ).unwrap();
}

/// Normalize a raw candidate span according to the field's value type.
pub fn normalize(raw: &str, value_type: ValueType, order: DateOrder) -> Option<FieldValue> {
    match value_type {
        ValueType::Label => normalize_label(raw),
        ValueType::MaskedDigits => normalize_last4(raw),
        ValueType::Date => parse_date(raw, order).map(FieldValue::Date),
        ValueType::DateRange => {
            parse_date_range(raw, order).map(|(start, end)| FieldValue::Range(start, end))
        }
        ValueType::Currency => parse_amount(raw).map(FieldValue::Amount),
    }
}

fn normalize_label(raw: &str) -> Option<FieldValue> {
    let cleaned = clean_line(raw);
    // Keep only the first segment of a multi-part OCR line.
    let first = cleaned.split('|').next().unwrap_or("").trim();
    let stripped = LABEL_PREFIX.replace(first, "").trim().to_string();
    if stripped.is_empty() {
        return None;
    }
    Some(FieldValue::Text(stripped))
}

/// Exactly one run of exactly four consecutive digits; anything else is
/// ambiguous and rejected. The digits are kept verbatim.
fn normalize_last4(raw: &str) -> Option<FieldValue> {
    let runs: Vec<&str> = raw
        .split(|c: char| !c.is_ascii_digit())
        .filter(|r| !r.is_empty())
        .collect();
    match runs.as_slice() {
        [only] if only.len() == 4 => Some(FieldValue::Digits((*only).to_string())),
        _ => None,
    }
}
