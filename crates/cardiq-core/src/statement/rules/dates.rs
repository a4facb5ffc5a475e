//! Date and date-range parsing for statement fields.

use chrono::NaiveDate;

use crate::models::config::DateOrder;

use super::patterns::{
    DATE_DAY_MONTHNAME, DATE_ISO, DATE_MONTHNAME_DAY, DATE_NUMERIC, DATE_TOKEN,
};

/// Parse the first date found in `raw`, trying a small ordered list of
/// formats. Numeric day/month ambiguity is resolved by `order`; if the
/// preferred split is impossible (month > 12) the other order is tried.
pub fn parse_date(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    if let Some(caps) = DATE_ISO.captures(raw) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = DATE_NUMERIC.captures(raw) {
        let a: u32 = caps[1].parse().ok()?;
        let b: u32 = caps[2].parse().ok()?;
        let year = expand_year(caps[3].parse().ok()?);

        let (day, month) = match order {
            DateOrder::DayFirst => (a, b),
            DateOrder::MonthFirst => (b, a),
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
        // The preferred split was impossible; the other one may not be.
        if let Some(date) = NaiveDate::from_ymd_opt(year, day, month) {
            return Some(date);
        }
    }

    if let Some(caps) = DATE_DAY_MONTHNAME.captures(raw) {
        let day: u32 = caps[1].parse().ok()?;
        let year = expand_year(caps[3].parse().ok()?);
        if let Some(month) = month_from_name(&caps[2]) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }

    if let Some(caps) = DATE_MONTHNAME_DAY.captures(raw) {
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        if let Some(month) = month_from_name(&caps[1]) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }

    None
}

/// Parse a billing-cycle style range: two date tokens separated by "to" or a
/// dash. Both ends must parse.
pub fn parse_date_range(raw: &str, order: DateOrder) -> Option<(NaiveDate, NaiveDate)> {
    let tokens: Vec<_> = DATE_TOKEN.find_iter(raw).take(2).collect();
    if tokens.len() < 2 {
        return None;
    }

    let between = &raw[tokens[0].end()..tokens[1].start()];
    let has_separator = between.to_lowercase().contains("to")
        || between.contains('-')
        || between.contains('\u{2013}')
        || between.contains('\u{2014}');
    if !has_separator {
        return None;
    }

    let start = parse_date(tokens[0].as_str(), order)?;
    let end = parse_date(tokens[1].as_str(), order)?;
    Some((start, end))
}

/// Two-digit years: 00-50 land in the 2000s, 51-99 in the 1900s.
fn expand_year(year: i32) -> i32 {
    if year < 100 {
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let prefix = lower.get(..3)?;
    let month = match prefix {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
