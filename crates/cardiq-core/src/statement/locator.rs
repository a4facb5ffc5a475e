//! Candidate location: finding text spans that may hold a field's value.
//!
//! Three strategies run per field, in priority order: bank-specific
//! template regexes, label-proximity scanning, and a value-shape fallback.
//! All of them run on every request so that agreement between strategies is
//! observable downstream; duplicates within a strategy are merged keeping the
//! higher strength.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::config::{BankProfile, ScoringConfig};
use crate::models::statement::{FieldKey, RawDocument};

use super::rules::cleanup::clean_line;
use super::rules::patterns::{
    BARE_AMOUNT, CARD_CONTEXT, CURRENCY_TOKEN, DATE_TOKEN, DUE_CONTEXT, ENDING_LAST4,
    FOUR_DIGIT_GROUP, VARIANT_TOKEN,
};
use super::spec::{FieldSpec, ValueType, FIELD_SPECS};

/// Which locator strategy produced a candidate. Order is priority order and
/// drives tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strategy {
    /// Bank-specific template pattern.
    BankTemplate,
    /// Label alias found near the value.
    LabelProximity,
    /// Value-shape match with no label.
    TypePattern,
}

/// A provisional text span hypothesized to contain a field's value.
/// Created and discarded within a single field resolution.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The raw span handed to the normalizer.
    pub raw: String,
    /// Cleaned originating line(s), kept for auditability.
    pub snippet: String,
    /// Line index of the span.
    pub line: usize,
    pub strategy: Strategy,
    /// Raw locator strength in [0, 1].
    pub strength: f32,
}

struct AliasMatcher {
    alias: &'static str,
    regex: Regex,
}

lazy_static! {
    // One separator-tolerant regex per label alias: "payment due date" also
    // matches "Payment  Due-Date:" and the glued forms OCR produces.
    static ref ALIAS_MATCHERS: HashMap<FieldKey, Vec<AliasMatcher>> = {
        let mut map = HashMap::new();
        for spec in &FIELD_SPECS {
            let matchers = spec
                .labels
                .iter()
                .map(|&alias| {
                    let words: Vec<String> =
                        alias.split_whitespace().map(regex::escape).collect();
                    let pattern = format!(r"(?i)\b{}\b", words.join(r"[\s:.\-]*"));
                    AliasMatcher {
                        alias,
                        // Built from static words, cannot fail.
                        regex: Regex::new(&pattern).unwrap(),
                    }
                })
                .collect();
            map.insert(spec.key, matchers);
        }
        map
    };
}

/// Collect candidates for one field from all strategies.
pub fn locate(
    doc: &RawDocument,
    spec: &FieldSpec,
    profile: Option<&BankProfile>,
    scoring: &ScoringConfig,
) -> Vec<Candidate> {
    let lines: Vec<String> = doc.lines().iter().map(|l| clean_line(l)).collect();

    let mut candidates = template_candidates(doc, spec, profile, scoring);
    candidates.extend(label_candidates(&lines, spec, scoring));
    candidates.extend(type_candidates(&lines, spec, scoring));

    merge_duplicates(candidates)
}

fn template_candidates(
    doc: &RawDocument,
    spec: &FieldSpec,
    profile: Option<&BankProfile>,
    scoring: &ScoringConfig,
) -> Vec<Candidate> {
    let Some(regex) = profile.and_then(|p| p.templates.get(&spec.key)) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for caps in regex.captures_iter(doc.text()) {
        let Some(whole) = caps.get(0) else { continue };
        let value = caps.get(1).unwrap_or(whole);
        let line = doc.text()[..whole.start()].matches('\n').count();
        let snippet = doc
            .lines()
            .get(line)
            .map(|l| clean_line(l))
            .unwrap_or_default();
        out.push(Candidate {
            raw: value.as_str().trim().to_string(),
            snippet,
            line,
            strategy: Strategy::BankTemplate,
            strength: scoring.template_strength,
        });
    }
    out
}

fn label_candidates(lines: &[String], spec: &FieldSpec, scoring: &ScoringConfig) -> Vec<Candidate> {
    let Some(matchers) = ALIAS_MATCHERS.get(&spec.key) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        for matcher in matchers {
            let Some(m) = matcher.regex.find(line) else {
                continue;
            };

            let remainder = line[m.end()..]
                .trim_start_matches(|c: char| c == ':' || c == '-' || c.is_whitespace());
            if !remainder.is_empty() {
                let strength = if is_exact(m.as_str(), matcher.alias) {
                    scoring.label_exact_strength
                } else {
                    scoring.label_fuzzy_strength
                };
                out.push(Candidate {
                    raw: remainder.to_string(),
                    snippet: line.clone(),
                    line: i,
                    strategy: Strategy::LabelProximity,
                    strength,
                });
            } else if let Some((j, next)) = next_nonempty(lines, i) {
                // The value may sit on the following line, unless that line
                // is itself another field's label.
                if !starts_with_other_label(next, spec.key) {
                    out.push(Candidate {
                        raw: next.clone(),
                        snippet: format!("{line} | {next}"),
                        line: j,
                        strategy: Strategy::LabelProximity,
                        strength: scoring.label_next_line_strength,
                    });
                }
            }
            break; // first alias hit on a line is enough
        }
    }
    out
}

fn type_candidates(lines: &[String], spec: &FieldSpec, scoring: &ScoringConfig) -> Vec<Candidate> {
    let base = scoring.type_pattern_strength;
    let mut out = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        match spec.value_type {
            ValueType::Currency => {
                let strength = with_context(base, scoring, DUE_CONTEXT.is_match(line));
                for caps in CURRENCY_TOKEN.captures_iter(line) {
                    if let Some(amount) = caps.get(1) {
                        out.push(shape_candidate(amount.as_str(), line, i, strength));
                    }
                }
                // Amounts without a currency marker only count on lines that
                // talk about money owed, and never inside a date token:
                // "12.08.2024" contains the amount-shaped "12.08".
                if DUE_CONTEXT.is_match(line) {
                    let date_spans: Vec<(usize, usize)> = DATE_TOKEN
                        .find_iter(line)
                        .map(|m| (m.start(), m.end()))
                        .collect();
                    for m in BARE_AMOUNT.find_iter(line) {
                        let inside_date = date_spans
                            .iter()
                            .any(|&(start, end)| m.start() >= start && m.end() <= end);
                        if inside_date {
                            continue;
                        }
                        out.push(shape_candidate(m.as_str(), line, i, base));
                    }
                }
            }
            ValueType::Date => {
                let strength = with_context(base, scoring, DUE_CONTEXT.is_match(line));
                for m in DATE_TOKEN.find_iter(line) {
                    out.push(shape_candidate(m.as_str(), line, i, strength));
                }
            }
            ValueType::DateRange => {
                let tokens: Vec<_> = DATE_TOKEN.find_iter(line).take(2).collect();
                if tokens.len() == 2 {
                    let span = &line[tokens[0].start()..tokens[1].end()];
                    out.push(shape_candidate(span, line, i, base));
                }
            }
            ValueType::MaskedDigits => {
                // Year-shaped groups never count, however they were found:
                // "membership ending 2024" is not a card number.
                for caps in ENDING_LAST4.captures_iter(line) {
                    if let Some(digits) = caps.get(1) {
                        if year_like(digits.as_str()) {
                            continue;
                        }
                        out.push(shape_candidate(
                            digits.as_str(),
                            line,
                            i,
                            with_context(base, scoring, true),
                        ));
                    }
                }
                // Any other 4-digit group only counts on card-talking lines.
                if CARD_CONTEXT.is_match(line) {
                    for caps in FOUR_DIGIT_GROUP.captures_iter(line) {
                        if let Some(digits) = caps.get(1) {
                            if year_like(digits.as_str()) {
                                continue;
                            }
                            out.push(shape_candidate(digits.as_str(), line, i, base));
                        }
                    }
                }
            }
            ValueType::Label => {
                for caps in VARIANT_TOKEN.captures_iter(line) {
                    if let Some(word) = caps.get(1) {
                        let strength = with_context(base, scoring, CARD_CONTEXT.is_match(line));
                        out.push(shape_candidate(word.as_str(), line, i, strength));
                    }
                }
            }
        }
    }
    out
}

fn shape_candidate(raw: &str, line: &str, index: usize, strength: f32) -> Candidate {
    Candidate {
        raw: raw.trim().to_string(),
        snippet: line.to_string(),
        line: index,
        strategy: Strategy::TypePattern,
        strength,
    }
}

fn with_context(base: f32, scoring: &ScoringConfig, has_context: bool) -> f32 {
    if has_context {
        base + scoring.type_context_bonus
    } else {
        base
    }
}

fn year_like(digits: &str) -> bool {
    digits.starts_with("19") || digits.starts_with("20")
}

fn is_exact(matched: &str, alias: &str) -> bool {
    matched
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        == alias
}

fn next_nonempty(lines: &[String], after: usize) -> Option<(usize, &String)> {
    lines
        .iter()
        .enumerate()
        .skip(after + 1)
        .find(|(_, l)| !l.is_empty())
}

fn starts_with_other_label(line: &str, key: FieldKey) -> bool {
    ALIAS_MATCHERS.iter().any(|(other, matchers)| {
        *other != key
            && matchers
                .iter()
                .any(|m| m.regex.find(line).is_some_and(|found| found.start() == 0))
    })
}

/// Merge candidates that the same strategy produced for the same span,
/// keeping the higher strength. Equal spans from different strategies stay
/// separate so agreement between strategies remains observable.
fn merge_duplicates(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut merged: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let key = candidate.raw.to_lowercase();
        if let Some(existing) = merged
            .iter_mut()
            .find(|c| c.strategy == candidate.strategy && c.raw.to_lowercase() == key)
        {
            if candidate.strength > existing.strength {
                *existing = candidate;
            }
        } else {
            merged.push(candidate);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::models::config::{BankProfileConfig, BankRegistry, BanksConfig};
    use crate::statement::spec::spec_for;

    use super::*;

    fn doc(text: &str) -> RawDocument {
        RawDocument::new(text).unwrap()
    }

    fn scoring() -> ScoringConfig {
        ScoringConfig::default()
    }

    #[test]
    fn test_label_same_line() {
        let doc = doc("Payment Due Date: 12/08/2024\n");
        let spec = spec_for(FieldKey::PaymentDueDate);
        let candidates = locate(&doc, spec, None, &scoring());

        let labeled: Vec<_> = candidates
            .iter()
            .filter(|c| c.strategy == Strategy::LabelProximity)
            .collect();
        assert_eq!(labeled.len(), 1);
        assert_eq!(labeled[0].raw, "12/08/2024");
        assert_eq!(labeled[0].strength, scoring().label_exact_strength);
    }

    #[test]
    fn test_label_value_on_next_line() {
        let doc = doc("Payment Due Date\n\n12/08/2024\nother text");
        let spec = spec_for(FieldKey::PaymentDueDate);
        let candidates = locate(&doc, spec, None, &scoring());

        let labeled: Vec<_> = candidates
            .iter()
            .filter(|c| c.strategy == Strategy::LabelProximity)
            .collect();
        assert_eq!(labeled.len(), 1);
        assert_eq!(labeled[0].raw, "12/08/2024");
        assert_eq!(labeled[0].strength, scoring().label_next_line_strength);
    }

    #[test]
    fn test_next_line_disqualified_by_other_label() {
        let doc = doc("Payment Due Date\nTotal Balance Due: 500.00\n");
        let spec = spec_for(FieldKey::PaymentDueDate);
        let candidates = locate(&doc, spec, None, &scoring());

        assert!(
            candidates
                .iter()
                .all(|c| c.strategy != Strategy::LabelProximity)
        );
    }

    #[test]
    fn test_fuzzy_label_scores_lower() {
        let doc = doc("PaymentDueDate:12/08/2024\n");
        let spec = spec_for(FieldKey::PaymentDueDate);
        let candidates = locate(&doc, spec, None, &scoring());

        let labeled: Vec<_> = candidates
            .iter()
            .filter(|c| c.strategy == Strategy::LabelProximity)
            .collect();
        assert_eq!(labeled.len(), 1);
        assert_eq!(labeled[0].strength, scoring().label_fuzzy_strength);
    }

    #[test]
    fn test_bank_template_strategy() {
        let config = BanksConfig {
            banks: vec![BankProfileConfig {
                id: "acme_bank".to_string(),
                identifiers: vec!["Acme Bank".to_string()],
                field_patterns: std::collections::HashMap::from([(
                    FieldKey::CardLast4,
                    r"Acme Card \*{4}(\d{4})".to_string(),
                )]),
                ..Default::default()
            }],
            ..Default::default()
        };
        let registry = BankRegistry::from_config(&config).unwrap();
        let profile = &registry.profiles()[0];

        let doc = doc("Acme Bank\nAcme Card ****4532\n");
        let spec = spec_for(FieldKey::CardLast4);
        let candidates = locate(&doc, spec, Some(profile), &scoring());

        let templated: Vec<_> = candidates
            .iter()
            .filter(|c| c.strategy == Strategy::BankTemplate)
            .collect();
        assert_eq!(templated.len(), 1);
        assert_eq!(templated[0].raw, "4532");
        assert_eq!(templated[0].line, 1);
    }

    #[test]
    fn test_type_pattern_currency() {
        let doc = doc("some rewards text\n₹ 45,320.75 is payable\n");
        let spec = spec_for(FieldKey::TotalBalanceDue);
        let candidates = locate(&doc, spec, None, &scoring());

        let shaped: Vec<_> = candidates
            .iter()
            .filter(|c| c.strategy == Strategy::TypePattern)
            .collect();
        assert!(!shaped.is_empty());
        assert_eq!(shaped[0].raw, "45,320.75");
        // "payable" context earns the bump.
        assert_eq!(
            shaped[0].strength,
            scoring().type_pattern_strength + scoring().type_context_bonus
        );
    }

    #[test]
    fn test_type_pattern_last4_needs_card_context() {
        let doc = doc("Gold Card ending 4532\nIn the year 2024\n");
        let spec = spec_for(FieldKey::CardLast4);
        let candidates = locate(&doc, spec, None, &scoring());

        let shaped: Vec<_> = candidates
            .iter()
            .filter(|c| c.strategy == Strategy::TypePattern)
            .collect();
        assert_eq!(shaped.len(), 1);
        assert_eq!(shaped[0].raw, "4532");
    }

    #[test]
    fn test_duplicates_within_strategy_merged() {
        // The same amount on two due-context lines, same strategy: one
        // candidate survives with the higher strength.
        let doc = doc("Total payable ₹ 100.00\nbalance is 100.00\n");
        let spec = spec_for(FieldKey::TotalBalanceDue);
        let candidates = locate(&doc, spec, None, &scoring());

        let same: Vec<_> = candidates
            .iter()
            .filter(|c| c.strategy == Strategy::TypePattern && c.raw == "100.00")
            .collect();
        assert_eq!(same.len(), 1);
    }

    #[test]
    fn test_bare_amount_inside_date_token_skipped() {
        // "12.08" sits inside the dotted date and must not surface as an
        // amount candidate.
        let doc = doc("Payment Due Date: 12.08.2024\n");
        let spec = spec_for(FieldKey::TotalBalanceDue);
        let candidates = locate(&doc, spec, None, &scoring());

        assert!(candidates.is_empty());
    }

    #[test]
    fn test_alias_must_end_on_word_boundary() {
        let doc = doc("Amount duelist standings 500\n");
        let spec = spec_for(FieldKey::TotalBalanceDue);
        let candidates = locate(&doc, spec, None, &scoring());

        assert!(
            candidates
                .iter()
                .all(|c| c.strategy != Strategy::LabelProximity)
        );
    }

    #[test]
    fn test_year_after_ending_rejected() {
        let doc = doc("membership ending 2024\n");
        let spec = spec_for(FieldKey::CardLast4);
        let candidates = locate(&doc, spec, None, &scoring());

        assert!(candidates.is_empty());
    }

    #[test]
    fn test_cross_strategy_duplicates_kept() {
        let doc = doc("Payment Due Date: 12/08/2024\n");
        let spec = spec_for(FieldKey::PaymentDueDate);
        let candidates = locate(&doc, spec, None, &scoring());

        let strategies: std::collections::HashSet<_> = candidates
            .iter()
            .filter(|c| c.raw == "12/08/2024")
            .map(|c| c.strategy)
            .collect();
        assert!(strategies.contains(&Strategy::LabelProximity));
        assert!(strategies.contains(&Strategy::TypePattern));
    }
}
