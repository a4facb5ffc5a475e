//! Statement parser: per-field resolution and request orchestration.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::{BankProfile, BankRegistry, DateOrder, ScoringConfig};
use crate::models::statement::{
    ExtractionResult, ExtractionStatus, FieldKey, FieldResult, FieldValue, RawDocument,
    StatementFields, MAX_SNIPPET_LEN, UNKNOWN_BANK,
};

use super::bank::identify_bank;
use super::locator::{locate, Candidate};
use super::normalize::normalize;
use super::rules::lexical::token_similarity;
use super::score::score;
use super::spec::{FieldSpec, FIELD_SPECS};
use super::StatementExtractor;

/// A candidate that survived normalization, awaiting scoring.
struct Survivor {
    candidate: Candidate,
    value: FieldValue,
    confidence: f32,
}

/// Statement field extraction engine.
///
/// Stateless per request: one [`RawDocument`] in, one [`ExtractionResult`]
/// out. The registry is shared read-only, so one parser serves any number of
/// threads.
pub struct StatementParser {
    registry: Arc<BankRegistry>,
    scoring: ScoringConfig,
    date_order: DateOrder,
}

impl StatementParser {
    /// Create a parser over a bank registry with default scoring.
    pub fn new(registry: Arc<BankRegistry>) -> Self {
        Self {
            registry,
            scoring: ScoringConfig::default(),
            date_order: DateOrder::default(),
        }
    }

    /// Override the scoring coefficients.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Override the numeric date-order convention.
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }

    /// Run the full pipeline: identify the bank, resolve each of the five
    /// fields, assemble the result. Every stage is deterministic and
    /// side-effect-free; an unresolvable field or an unidentified bank
    /// degrades into warnings, never into a failure.
    pub fn parse(&self, doc: &RawDocument) -> ExtractionResult {
        let started = Instant::now();
        let mut warnings = Vec::new();

        let (bank_id, profile) = identify_bank(doc, &self.registry);
        if bank_id == UNKNOWN_BANK {
            warnings.push("no bank profile matched; using generic heuristics".to_string());
        }

        let mut fields = StatementFields::default();
        for spec in &FIELD_SPECS {
            let result = self.resolve_field(doc, spec, profile);
            if !result.is_resolved() {
                warnings.push(format!("could not resolve {}", spec.key));
            }
            match spec.key {
                FieldKey::CardVariant => fields.card_variant = result,
                FieldKey::CardLast4 => fields.card_last4 = result,
                FieldKey::BillingCycle => fields.billing_cycle = result,
                FieldKey::PaymentDueDate => fields.payment_due_date = result,
                FieldKey::TotalBalanceDue => fields.total_balance_due = result,
            }
        }

        let resolved = fields.iter().filter(|f| f.is_resolved()).count();
        info!(
            bank = %bank_id,
            resolved,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "parsed statement"
        );

        ExtractionResult {
            status: ExtractionStatus::Success,
            bank_name: self.registry.display_name(&bank_id),
            bank_id,
            fields,
            warnings,
        }
    }

    /// Resolve one field: locate candidates, normalize them (dropping
    /// rejects), score the survivors, and pick the best.
    fn resolve_field(
        &self,
        doc: &RawDocument,
        spec: &FieldSpec,
        profile: Option<&BankProfile>,
    ) -> FieldResult {
        let candidates = locate(doc, spec, profile, &self.scoring);

        let mut survivors: Vec<Survivor> = candidates
            .into_iter()
            .filter_map(|candidate| {
                normalize(&candidate.raw, spec.value_type, self.date_order).map(|value| {
                    Survivor {
                        candidate,
                        value,
                        confidence: 0.0,
                    }
                })
            })
            .collect();

        if survivors.is_empty() {
            return FieldResult::absent(spec.key);
        }

        // Corroboration: distinct strategies agreeing on the same value.
        for i in 0..survivors.len() {
            let rendered = survivors[i].value.to_string();
            let agreeing = survivors
                .iter()
                .filter(|s| s.value.to_string() == rendered)
                .map(|s| s.candidate.strategy)
                .collect::<std::collections::HashSet<_>>()
                .len();
            let lexical = token_similarity(spec.query, &survivors[i].candidate.snippet);
            survivors[i].confidence =
                score(survivors[i].candidate.strength, agreeing, lexical, &self.scoring);
        }

        survivors.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.candidate.strategy.cmp(&b.candidate.strategy))
                .then_with(|| a.candidate.snippet.len().cmp(&b.candidate.snippet.len()))
        });

        let best = &survivors[0];
        debug!(
            field = %spec.key,
            value = %best.value,
            confidence = best.confidence,
            strategy = ?best.candidate.strategy,
            "resolved field"
        );

        FieldResult {
            key: spec.key,
            value: Some(best.value.clone()),
            confidence: best.confidence,
            snippet: truncate_snippet(&best.candidate.snippet),
        }
    }
}

impl StatementExtractor for StatementParser {
    fn extract(&self, doc: &RawDocument) -> ExtractionResult {
        self.parse(doc)
    }

    fn extract_from_text(&self, text: &str) -> Result<ExtractionResult, ExtractionError> {
        let doc = RawDocument::new(text)?;
        Ok(self.parse(&doc))
    }
}

fn truncate_snippet(snippet: &str) -> String {
    if snippet.chars().count() <= MAX_SNIPPET_LEN {
        snippet.to_string()
    } else {
        snippet.chars().take(MAX_SNIPPET_LEN).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use crate::models::config::{BankProfileConfig, BanksConfig};

    use super::*;

    fn acme_registry() -> Arc<BankRegistry> {
        let config = BanksConfig {
            banks: vec![BankProfileConfig {
                id: "acme_bank".to_string(),
                display_name: Some("Acme Bank".to_string()),
                identifiers: vec!["Acme Bank".to_string()],
                field_patterns: HashMap::new(),
                ..Default::default()
            }],
            ..Default::default()
        };
        Arc::new(BankRegistry::from_config(&config).unwrap())
    }

    fn parser() -> StatementParser {
        StatementParser::new(acme_registry())
    }

    #[test]
    fn test_acme_scenario() {
        let text = "Acme Bank Credit Card Statement\n\
                    Gold Card ending 4532\n\
                    Payment Due Date: 12/08/2024\n";
        let doc = RawDocument::new(text).unwrap();
        let result = parser().parse(&doc);

        assert_eq!(result.status, ExtractionStatus::Success);
        assert_eq!(result.bank_id, "acme_bank");
        assert_eq!(result.bank_name, "Acme Bank");

        let last4 = &result.fields.card_last4;
        assert_eq!(
            last4.value.as_ref().map(|v| v.to_string()),
            Some("4532".to_string())
        );
        assert!(last4.confidence > 0.0);

        let due = &result.fields.payment_due_date;
        assert_eq!(
            due.value.as_ref().map(|v| v.to_string()),
            Some("2024-08-12".to_string())
        );
        assert!(due.confidence > 0.0);
        assert!(due.snippet.contains("12/08/2024"));
    }

    #[test]
    fn test_irrelevant_text_all_fields_absent() {
        let doc = RawDocument::new("nothing about banking here at all").unwrap();
        let result = parser().parse(&doc);

        assert_eq!(result.status, ExtractionStatus::Success);
        assert_eq!(result.bank_id, UNKNOWN_BANK);
        assert_eq!(result.bank_name, "Unknown");
        for field in result.fields.iter() {
            assert!(field.value.is_none());
            assert_eq!(field.confidence, 0.0);
        }
        // One warning for the bank, one per field.
        assert_eq!(result.warnings.len(), 6);
    }

    #[test]
    fn test_empty_input_is_structural_error() {
        let parser = parser();
        assert!(matches!(
            parser.extract_from_text("   \n  "),
            Err(ExtractionError::EmptyDocument)
        ));
    }

    #[test]
    fn test_idempotent_byte_identical() {
        let text = "Acme Bank\nGold Card ending 4532\n\
                    Billing Cycle: 12-07-2024 to 11-08-2024\n\
                    Total Balance Due: ₹ 45,320.75\n";
        let doc = RawDocument::new(text).unwrap();
        let parser = parser();

        let first = serde_json::to_vec(&parser.parse(&doc)).unwrap();
        let second = serde_json::to_vec(&parser.parse(&doc)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_currency_field_absent() {
        let doc = RawDocument::new("Acme Bank statement\nTotal Due: N/A\n").unwrap();
        let result = parser().parse(&doc);

        assert!(result.fields.total_balance_due.value.is_none());
        assert_eq!(result.fields.total_balance_due.confidence, 0.0);
    }

    #[test]
    fn test_dotted_due_date_does_not_become_balance() {
        // The dotted date contains the amount-shaped "12.08"; the balance
        // must stay absent when the actual balance line is malformed.
        let doc =
            RawDocument::new("Payment Due Date: 12.08.2024\nTotal Due: N/A\n").unwrap();
        let result = parser().parse(&doc);

        assert!(result.fields.total_balance_due.value.is_none());
        assert_eq!(result.fields.total_balance_due.confidence, 0.0);
        assert_eq!(
            result
                .fields
                .payment_due_date
                .value
                .as_ref()
                .map(|v| v.to_string()),
            Some("2024-08-12".to_string())
        );
    }

    #[test]
    fn test_billing_cycle_and_balance() {
        let text = "Acme Bank\n\
                    Statement Period: 12/07/2024 - 11/08/2024\n\
                    Total Amount Due: Rs. 12,540.50\n";
        let doc = RawDocument::new(text).unwrap();
        let result = parser().parse(&doc);

        assert_eq!(
            result.fields.billing_cycle.value.as_ref().map(|v| v.to_string()),
            Some("2024-07-12 to 2024-08-11".to_string())
        );
        assert_eq!(
            result
                .fields
                .total_balance_due
                .value
                .as_ref()
                .map(|v| v.to_string()),
            Some("12540.50".to_string())
        );
    }

    #[test]
    fn test_bank_template_beats_generic_heuristic() {
        let config = BanksConfig {
            banks: vec![BankProfileConfig {
                id: "acme_bank".to_string(),
                display_name: Some("Acme Bank".to_string()),
                identifiers: vec!["Acme Bank".to_string()],
                field_patterns: HashMap::from([(
                    FieldKey::CardLast4,
                    r"Primary card \*+(\d{4})".to_string(),
                )]),
                ..Default::default()
            }],
            ..Default::default()
        };
        let parser =
            StatementParser::new(Arc::new(BankRegistry::from_config(&config).unwrap()));

        // The template points at 9876; a generic heuristic would find 4532.
        let text = "Acme Bank\nPrimary card ****9876\nold card ending 4532\n";
        let doc = RawDocument::new(text).unwrap();
        let result = parser.parse(&doc);

        assert_eq!(
            result.fields.card_last4.value.as_ref().map(|v| v.to_string()),
            Some("9876".to_string())
        );
    }

    #[test]
    fn test_corroboration_raises_confidence() {
        // Labeled line: label-proximity and the date type-pattern agree.
        let corroborated = {
            let doc = RawDocument::new("Payment Due Date: 12/08/2024\n").unwrap();
            parser().parse(&doc).fields.payment_due_date.confidence
        };
        // Bare date: only the type-pattern fallback fires.
        let alone = {
            let doc = RawDocument::new("some text\n12/08/2024\n").unwrap();
            parser().parse(&doc).fields.payment_due_date.confidence
        };

        assert!(corroborated > alone);
        assert!(alone > 0.0);
    }

    #[test]
    fn test_card_variant_vocabulary_fallback() {
        let doc = RawDocument::new("Acme Bank Platinum Card statement\n").unwrap();
        let result = parser().parse(&doc);

        assert_eq!(
            result.fields.card_variant.value.as_ref().map(|v| v.to_string()),
            Some("Platinum".to_string())
        );
    }
}
