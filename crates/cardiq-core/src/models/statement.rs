//! Statement data models: the input document and the extraction output.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ExtractionError;

/// Sentinel bank id used when no profile matched.
pub const UNKNOWN_BANK: &str = "unknown";

/// Maximum length of a [`FieldResult`] snippet.
pub const MAX_SNIPPET_LEN: usize = 160;

/// One statement document, as delivered by the upstream text-extraction
/// service. Immutable for the lifetime of a request.
#[derive(Debug, Clone)]
pub struct RawDocument {
    text: String,
    lines: Vec<String>,
}

impl RawDocument {
    /// Build a document from raw text. Blank or whitespace-only input is the
    /// one structural error the engine refuses to process.
    pub fn new(text: impl Into<String>) -> Result<Self, ExtractionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }
        let lines = text.lines().map(|l| l.trim().to_string()).collect();
        Ok(Self { text, lines })
    }

    /// Full concatenated text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line-segmented form.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// The five target fields. A closed set: every statement result carries an
/// entry for each of these, resolved or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    /// Card product name (Platinum, Regalia, ...).
    CardVariant,
    /// Last four digits of the card number.
    CardLast4,
    /// Statement/billing period.
    BillingCycle,
    /// Payment due date.
    PaymentDueDate,
    /// Total balance due on the statement.
    TotalBalanceDue,
}

impl FieldKey {
    /// All field keys, in output order.
    pub const ALL: [FieldKey; 5] = [
        FieldKey::CardVariant,
        FieldKey::CardLast4,
        FieldKey::BillingCycle,
        FieldKey::PaymentDueDate,
        FieldKey::TotalBalanceDue,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::CardVariant => "card_variant",
            FieldKey::CardLast4 => "card_last4",
            FieldKey::BillingCycle => "billing_cycle",
            FieldKey::PaymentDueDate => "payment_due_date",
            FieldKey::TotalBalanceDue => "total_balance_due",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized field value. Serializes as its canonical string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Free-text label (card variant).
    Text(String),
    /// Exactly four digits, rendered verbatim.
    Digits(String),
    /// A single date.
    Date(NaiveDate),
    /// A date range (billing cycle).
    Range(NaiveDate, NaiveDate),
    /// A currency amount.
    Amount(Decimal),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Digits(d) => f.write_str(d),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Range(start, end) => write!(
                f,
                "{} to {}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
            FieldValue::Amount(a) => write!(f, "{a}"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Outcome for a single field: the value (absent when nothing survived
/// normalization), a confidence in [0, 1], and the text snippet the value was
/// derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldResult {
    #[serde(skip)]
    pub key: FieldKey,
    pub value: Option<FieldValue>,
    pub confidence: f32,
    pub snippet: String,
}

impl FieldResult {
    /// The "nothing found" result. Confidence 0.0 is reserved for this case;
    /// any surviving candidate scores at least a small positive epsilon.
    pub fn absent(key: FieldKey) -> Self {
        Self {
            key,
            value: None,
            confidence: 0.0,
            snippet: String::new(),
        }
    }

    /// Whether a value was extracted.
    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }
}

/// All five field results. A struct rather than a map so no field can be
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementFields {
    pub card_variant: FieldResult,
    pub card_last4: FieldResult,
    pub billing_cycle: FieldResult,
    pub payment_due_date: FieldResult,
    pub total_balance_due: FieldResult,
}

impl StatementFields {
    /// Result for one field key.
    pub fn get(&self, key: FieldKey) -> &FieldResult {
        match key {
            FieldKey::CardVariant => &self.card_variant,
            FieldKey::CardLast4 => &self.card_last4,
            FieldKey::BillingCycle => &self.billing_cycle,
            FieldKey::PaymentDueDate => &self.payment_due_date,
            FieldKey::TotalBalanceDue => &self.total_balance_due,
        }
    }

    /// Iterate the results in output order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldResult> {
        FieldKey::ALL.iter().map(|k| self.get(*k))
    }
}

impl Default for StatementFields {
    fn default() -> Self {
        Self {
            card_variant: FieldResult::absent(FieldKey::CardVariant),
            card_last4: FieldResult::absent(FieldKey::CardLast4),
            billing_cycle: FieldResult::absent(FieldKey::BillingCycle),
            payment_due_date: FieldResult::absent(FieldKey::PaymentDueDate),
            total_balance_due: FieldResult::absent(FieldKey::TotalBalanceDue),
        }
    }
}

/// Overall request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Success,
    Error,
}

/// The full extraction output for one statement. Carries no wall-clock data,
/// so identical inputs serialize byte-identically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub status: ExtractionStatus,
    /// Matched bank profile id, or `"unknown"`.
    pub bank_id: String,
    /// Display name for the matched bank.
    pub bank_name: String,
    pub fields: StatementFields,
    /// Non-fatal extraction notes (unresolved fields, unknown bank).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}
