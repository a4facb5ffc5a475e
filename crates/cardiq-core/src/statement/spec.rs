//! The fixed field-specification table.
//!
//! One entry per target field, defined statically so every field's label
//! vocabulary and value type is visible in one place. The extractor never
//! dispatches on field names at runtime; it walks this closed table.

use crate::models::statement::FieldKey;

/// Shape of a field's value, driving normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Free-text label; bank vocabularies vary, no validation beyond cleanup.
    Label,
    /// Exactly four digits.
    MaskedDigits,
    /// A single date.
    Date,
    /// Two dates separated by "to" or a dash.
    DateRange,
    /// A currency amount.
    Currency,
}

/// Static descriptor for one target field.
#[derive(Debug)]
pub struct FieldSpec {
    pub key: FieldKey,
    /// Label aliases in priority order, lowercase.
    pub labels: &'static [&'static str],
    pub value_type: ValueType,
    /// Query phrase for the lexical-similarity signal.
    pub query: &'static str,
}

/// The five target fields. Exhaustive: no field is ever silently dropped.
pub static FIELD_SPECS: [FieldSpec; 5] = [
    FieldSpec {
        key: FieldKey::CardVariant,
        labels: &["card variant", "card type", "card name"],
        value_type: ValueType::Label,
        query: "credit card type such as platinum regalia magnus",
    },
    FieldSpec {
        key: FieldKey::CardLast4,
        labels: &[
            "card last 4 digits",
            "card number ending",
            "card ending",
            "last 4 digits",
        ],
        value_type: ValueType::MaskedDigits,
        query: "last four digits of the card",
    },
    FieldSpec {
        key: FieldKey::BillingCycle,
        labels: &["billing cycle", "statement period", "billing period"],
        value_type: ValueType::DateRange,
        query: "billing cycle or statement period",
    },
    FieldSpec {
        key: FieldKey::PaymentDueDate,
        labels: &["payment due date", "due date", "pay by"],
        value_type: ValueType::Date,
        query: "payment due date",
    },
    FieldSpec {
        key: FieldKey::TotalBalanceDue,
        labels: &[
            "total balance due",
            "total amount due",
            "new balance",
            "outstanding balance",
            "total due",
            "amount due",
        ],
        value_type: ValueType::Currency,
        query: "total balance due or amount payable",
    },
];

/// Look up the spec for a field key.
pub fn spec_for(key: FieldKey) -> &'static FieldSpec {
    // FIELD_SPECS covers FieldKey exhaustively.
    FIELD_SPECS
        .iter()
        .find(|s| s.key == key)
        .unwrap_or(&FIELD_SPECS[0])
}
