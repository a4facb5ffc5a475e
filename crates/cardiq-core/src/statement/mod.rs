//! Statement field extraction module.

pub mod bank;
pub mod locator;
pub mod normalize;
pub mod parser;
pub mod rules;
pub mod score;
pub mod spec;

pub use bank::identify_bank;
pub use locator::{Candidate, Strategy};
pub use parser::StatementParser;
pub use spec::{spec_for, FieldSpec, ValueType, FIELD_SPECS};

use crate::error::ExtractionError;
use crate::models::statement::{ExtractionResult, RawDocument};

/// Trait for statement field extractors.
pub trait StatementExtractor {
    /// Extract fields from an already-validated document.
    fn extract(&self, doc: &RawDocument) -> ExtractionResult;

    /// Extract fields from plain text. Blank input is the one structural
    /// error; everything else degrades into a best-effort result.
    fn extract_from_text(&self, text: &str) -> Result<ExtractionResult, ExtractionError>;
}
