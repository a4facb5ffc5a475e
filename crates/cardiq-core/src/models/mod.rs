//! Data models for statement extraction.

pub mod config;
pub mod statement;

pub use config::{BankProfile, BankRegistry, BanksConfig, DateOrder, ScoringConfig};
pub use statement::{
    ExtractionResult, ExtractionStatus, FieldKey, FieldResult, FieldValue, RawDocument,
    StatementFields, UNKNOWN_BANK,
};
