//! Core library for credit-card statement parsing.
//!
//! This crate provides:
//! - Bank identification from statement text
//! - Rule-based field extraction (card variant, last-4, billing cycle,
//!   payment due date, total balance due) with per-field confidence scores
//! - Bank profile configuration shared read-only across requests
//!
//! Turning a PDF into text is an upstream concern; the engine starts from a
//! [`RawDocument`] and returns an [`ExtractionResult`].

pub mod error;
pub mod models;
pub mod statement;

pub use error::{CardiqError, ConfigError, ExtractionError, Result};
pub use models::config::{BankProfile, BankRegistry, BanksConfig, DateOrder, ScoringConfig};
pub use models::statement::{
    ExtractionResult, ExtractionStatus, FieldKey, FieldResult, FieldValue, RawDocument,
    StatementFields, UNKNOWN_BANK,
};
pub use statement::{StatementExtractor, StatementParser};
