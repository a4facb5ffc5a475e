//! Configuration for bank profiles and scoring.
//!
//! The serde structs mirror the banks config file; [`BankRegistry`] is the
//! compiled, immutable form shared read-only across requests.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::statement::FieldKey;

/// Top-level banks configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BanksConfig {
    /// Known bank profiles, in declaration order. Order matters: it breaks
    /// ties during bank identification.
    pub banks: Vec<BankProfileConfig>,

    /// Scoring coefficients.
    pub scoring: ScoringConfig,

    /// Date-order convention for ambiguous numeric dates.
    pub date_order: DateOrder,
}

impl BanksConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// One bank profile as declared in configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankProfileConfig {
    /// Unique key, e.g. `acme_bank`.
    pub id: String,

    /// Human-readable name. Falls back to a title-cased form of the id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Substrings that identify this bank's statements (matched
    /// case-insensitively against the full text).
    #[serde(default)]
    pub identifiers: Vec<String>,

    /// Optional bank-specific extraction regex per field. The first capture
    /// group (or the whole match) is the candidate value.
    #[serde(default)]
    pub field_patterns: HashMap<FieldKey, String>,
}

/// Date-order convention for numeric dates like `12/08/2024`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// Day before month (the convention of the targeted issuers).
    #[default]
    DayFirst,
    /// Month before day.
    MonthFirst,
}

/// Tunable scoring coefficients. Defaults are fixed here; the file can
/// override them for recalibration against a labeled corpus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base strength for bank-template matches.
    pub template_strength: f32,
    /// Base strength for an exact label match on the same line.
    pub label_exact_strength: f32,
    /// Base strength for a fuzzy label match on the same line.
    pub label_fuzzy_strength: f32,
    /// Base strength when the value sits on the line after the label.
    pub label_next_line_strength: f32,
    /// Base strength for type-pattern fallback matches.
    pub type_pattern_strength: f32,
    /// Bump for type-pattern matches with supporting context on the line.
    pub type_context_bonus: f32,
    /// Shortfall multiplier per extra agreeing strategy; lower means a
    /// stronger corroboration bonus. Must stay in (0, 1) so corroboration
    /// strictly increases confidence.
    pub corroboration_damp: f32,
    /// Weight of the lexical-similarity term in the final blend.
    pub lexical_weight: f32,
    /// Confidence floor for any candidate that survived normalization.
    pub min_confidence: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            template_strength: 0.9,
            label_exact_strength: 0.7,
            label_fuzzy_strength: 0.6,
            label_next_line_strength: 0.55,
            type_pattern_strength: 0.3,
            type_context_bonus: 0.05,
            corroboration_damp: 0.6,
            lexical_weight: 0.1,
            min_confidence: 0.05,
        }
    }
}

/// A compiled bank profile: identifiers plus pre-built field templates.
#[derive(Debug, Clone)]
pub struct BankProfile {
    pub id: String,
    pub display_name: String,
    pub identifiers: Vec<String>,
    pub templates: HashMap<FieldKey, Regex>,
}

/// Immutable, ordered set of bank profiles. Built once at startup and shared
/// read-only across requests.
#[derive(Debug, Clone, Default)]
pub struct BankRegistry {
    profiles: Vec<BankProfile>,
}

impl BankRegistry {
    /// Registry with no profiles: every statement resolves with generic
    /// heuristics under the `"unknown"` bank.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile a registry from configuration.
    pub fn from_config(config: &BanksConfig) -> Result<Self, ConfigError> {
        let mut profiles = Vec::with_capacity(config.banks.len());
        for bank in &config.banks {
            let mut templates = HashMap::new();
            for (key, pattern) in &bank.field_patterns {
                let regex = Regex::new(pattern).map_err(|source| ConfigError::Template {
                    bank: bank.id.clone(),
                    field: key.to_string(),
                    source,
                })?;
                templates.insert(*key, regex);
            }
            profiles.push(BankProfile {
                id: bank.id.clone(),
                display_name: bank
                    .display_name
                    .clone()
                    .unwrap_or_else(|| title_case_id(&bank.id)),
                identifiers: bank.identifiers.clone(),
                templates,
            });
        }
        Ok(Self { profiles })
    }

    /// Built-in fallback profiles for the common issuers, used when no banks
    /// config file is supplied.
    pub fn builtin() -> Self {
        let issuers: [(&str, &str, &[&str]); 7] = [
            ("axis", "Axis Bank", &["axis bank"]),
            ("hdfc", "HDFC Bank", &["hdfc bank", "hdfc"]),
            ("icici", "ICICI Bank", &["icici bank", "icici"]),
            ("sbi", "SBI", &["sbi card", "state bank of india"]),
            ("kotak", "Kotak Mahindra Bank", &["kotak mahindra", "kotak"]),
            ("amex", "American Express", &["american express", "amex"]),
            ("citi", "Citi Bank", &["citibank", "citi bank"]),
        ];

        let profiles = issuers
            .iter()
            .map(|(id, name, idents)| BankProfile {
                id: (*id).to_string(),
                display_name: (*name).to_string(),
                identifiers: idents.iter().map(|s| (*s).to_string()).collect(),
                templates: HashMap::new(),
            })
            .collect();

        Self { profiles }
    }

    /// Profiles in declaration order.
    pub fn profiles(&self) -> &[BankProfile] {
        &self.profiles
    }

    /// Display name for a bank id, including the `"unknown"` sentinel.
    pub fn display_name(&self, id: &str) -> String {
        if id == crate::models::statement::UNKNOWN_BANK {
            return "Unknown".to_string();
        }
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.display_name.clone())
            .unwrap_or_else(|| title_case_id(id))
    }
}

fn title_case_id(id: &str) -> String {
    id.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
