//! Confidence scoring: a pure function of locator strength, strategy
//! agreement, and lexical similarity.
//!
//! Keeping this separate from the locator and normalizer means the blend can
//! be retuned (via [`ScoringConfig`]) without touching either.

use crate::models::config::ScoringConfig;

/// Combine a candidate's locator strength with corroboration and a lexical
/// signal into a final confidence.
///
/// `agreeing` is the number of distinct strategies whose candidates
/// normalized to the same value (at least 1, the candidate's own). Each extra
/// agreeing strategy shrinks the remaining shortfall by `corroboration_damp`,
/// so corroboration strictly increases confidence without a single weak
/// strategy ever being able to outvote a strong one. Any candidate that made
/// it here survived normalization and is floored at `min_confidence`;
/// confidence 0 stays reserved for "nothing found".
pub fn score(strength: f32, agreeing: usize, lexical: f32, config: &ScoringConfig) -> f32 {
    let strength = strength.clamp(0.0, 1.0);
    let extra = agreeing.saturating_sub(1) as i32;

    let corroborated = 1.0 - (1.0 - strength) * config.corroboration_damp.powi(extra);
    let blended = (1.0 - config.lexical_weight) * corroborated
        + config.lexical_weight * lexical.clamp(0.0, 1.0);

    blended.clamp(config.min_confidence, 1.0)
}
