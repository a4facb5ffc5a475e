//! Bank identification from statement text.

use tracing::debug;

use crate::models::config::{BankProfile, BankRegistry};
use crate::models::statement::{RawDocument, UNKNOWN_BANK};

/// Identify the issuing bank by case-insensitive containment of each
/// profile's identifier strings.
///
/// When several profiles match, the longest matched identifier wins (most
/// specific literal); ties fall to the earlier-declared profile, so the
/// result is deterministic. No match yields the `"unknown"` sentinel, which
/// is not an error — downstream resolution falls back to generic heuristics.
pub fn identify_bank<'a>(
    doc: &RawDocument,
    registry: &'a BankRegistry,
) -> (String, Option<&'a BankProfile>) {
    let text = doc.text().to_lowercase();

    let mut best: Option<(&BankProfile, usize)> = None;
    for profile in registry.profiles() {
        for identifier in &profile.identifiers {
            let ident = identifier.to_lowercase();
            if ident.is_empty() || !text.contains(&ident) {
                continue;
            }
            let longer = match best {
                Some((_, len)) => ident.len() > len,
                None => true,
            };
            if longer {
                best = Some((profile, ident.len()));
            }
        }
    }

    match best {
        Some((profile, len)) => {
            debug!(bank = %profile.id, matched_len = len, "identified bank");
            (profile.id.clone(), Some(profile))
        }
        None => (UNKNOWN_BANK.to_string(), None),
    }
}
