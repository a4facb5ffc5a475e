//! OCR artifact repair for extracted statement text.
//!
//! Scanned statements come back with glued tokens ("Date:12/08",
//! "01-Jul-2024to31-Jul-2024") and letter-spaced words ("C a r d"). These
//! repairs run before candidate location and when building snippets.

use super::patterns::{GLUED_COLON, GLUED_TO_AFTER_DIGIT, GLUED_TO_BEFORE_DIGIT};

/// Repair one line of extracted text.
pub fn clean_line(line: &str) -> String {
    let repaired = GLUED_COLON.replace_all(line, "${1}: ${2}");
    let repaired = GLUED_TO_AFTER_DIGIT.replace_all(&repaired, "${1} to ${2}");
    let repaired = GLUED_TO_BEFORE_DIGIT.replace_all(&repaired, "${1} to ${2}");

    let collapsed: Vec<&str> = repaired.split_whitespace().collect();
    collapse_single_char_runs(&collapsed)
}

/// Repair a multi-line block into a single snippet line: each segment
/// repaired, duplicates dropped, segments joined by " | ".
pub fn clean_block(block: &str) -> String {
    let mut seen = Vec::new();
    for part in block.split(['\r', '\n', '|']) {
        let cleaned = clean_line(part);
        if !cleaned.is_empty() && !seen.contains(&cleaned) {
            seen.push(cleaned);
        }
    }
    seen.join(" | ")
}

/// Join runs of two or more single-character tokens: letter-spaced OCR output
/// like "C a r d 4 5 3 2" becomes "Card 4532".
fn collapse_single_char_runs(tokens: &[&str]) -> String {
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].chars().count() == 1 {
            let mut j = i;
            while j < tokens.len() && tokens[j].chars().count() == 1 {
                j += 1;
            }
            if j - i >= 2 {
                out.push(tokens[i..j].concat());
            } else {
                out.push(tokens[i].to_string());
            }
            i = j;
        } else {
            out.push(tokens[i].to_string());
            i += 1;
        }
    }
    out.join(" ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_glued_colon_and_to() {
        assert_eq!(clean_line("Due Date:12/08/2024"), "Due Date: 12/08/2024");
        assert_eq!(
            clean_line("01-Jul-2024to31-Jul-2024"),
            "01-Jul-2024 to 31-Jul-2024"
        );
    }

    #[test]
    fn test_letter_adjacent_to_left_alone() {
        // "October" must not be split into "Oc to ber".
        assert_eq!(clean_line("12 October 2024"), "12 October 2024");
        assert_eq!(clean_line("Total Due"), "Total Due");
    }

    #[test]
    fn test_single_char_run_collapse() {
        assert_eq!(clean_line("C a r d ending 4 5 3 2"), "Card ending 4532");
        // A lone single-char token stays as-is.
        assert_eq!(clean_line("plan A details"), "plan A details");
    }

    #[test]
    fn test_clean_block_dedupes_segments() {
        assert_eq!(
            clean_block("Total Due: 100.00\nTotal Due: 100.00\npage 1"),
            "Total Due: 100.00 | page 1"
        );
    }
}
