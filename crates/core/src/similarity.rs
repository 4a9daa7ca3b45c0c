//! Word-set similarity between two versions of a scene's script text.
//!
//! Jaccard overlap of normalised word sets, as an integer percentage.
//! Reordered or lightly reworded prose scores high; rewrites score low.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::thresholds::ChangeThresholds;

/// Words of this length or shorter are ignored ("a", "of", stray initials).
pub const MIN_TOKEN_LENGTH: usize = 3;

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

// ---------------------------------------------------------------------------
// Descriptions
// ---------------------------------------------------------------------------

pub const DESC_NEW_SCENE: &str = "New scene added";
pub const DESC_REMOVED_SCENE: &str = "Scene removed from script";
pub const DESC_FORMATTING: &str = "Minor formatting changes";
pub const DESC_MINOR: &str = "Minor dialogue or action changes";
pub const DESC_SIGNIFICANT: &str = "Significant content changes";
pub const DESC_REWRITE: &str = "Major rewrite of scene";

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Lowercase, replace non-word characters with a space, collapse whitespace.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD_RE.replace_all(&lowered, " ");
    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}

fn token_set(normalized: &str) -> HashSet<&str> {
    normalized
        .split(' ')
        .filter(|word| word.len() >= MIN_TOKEN_LENGTH)
        .collect()
}

/// Similarity of two texts in `[0, 100]`.
///
/// Two empty texts are identical (100); exactly one empty text scores 0.
/// Deterministic and symmetric.
pub fn content_similarity(a: &str, b: &str) -> u8 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 100,
        (true, false) | (false, true) => return 0,
        (false, false) => {}
    }

    let norm_a = normalize_text(a);
    let norm_b = normalize_text(b);
    if norm_a == norm_b {
        return 100;
    }

    let words_a = token_set(&norm_a);
    let words_b = token_set(&norm_b);
    match (words_a.is_empty(), words_b.is_empty()) {
        (true, true) => return 100,
        (true, false) | (false, true) => return 0,
        (false, false) => {}
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    let ratio = intersection as f64 / union as f64;
    (ratio * 100.0).round() as u8
}

/// Human-readable description of a scene change.
///
/// `similarity` is ignored when either side is missing.
pub fn describe_change(
    has_old: bool,
    has_new: bool,
    similarity: u8,
    thresholds: &ChangeThresholds,
) -> &'static str {
    match (has_old, has_new) {
        (false, _) => DESC_NEW_SCENE,
        (true, false) => DESC_REMOVED_SCENE,
        (true, true) if similarity >= thresholds.unchanged => DESC_FORMATTING,
        (true, true) if similarity >= thresholds.minor => DESC_MINOR,
        (true, true) if similarity >= thresholds.significant => DESC_SIGNIFICANT,
        (true, true) => DESC_REWRITE,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "hello world",
        "JANE enters the trailer, sits at the mirror.",
        "Jane enters the trailer and sits at the mirror!",
        "A b c",
        "The rain hammers the windscreen. MARK grips the wheel.",
    ];

    // -- normalize_text -------------------------------------------------------

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize_text("  JANE: Hello,   world!! "), "jane hello world");
    }

    #[test]
    fn normalize_keeps_underscores_and_digits() {
        assert_eq!(normalize_text("take_2 at 10:30"), "take_2 at 10 30");
    }

    // -- content_similarity ---------------------------------------------------

    #[test]
    fn both_empty_is_identical() {
        assert_eq!(content_similarity("", ""), 100);
    }

    #[test]
    fn one_empty_is_zero() {
        assert_eq!(content_similarity("hello world", ""), 0);
        assert_eq!(content_similarity("", "hello world"), 0);
    }

    #[test]
    fn reflexive_for_samples() {
        for s in SAMPLES {
            assert_eq!(content_similarity(s, s), 100, "sample: {s:?}");
        }
    }

    #[test]
    fn symmetric_for_samples() {
        for a in SAMPLES {
            for b in SAMPLES {
                assert_eq!(
                    content_similarity(a, b),
                    content_similarity(b, a),
                    "pair: {a:?} / {b:?}"
                );
            }
        }
    }

    #[test]
    fn bounded_for_samples() {
        for a in SAMPLES {
            for b in SAMPLES {
                assert!(content_similarity(a, b) <= 100);
            }
        }
    }

    #[test]
    fn punctuation_only_difference_is_identical() {
        assert_eq!(content_similarity("Hello, World!", "hello world"), 100);
    }

    #[test]
    fn short_tokens_only_on_both_sides_is_identical() {
        // Normalised forms differ but both token sets are empty.
        assert_eq!(content_similarity("a b c", "x y"), 100);
    }

    #[test]
    fn short_tokens_only_on_one_side_is_zero() {
        assert_eq!(content_similarity("a b c", "the mirror"), 0);
    }

    #[test]
    fn jaccard_is_rounded_percentage() {
        // {jane, enters, trailer} vs {jane, leaves, trailer}: 2 / 4.
        assert_eq!(
            content_similarity("jane enters trailer", "jane leaves trailer"),
            50
        );
        // {one, two} vs {one, two, six}: 2 / 3.
        assert_eq!(content_similarity("one two", "one two six"), 67);
    }

    #[test]
    fn reordering_does_not_change_score() {
        assert_eq!(
            content_similarity("mark grips the wheel", "the wheel mark grips"),
            100
        );
    }

    // -- describe_change ------------------------------------------------------

    #[test]
    fn describes_presence_changes() {
        let t = ChangeThresholds::default();
        assert_eq!(describe_change(false, true, 0, &t), DESC_NEW_SCENE);
        assert_eq!(describe_change(true, false, 0, &t), DESC_REMOVED_SCENE);
    }

    #[test]
    fn describes_similarity_bands_at_boundaries() {
        let t = ChangeThresholds::default();
        assert_eq!(describe_change(true, true, 95, &t), DESC_FORMATTING);
        assert_eq!(describe_change(true, true, 94, &t), DESC_MINOR);
        assert_eq!(describe_change(true, true, 80, &t), DESC_MINOR);
        assert_eq!(describe_change(true, true, 79, &t), DESC_SIGNIFICANT);
        assert_eq!(describe_change(true, true, 50, &t), DESC_SIGNIFICANT);
        assert_eq!(describe_change(true, true, 49, &t), DESC_REWRITE);
    }

    #[test]
    fn describe_respects_custom_thresholds() {
        let t = ChangeThresholds {
            unchanged: 90,
            minor: 70,
            significant: 40,
        };
        assert_eq!(describe_change(true, true, 75, &t), DESC_MINOR);
        assert_eq!(describe_change(true, true, 45, &t), DESC_SIGNIFICANT);
    }
}
