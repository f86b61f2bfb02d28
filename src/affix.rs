//! # Affix Stripping Module
//!
//! ## Purpose
//! Static prefix/suffix inventories and the segmenter that proposes
//! (prefix, core, suffix) decompositions of a normalized word.
//!
//! ## Input/Output Specification
//! - **Input**: A normalized Arabic word
//! - **Output**: Segmentation candidates ordered by preference (best first)
//! - **Invariant**: Every candidate reconstructs the input word exactly
//!
//! ## Key Features
//! - Longest-first greedy matching, so وال wins over و
//! - Fixed candidate order: bare word, prefix-only, suffix-only, both,
//!   initial-alef fallback
//! - A candidate is only proposed when at least one core letter remains

use crate::{Segment, SegmentKind, SegmentedWord};

/// Conjunction, preposition, article and tense prefixes, longest first so
/// greedy matching prefers the maximal affix.
pub const PREFIXES: &[&str] = &[
    // compound
    "وبال", "فبال", "وكال", "فكال", "وال", "فال", "بال", "كال", "ولل", "فلل",
    // article and future markers
    "لل", "ال", "سي", "ست", "سن", "سا",
    // single letters
    "و", "ف", "ب", "ك", "ل", "س", "م", "ت", "ي", "ن",
];

/// Pronoun, plural and feminine suffixes, longest first.
pub const SUFFIXES: &[&str] = &[
    "هما", "كما", "تما", "ات", "ان", "ين", "ون", "وا", "ها", "هم", "هن", "كم", "كن", "نا",
    "ني", "تم", "تن", "ه", "ك", "ت", "ي", "ن", "ا",
];

/// Longest prefix from the table that still leaves a non-empty core.
/// Ties at the same length are not explored; table order decides.
fn longest_prefix(word: &str) -> Option<&'static str> {
    PREFIXES
        .iter()
        .copied()
        .find(|p| word.len() > p.len() && word.starts_with(p))
}

/// Longest suffix from the table that still leaves a non-empty core.
fn longest_suffix(word: &str) -> Option<&'static str> {
    SUFFIXES
        .iter()
        .copied()
        .find(|s| word.len() > s.len() && word.ends_with(s))
}

/// Propose segmentation candidates for a normalized word, best first.
///
/// Candidate order is a resolution heuristic, not a proof of correctness:
/// downstream root resolution accepts the first candidate whose root the
/// corpus index recognizes.
pub fn segment(word: &str) -> Vec<SegmentedWord> {
    let mut candidates = Vec::new();
    if word.is_empty() {
        return candidates;
    }

    // (a) bare word: the whole word may already be a root
    candidates.push(SegmentedWord {
        segments: vec![Segment::new(word, SegmentKind::Root)],
    });

    let prefix = longest_prefix(word);
    let suffix = longest_suffix(word);

    // (b) prefix-only
    if let Some(p) = prefix {
        candidates.push(SegmentedWord {
            segments: vec![
                Segment::new(p, SegmentKind::Prefix),
                Segment::new(&word[p.len()..], SegmentKind::Root),
            ],
        });
    }

    // (c) suffix-only
    if let Some(s) = suffix {
        candidates.push(SegmentedWord {
            segments: vec![
                Segment::new(&word[..word.len() - s.len()], SegmentKind::Root),
                Segment::new(s, SegmentKind::Suffix),
            ],
        });
    }

    // (d) prefix and suffix together, when a core still remains
    if let (Some(p), Some(s)) = (prefix, suffix) {
        if word.len() > p.len() + s.len() {
            candidates.push(SegmentedWord {
                segments: vec![
                    Segment::new(p, SegmentKind::Prefix),
                    Segment::new(&word[p.len()..word.len() - s.len()], SegmentKind::Root),
                    Segment::new(s, SegmentKind::Suffix),
                ],
            });
        }
    }

    // (e) initial-alef fallback: hamza forms fold to ا during normalization,
    // so a leading ا may be a one-letter verbal prefix
    if let Some(rest) = word.strip_prefix('ا') {
        if !rest.is_empty() {
            candidates.push(SegmentedWord {
                segments: vec![
                    Segment::new("ا", SegmentKind::Prefix),
                    Segment::new(rest, SegmentKind::Root),
                ],
            });
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    #[test]
    fn test_tables_are_sorted_longest_first() {
        for table in [PREFIXES, SUFFIXES] {
            for pair in table.windows(2) {
                assert!(
                    char_len(pair[0]) >= char_len(pair[1]),
                    "shorter {} listed before {}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn test_longest_prefix_wins() {
        // وال must win over و
        let candidates = segment("والكتاب");
        let with_prefix = &candidates[1];
        assert_eq!(with_prefix.segments[0].text, "وال");
        assert_eq!(with_prefix.segments[0].kind, SegmentKind::Prefix);
        assert_eq!(with_prefix.core(), "كتاب");
    }

    #[test]
    fn test_candidate_order() {
        let candidates = segment("الكاتبون");
        // bare, prefix-only, suffix-only, both, alef fallback
        assert_eq!(candidates.len(), 5);
        assert_eq!(candidates[0].core(), "الكاتبون");
        assert_eq!(candidates[1].core(), "كاتبون");
        assert_eq!(candidates[2].core(), "الكاتب");
        assert_eq!(candidates[3].core(), "كاتب");
        assert_eq!(candidates[4].core(), "لكاتبون");
    }

    #[test]
    fn test_every_candidate_reconstructs_input() {
        for word in ["الكاتبون", "والقول", "يقولون", "كتب", "است"] {
            for candidate in segment(word) {
                assert_eq!(candidate.reconstruct(), word, "candidate of {word}");
            }
        }
    }

    #[test]
    fn test_core_never_empty() {
        // the whole word equals an affix; stripping must not empty the core
        for word in ["ال", "ون", "و"] {
            for candidate in segment(word) {
                assert!(!candidate.core().is_empty(), "empty core for {word}");
            }
        }
    }

    #[test]
    fn test_initial_alef_fallback() {
        let candidates = segment("اكتب");
        let fallback = candidates.last().unwrap();
        assert_eq!(fallback.segments[0].text, "ا");
        assert_eq!(fallback.segments[0].kind, SegmentKind::Prefix);
        assert_eq!(fallback.core(), "كتب");
    }

    #[test]
    fn test_empty_word_has_no_candidates() {
        assert!(segment("").is_empty());
    }
}
