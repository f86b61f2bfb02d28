//! # Analysis Service Module
//!
//! ## Purpose
//! Orchestrates segmentation, root resolution and corpus lookup to answer a
//! single-word analysis request. The sole entry point used by the API layer.
//!
//! ## Input/Output Specification
//! - **Input**: A raw Arabic word
//! - **Output**: Labeled segments, root, wazn pattern, occurrence count and
//!   example verses; optionally the external analyzer's second opinion
//! - **Errors**: `InvalidInput` for empty words, `NotFound` when no root is
//!   recognized; distinguishable by design
//!
//! ## Key Features
//! - First-match-wins resolution: segmentation candidates in segmenter order,
//!   root hypotheses in resolver order, accepted when the index recognizes
//!   the root
//! - Bare-root fallback when the whole word is itself a known root
//! - External analyzer output is attached as separately tagged entries and
//!   never reconciled with the core's own resolution
//! - Pure, read-only computation over immutable structures; safe for
//!   unlimited concurrent callers

use crate::corpus::CorpusIndex;
use crate::errors::{AnalyzerError, Result};
use crate::external::{ExternalAnalysis, ExternalAnalyzer};
use crate::{affix, normalize, resolver, utils, Segment, SegmentKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Complete analysis of one word
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The word as submitted (trimmed)
    pub word: String,
    /// Ordered decomposition of the normalized word
    pub segments: Vec<Segment>,
    /// Resolved root (3 or 4 letters)
    pub root: String,
    /// Matched wazn, if any template reproduces the core
    pub pattern: Option<String>,
    /// Number of corpus verses matching the root
    pub root_occurrences: usize,
    /// Example verses, bounded by the index cap
    pub example_verses: Vec<ExampleVerse>,
    /// Second opinions from the external analyzer, never merged with ours
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external: Vec<ExternalAnalysis>,
}

/// One example verse in an analysis response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleVerse {
    pub surah: u32,
    pub ayah: u32,
    pub text: String,
}

/// An accepted resolution, before response assembly
struct Accepted {
    segments: Vec<Segment>,
    root: String,
    pattern: Option<&'static str>,
}

/// The analysis service. Holds a read-only reference to the corpus index and
/// never mutates it.
pub struct AnalysisService {
    index: Arc<CorpusIndex>,
    external: Option<Arc<dyn ExternalAnalyzer>>,
    highlight_examples: bool,
}

impl AnalysisService {
    /// Create a new analysis service over a built corpus index
    pub fn new(index: Arc<CorpusIndex>, highlight_examples: bool) -> Self {
        Self {
            index,
            external: None,
            highlight_examples,
        }
    }

    /// Attach an external analyzer collaborator
    pub fn with_external(mut self, external: Arc<dyn ExternalAnalyzer>) -> Self {
        self.external = Some(external);
        self
    }

    /// Build statistics of the underlying corpus index
    pub fn corpus_stats(&self) -> &crate::corpus::CorpusStats {
        self.index.stats()
    }

    /// Analyze a single word. Pure and non-blocking.
    pub fn analyze(&self, raw_word: &str) -> Result<AnalysisResult> {
        let trimmed = raw_word.trim();
        if trimmed.is_empty() {
            return Err(AnalyzerError::InvalidInput {
                reason: "empty word".to_string(),
            });
        }

        let word = normalize::normalize(trimmed);
        if word.is_empty() {
            return Err(AnalyzerError::NotFound {
                word: trimmed.to_string(),
            });
        }

        let accepted = self
            .resolve_against_index(&word)
            .or_else(|| self.bare_root(&word))
            .ok_or_else(|| AnalyzerError::NotFound { word: word.clone() })?;

        Ok(self.assemble(trimmed, accepted))
    }

    /// Analyze and, when an external analyzer is attached, blend in its
    /// analyses as separately tagged entries. External failure degrades to an
    /// empty list; it never affects the core resolution.
    pub async fn analyze_blended(&self, raw_word: &str) -> Result<AnalysisResult> {
        let mut result = self.analyze(raw_word)?;

        if let Some(external) = &self.external {
            match external.analyze(&result.word).await {
                Ok(analyses) => result.external = analyses,
                Err(e) => tracing::warn!("external analyzer unavailable: {}", e),
            }
        }

        Ok(result)
    }

    /// Try segmentation candidates in order; within each, root hypotheses in
    /// order; accept the first root the index recognizes
    fn resolve_against_index(&self, word: &str) -> Option<Accepted> {
        for candidate in affix::segment(word) {
            let core = candidate.core().to_string();
            for hyp in resolver::hypotheses(&core) {
                if self.index.contains_root(&hyp.root) {
                    return Some(Accepted {
                        segments: candidate.segments,
                        root: hyp.root,
                        pattern: hyp.pattern,
                    });
                }
            }
        }
        None
    }

    /// Degenerate analysis: the whole word is itself a known root
    fn bare_root(&self, word: &str) -> Option<Accepted> {
        if !self.index.contains_root(word) {
            return None;
        }
        Some(Accepted {
            segments: vec![Segment::new(word, SegmentKind::Root)],
            root: word.to_string(),
            pattern: resolver::match_pattern(word, word),
        })
    }

    fn assemble(&self, original: &str, accepted: Accepted) -> AnalysisResult {
        let (root_occurrences, example_verses) = match self.index.lookup(&accepted.root) {
            Some(entry) => (
                entry.occurrence_count,
                entry
                    .example_verses
                    .iter()
                    .map(|verse| ExampleVerse {
                        surah: verse.locator.surah,
                        ayah: verse.locator.ayah,
                        text: if self.highlight_examples {
                            utils::highlight_root(&verse.text, &accepted.root)
                        } else {
                            verse.text.clone()
                        },
                    })
                    .collect(),
            ),
            None => (0, Vec::new()),
        };

        AnalysisResult {
            word: original.to_string(),
            segments: accepted.segments,
            root: accepted.root,
            pattern: accepted.pattern.map(str::to_string),
            root_occurrences,
            example_verses,
            external: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::RootMatchPolicy;
    use std::collections::HashSet;

    fn service(lines: &[&str], roots: &[&str]) -> AnalysisService {
        let root_set: HashSet<String> = roots.iter().map(|r| r.to_string()).collect();
        let index = CorpusIndex::build(
            lines.iter().copied(),
            Some(&root_set),
            RootMatchPolicy::LetterSet,
            3,
        );
        AnalysisService::new(Arc::new(index), false)
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let service = service(&["1|1|كتب"], &["كتب"]);
        for word in ["", "   ", "\t"] {
            match service.analyze(word) {
                Err(AnalyzerError::InvalidInput { .. }) => {}
                other => panic!("expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unknown_word_is_not_found() {
        let service = service(&["1|1|كتب"], &["كتب"]);
        match service.analyze("شمس") {
            Err(AnalyzerError::NotFound { .. }) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_prefix_and_suffix_stripped_to_known_root() {
        let service = service(
            &["2|282|وليكتب بينكم كاتب بالعدل"],
            &["كتب"],
        );
        let result = service.analyze("الكاتبون").unwrap();

        assert_eq!(result.root, "كتب");
        assert_eq!(result.pattern.as_deref(), Some("فَاعَلَ"));
        assert_eq!(
            result.segments,
            vec![
                Segment::new("ال", SegmentKind::Prefix),
                Segment::new("كاتب", SegmentKind::Root),
                Segment::new("ون", SegmentKind::Suffix),
            ],
        );
        assert_eq!(result.root_occurrences, 1);
        assert_eq!(result.example_verses.len(), 1);
    }

    #[test]
    fn test_segments_reconstruct_normalized_word() {
        let service = service(&["1|1|قول كتب"], &["قول", "كتب"]);
        for word in ["الكاتبون", "والقول", "كتب"] {
            let result = service.analyze(word).unwrap();
            let rebuilt: String = result.segments.iter().map(|s| s.text.as_str()).collect();
            assert_eq!(rebuilt, normalize::normalize(word));
        }
    }

    #[test]
    fn test_first_recognized_candidate_wins() {
        // bare word first: a word that is already a known root is not stripped
        let service = service(&["1|1|قول سكن"], &["سكن"]);
        let result = service.analyze("سكن").unwrap();
        assert_eq!(result.root, "سكن");
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].kind, SegmentKind::Root);
    }

    #[test]
    fn test_unmatched_pattern_is_null_not_error() {
        // the middle trigram of يقولون is قول, but no wazn rebuilds that
        // surface form, so the pattern stays unknown
        let service = service(&["2|83|قالوا لن نؤمن"], &["قول"]);
        let result = service.analyze("يقولون").unwrap();

        assert_eq!(result.root, "قول");
        assert_eq!(result.pattern, None);
        assert_eq!(result.root_occurrences, 1);
    }

    #[test]
    fn test_known_root_without_occurrences() {
        let service = service(&["1|1|ذهب الرجل"], &["كتب", "ذهب"]);
        let result = service.analyze("كتب").unwrap();

        assert_eq!(result.root, "كتب");
        assert_eq!(result.root_occurrences, 0);
        assert!(result.example_verses.is_empty());
    }

    #[test]
    fn test_highlighting_wraps_root_letters() {
        let root_set: HashSet<String> = ["قول".to_string()].into_iter().collect();
        let index = CorpusIndex::build(
            ["2|83|قالوا لن نؤمن"],
            Some(&root_set),
            RootMatchPolicy::LetterSet,
            3,
        );
        let service = AnalysisService::new(Arc::new(index), true);

        let result = service.analyze("والقول").unwrap();
        let text = &result.example_verses[0].text;
        assert!(text.contains("<span class=\"highlight-root\">ق</span>"));
        // ن is not a root letter and stays unwrapped
        assert!(!text.contains("<span class=\"highlight-root\">ن</span>"));
    }
}
