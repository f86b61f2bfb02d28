//! # Corpus Index Module
//!
//! ## Purpose
//! Builds and serves the immutable root-occurrence index over the verse
//! corpus: which roots appear in which verses, how often, with bounded
//! example lists.
//!
//! ## Input/Output Specification
//! - **Input**: UTF-8 corpus file, one `surah|ayah|text` verse per line;
//!   optionally an auxiliary root-set file (one root per line)
//! - **Output**: O(1) `root → {occurrence count, example verses}` lookups
//! - **Lifecycle**: Built once at startup, read-only for the process lifetime
//!
//! ## Key Features
//! - Malformed lines are skipped and counted, never fatal; an unreadable or
//!   entirely malformed file is fatal at startup
//! - Root matching is letter-set containment by default: roots are
//!   discontinuous in surface forms, so exact matching under-counts. The
//!   chosen approximation over-counts instead and stays swappable via
//!   `RootMatchPolicy`.
//! - Without an auxiliary root set, the root universe is derived from the
//!   corpus tokens themselves through the segmenter and resolver
//! - Deterministic build: identical input yields identical counts and
//!   example lists

use crate::errors::{AnalyzerError, Result};
use crate::{affix, normalize, resolver, VerseRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// One verse of the corpus, immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRecord {
    /// Verse locator (surah and ayah numbers)
    pub locator: VerseRef,
    /// Normalized verse text
    pub text: String,
}

/// Index entry for one root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootIndexEntry {
    /// The root itself
    pub root: String,
    /// Number of verses whose tokens match the root
    pub occurrence_count: usize,
    /// Example verses, oldest first, bounded by the configured cap
    pub example_verses: Vec<VerseRecord>,
}

/// How a verse token is matched against a root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootMatchPolicy {
    /// Token letter set contains the root letter set (default; permissive)
    #[default]
    LetterSet,
    /// Normalized token equals the root string (strict; under-counts)
    TokenEquality,
}

/// Build statistics, frozen with the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    /// Verses successfully parsed
    pub verse_count: usize,
    /// Roots with at least one occurrence
    pub root_count: usize,
    /// Distinct roots the index recognizes
    pub known_root_count: usize,
    /// Malformed lines skipped during parsing
    pub skipped_lines: usize,
    /// Matching policy the index was built with
    pub policy: RootMatchPolicy,
    /// Example list bound
    pub example_cap: usize,
    /// Build timestamp
    pub built_at: DateTime<Utc>,
}

/// The root-occurrence index. Exclusively owns all verse records and index
/// entries; shared by reference after startup and never mutated.
pub struct CorpusIndex {
    entries: HashMap<String, RootIndexEntry>,
    known_roots: HashSet<String>,
    stats: CorpusStats,
}

impl CorpusIndex {
    /// Load and index the corpus file. Fatal if the file is unreadable or
    /// yields no valid verse at all.
    pub fn load(
        path: &Path,
        roots: Option<&HashSet<String>>,
        policy: RootMatchPolicy,
        example_cap: usize,
    ) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| AnalyzerError::CorpusLoad {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;

        let index = Self::build(raw.lines(), roots, policy, example_cap);
        if index.stats.verse_count == 0 {
            return Err(AnalyzerError::CorpusLoad {
                path: path.display().to_string(),
                details: "no valid verse lines".to_string(),
            });
        }

        tracing::info!(
            "loaded corpus from {}: {} verses, {} indexed roots, {} malformed lines skipped",
            path.display(),
            index.stats.verse_count,
            index.stats.root_count,
            index.stats.skipped_lines,
        );
        Ok(index)
    }

    /// Build the index from corpus lines. When no root set is supplied, the
    /// root universe is derived from the corpus tokens themselves.
    pub fn build<'a, I>(
        lines: I,
        roots: Option<&HashSet<String>>,
        policy: RootMatchPolicy,
        example_cap: usize,
    ) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut skipped = 0usize;
        let mut verses = Vec::new();
        for line in lines {
            match parse_line(line) {
                Some(verse) => verses.push(verse),
                None => {
                    if !line.trim().is_empty() {
                        skipped += 1;
                        tracing::debug!("skipping malformed corpus line: {line:?}");
                    }
                }
            }
        }

        let known_roots: HashSet<String> = match roots {
            Some(set) => set
                .iter()
                .map(|root| normalize::normalize(root))
                .filter(|root| {
                    let len = root.chars().count();
                    len == 3 || len == 4
                })
                .collect(),
            None => derive_roots(&verses),
        };

        let root_letters: Vec<(&String, HashSet<char>)> = known_roots
            .iter()
            .map(|root| (root, root.chars().collect()))
            .collect();

        let mut entries: HashMap<String, RootIndexEntry> = HashMap::new();
        for verse in &verses {
            let tokens = normalize::tokenize(&verse.text);
            let token_sets: Vec<HashSet<char>> =
                tokens.iter().map(|token| token.chars().collect()).collect();

            for (root, letters) in &root_letters {
                let matched = match policy {
                    RootMatchPolicy::LetterSet => {
                        token_sets.iter().any(|set| letters.is_subset(set))
                    }
                    RootMatchPolicy::TokenEquality => {
                        tokens.iter().any(|token| *token == root.as_str())
                    }
                };
                if matched {
                    let entry =
                        entries
                            .entry((*root).clone())
                            .or_insert_with(|| RootIndexEntry {
                                root: (*root).clone(),
                                occurrence_count: 0,
                                example_verses: Vec::new(),
                            });
                    entry.occurrence_count += 1;
                    if entry.example_verses.len() < example_cap {
                        entry.example_verses.push(verse.clone());
                    }
                }
            }
        }

        let stats = CorpusStats {
            verse_count: verses.len(),
            root_count: entries.len(),
            known_root_count: known_roots.len(),
            skipped_lines: skipped,
            policy,
            example_cap,
            built_at: Utc::now(),
        };

        Self {
            entries,
            known_roots,
            stats,
        }
    }

    /// O(1) occurrence lookup; `None` means the root never matched a verse
    pub fn lookup(&self, root: &str) -> Option<&RootIndexEntry> {
        self.entries.get(root)
    }

    /// Whether the index recognizes this root at all
    pub fn contains_root(&self, root: &str) -> bool {
        self.known_roots.contains(root)
    }

    /// Build statistics
    pub fn stats(&self) -> &CorpusStats {
        &self.stats
    }
}

/// Parse one `surah|ayah|text` line; `None` for blank or malformed lines
fn parse_line(line: &str) -> Option<VerseRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut fields = line.splitn(3, '|');
    let surah = fields.next()?.trim().parse().ok()?;
    let ayah = fields.next()?.trim().parse().ok()?;
    let text = fields.next()?.trim();
    if text.is_empty() {
        return None;
    }

    Some(VerseRecord {
        locator: VerseRef { surah, ayah },
        text: normalize::normalize(text),
    })
}

/// Derive the root universe from the corpus itself: the first resolvable
/// root of every distinct token, mirroring how the corpus is pre-rooted
/// upstream when no lexicon is available.
fn derive_roots(verses: &[VerseRecord]) -> HashSet<String> {
    let mut roots = HashSet::new();
    let mut seen_tokens = HashSet::new();

    for verse in verses {
        for token in normalize::tokenize(&verse.text) {
            if !seen_tokens.insert(token.to_string()) {
                continue;
            }
            for candidate in affix::segment(token) {
                if let Ok(hyp) = resolver::resolve(candidate.core()) {
                    roots.insert(hyp.root);
                    break;
                }
            }
        }
    }

    tracing::debug!("derived {} roots from corpus tokens", roots.len());
    roots
}

/// Load an auxiliary root-set file: one root per line, normalized, roots
/// that are not 3 or 4 letters long are dropped.
pub fn load_root_set(path: &Path) -> Result<HashSet<String>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(raw
        .lines()
        .map(|line| normalize::normalize(line.trim()))
        .filter(|root| {
            let len = root.chars().count();
            len == 3 || len == 4
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots(items: &[&str]) -> HashSet<String> {
        items.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_letter_set_containment_records_occurrence() {
        let index = CorpusIndex::build(
            ["2|83|قالوا لن نؤمن"],
            Some(&roots(&["قول"])),
            RootMatchPolicy::LetterSet,
            3,
        );

        let entry = index.lookup("قول").expect("قول indexed");
        assert_eq!(entry.occurrence_count, 1);
        assert_eq!(entry.example_verses.len(), 1);
        assert_eq!(
            entry.example_verses[0].locator,
            VerseRef { surah: 2, ayah: 83 }
        );
        assert_eq!(entry.example_verses[0].text, "قالوا لن نؤمن");
    }

    #[test]
    fn test_token_equality_is_stricter() {
        let lines = ["2|83|قالوا لن نؤمن", "3|1|قول معروف"];
        let index = CorpusIndex::build(
            lines,
            Some(&roots(&["قول"])),
            RootMatchPolicy::TokenEquality,
            3,
        );

        let entry = index.lookup("قول").expect("قول indexed");
        assert_eq!(entry.occurrence_count, 1);
        assert_eq!(entry.example_verses[0].locator, VerseRef { surah: 3, ayah: 1 });
    }

    #[test]
    fn test_malformed_lines_are_skipped_and_counted() {
        let lines = ["1|1|قول الحق", "garbage", "2|x|نص", "", "3|3|"];
        let index = CorpusIndex::build(
            lines,
            Some(&roots(&["قول"])),
            RootMatchPolicy::LetterSet,
            3,
        );

        assert_eq!(index.stats().verse_count, 1);
        assert_eq!(index.stats().skipped_lines, 3);
    }

    #[test]
    fn test_example_list_is_bounded() {
        let lines = [
            "1|1|كتب الاول",
            "1|2|كتب الثاني",
            "1|3|كتب الثالث",
            "1|4|كتب الرابع",
            "1|5|كتب الخامس",
        ];
        let index = CorpusIndex::build(
            lines,
            Some(&roots(&["كتب"])),
            RootMatchPolicy::LetterSet,
            2,
        );

        let entry = index.lookup("كتب").expect("كتب indexed");
        assert_eq!(entry.occurrence_count, 5);
        assert_eq!(entry.example_verses.len(), 2);
        // oldest-first retention
        assert_eq!(entry.example_verses[0].locator.ayah, 1);
        assert_eq!(entry.example_verses[1].locator.ayah, 2);
    }

    #[test]
    fn test_count_is_per_verse_not_per_token() {
        let index = CorpusIndex::build(
            ["1|1|كتب الكاتبون كتابا"],
            Some(&roots(&["كتب"])),
            RootMatchPolicy::LetterSet,
            3,
        );

        let entry = index.lookup("كتب").expect("كتب indexed");
        assert_eq!(entry.occurrence_count, 1);
    }

    #[test]
    fn test_build_is_deterministic() {
        let lines = [
            "2|83|قالوا لن نؤمن",
            "3|1|كتب عليكم القتال",
            "4|4|والكاتبون يكتبون",
        ];
        let root_set = roots(&["قول", "كتب", "قتل"]);
        let first = CorpusIndex::build(lines, Some(&root_set), RootMatchPolicy::LetterSet, 3);
        let second = CorpusIndex::build(lines, Some(&root_set), RootMatchPolicy::LetterSet, 3);

        for root in &root_set {
            assert_eq!(first.lookup(root), second.lookup(root), "entry for {root}");
        }
        assert_eq!(first.stats().verse_count, second.stats().verse_count);
        assert_eq!(first.stats().root_count, second.stats().root_count);
    }

    #[test]
    fn test_corpus_only_mode_derives_roots() {
        let index = CorpusIndex::build(
            ["1|1|كتب الحكم"],
            None,
            RootMatchPolicy::LetterSet,
            3,
        );

        assert!(index.stats().known_root_count > 0);
        assert!(index.contains_root("كتب"));
    }

    #[test]
    fn test_supplied_roots_are_normalized_and_filtered() {
        let index = CorpusIndex::build(
            ["1|1|اكل الطعام"],
            Some(&roots(&["أكل", "لن", "استغفار"])),
            RootMatchPolicy::LetterSet,
            3,
        );

        // أكل folds to اكل; the 2- and 6-letter entries are dropped
        assert!(index.contains_root("اكل"));
        assert_eq!(index.stats().known_root_count, 1);
        assert_eq!(index.lookup("اكل").expect("اكل indexed").occurrence_count, 1);
    }
}
