//! # Arabic Root Analyzer
//!
//! ## Overview
//! This library implements a rule-based Arabic morphological analyzer that
//! segments a word into affixes and a core, derives its triliteral or
//! quadriliteral root, matches the core against classical wazn templates, and
//! reports where the root occurs in a fixed verse corpus.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `normalize`: Diacritic stripping, letter-variant folding, tokenization
//! - `affix`: Ordered prefix/suffix inventories and the word segmenter
//! - `resolver`: Root derivation strategies and pattern template matching
//! - `corpus`: Immutable root-occurrence index built from the verse corpus
//! - `analysis`: Orchestration of segmentation, resolution and index lookup
//! - `external`: Capability traits for the hosted analyzer and translator
//! - `api`: REST API endpoints
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: A single Arabic word (analysis requests), a pipe-delimited
//!   verse corpus file (startup)
//! - **Output**: Labeled segments, root, wazn pattern, occurrence count and
//!   example verses
//! - **Performance**: Index built once at startup; queries are pure reads
//!
//! ## Usage
//! ```rust,no_run
//! use arabic_root_analyzer::analysis::AnalysisService;
//! use arabic_root_analyzer::corpus::{CorpusIndex, RootMatchPolicy};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let index = CorpusIndex::load(
//!         Path::new("quraan.txt"),
//!         None,
//!         RootMatchPolicy::LetterSet,
//!         3,
//!     )?;
//!     let service = AnalysisService::new(Arc::new(index), true);
//!     let result = service.analyze("الكاتبون")?;
//!     println!("root: {}", result.root);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod errors;
pub mod normalize;
pub mod affix;
pub mod resolver;
pub mod corpus;
pub mod analysis;
pub mod external;
pub mod api;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use analysis::{AnalysisResult, AnalysisService};
pub use config::Config;
pub use corpus::{CorpusIndex, RootIndexEntry, RootMatchPolicy, VerseRecord};
pub use errors::{AnalyzerError, Result};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Kind of one labeled substring of a decomposed word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Prefix,
    Root,
    Suffix,
    Extra,
}

/// One labeled substring of a decomposed word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment text (already normalized)
    pub text: String,
    /// Segment kind
    pub kind: SegmentKind,
}

impl Segment {
    pub fn new(text: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// An ordered decomposition of a normalized word.
///
/// Invariant: concatenating the segment texts in order reproduces the
/// normalized input word exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedWord {
    pub segments: Vec<Segment>,
}

impl SegmentedWord {
    /// The core segment text, the residual stem after affix stripping
    pub fn core(&self) -> &str {
        self.segments
            .iter()
            .find(|s| s.kind == SegmentKind::Root)
            .map(|s| s.text.as_str())
            .unwrap_or("")
    }

    /// Reassemble the original normalized word from the segments
    pub fn reconstruct(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Verse locator within the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseRef {
    pub surah: u32,
    pub ayah: u32,
}

/// Application state shared across API handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub analysis: Arc<analysis::AnalysisService>,
    pub translator: Option<Arc<dyn external::Translator>>,
}
