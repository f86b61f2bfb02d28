//! # Root & Pattern Resolution Module
//!
//! ## Purpose
//! Derives a triliteral or quadriliteral root from a residual core and matches
//! the core against classical wazn templates.
//!
//! ## Input/Output Specification
//! - **Input**: A normalized core string (affixes already stripped)
//! - **Output**: Ordered root hypotheses, each with an optional matched wazn
//! - **Invariant**: Every hypothesis root has exactly 3 or 4 letters
//!
//! ## Key Features
//! - Explicit ordered derivation strategies: weak-letter elision, the core
//!   verbatim, then the middle-trigram fallback
//! - Template matching by character-for-character substitution of the root
//!   letters into diacritic-free skeletons
//! - Lossy by design; the corpus index, not this module, decides which
//!   hypothesis is accepted

use crate::errors::{AnalyzerError, Result};

/// Letters elided inside derived stems (long vowels and alef)
const WEAK_LETTERS: [char; 3] = ['ا', 'و', 'ي'];

/// A wazn template: vocalized name for display, diacritic-free skeleton for
/// matching. ف/ع/ل are placeholders for the root letters; every other
/// skeleton character is literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternTemplate {
    pub name: &'static str,
    pub skeleton: &'static str,
}

/// Triliteral scales. Cores are diacritic-free, so scales that differ only in
/// tashkeel collapse into one skeleton (فَعَلَ also covers فَعَّلَ, أَفْعَلَ covers
/// اِفْعَلَّ, فُعُول covers فَعُول).
pub const TRILITERAL_TEMPLATES: &[PatternTemplate] = &[
    PatternTemplate { name: "فَعَلَ", skeleton: "فعل" },
    PatternTemplate { name: "فَاعَلَ", skeleton: "فاعل" },
    PatternTemplate { name: "أَفْعَلَ", skeleton: "افعل" },
    PatternTemplate { name: "تَفَعَّلَ", skeleton: "تفعل" },
    PatternTemplate { name: "تَفَاعَلَ", skeleton: "تفاعل" },
    PatternTemplate { name: "اِفْتَعَلَ", skeleton: "افتعل" },
    PatternTemplate { name: "اِنْفَعَلَ", skeleton: "انفعل" },
    PatternTemplate { name: "اِسْتَفْعَلَ", skeleton: "استفعل" },
    PatternTemplate { name: "مُفَاعَلَة", skeleton: "مفاعله" },
    PatternTemplate { name: "فِعَال", skeleton: "فعال" },
    PatternTemplate { name: "فُعُول", skeleton: "فعول" },
    PatternTemplate { name: "فَعِيل", skeleton: "فعيل" },
    PatternTemplate { name: "فَعَالَة", skeleton: "فعاله" },
];

/// Quadriliteral scales
pub const QUADRILITERAL_TEMPLATES: &[PatternTemplate] = &[
    PatternTemplate { name: "فَعْلَلَ", skeleton: "فعلل" },
    PatternTemplate { name: "تَفَعْلَلَ", skeleton: "تفعلل" },
    PatternTemplate { name: "اِفْعَنْلَلَ", skeleton: "افعنلل" },
    PatternTemplate { name: "فَعْلَلِيّ", skeleton: "فعللي" },
    PatternTemplate { name: "فَعْلَلَة", skeleton: "فعلله" },
    PatternTemplate { name: "فِعْلَال", skeleton: "فعلال" },
];

/// Root-derivation strategies, tried in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootStrategy {
    /// Weak letters removed from a longer core (takes كاتب to كتب)
    WeakElision,
    /// A 3- or 4-letter core taken as the root itself
    Verbatim,
    /// Middle three letters of a longer core, a documented lossy fallback
    MiddleTrigram,
}

/// One candidate root for a core, with the first wazn whose substitution
/// reproduces the core (if any)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootHypothesis {
    pub root: String,
    pub pattern: Option<&'static str>,
    pub strategy: RootStrategy,
}

/// Substitute root letters into a skeleton. ف → r0, ع → r1, the first ل → r2
/// and, for quadriliteral roots, the second ل → r3.
fn substitute(skeleton: &str, root: &[char]) -> Option<String> {
    let mut out = String::with_capacity(skeleton.len());
    let mut lam_seen = 0usize;
    for ch in skeleton.chars() {
        match ch {
            'ف' => out.push(*root.first()?),
            'ع' => out.push(*root.get(1)?),
            'ل' => {
                let index = if root.len() == 4 && lam_seen == 1 { 3 } else { 2 };
                lam_seen += 1;
                out.push(*root.get(index)?);
            }
            _ => out.push(ch),
        }
    }
    Some(out)
}

/// First template whose substitution with `root` reproduces `core` exactly,
/// or `None`; pattern-unknown is not a failure.
pub fn match_pattern(core: &str, root: &str) -> Option<&'static str> {
    let letters: Vec<char> = root.chars().collect();
    let templates = match letters.len() {
        3 => TRILITERAL_TEMPLATES,
        4 => QUADRILITERAL_TEMPLATES,
        _ => return None,
    };
    templates
        .iter()
        .find(|t| substitute(t.skeleton, &letters).as_deref() == Some(core))
        .map(|t| t.name)
}

fn hypothesis(root: String, strategy: RootStrategy, core: &str) -> RootHypothesis {
    let pattern = match_pattern(core, &root);
    RootHypothesis {
        root,
        pattern,
        strategy,
    }
}

/// Ordered root hypotheses for a core. Empty when the core has fewer than
/// three letters and nothing can be derived.
pub fn hypotheses(core: &str) -> Vec<RootHypothesis> {
    let letters: Vec<char> = core.chars().collect();
    let mut out: Vec<RootHypothesis> = Vec::new();

    if letters.len() > 3 {
        let solid: Vec<char> = letters
            .iter()
            .copied()
            .filter(|ch| !WEAK_LETTERS.contains(ch))
            .collect();
        if solid.len() == 3 || solid.len() == 4 {
            let root: String = solid.into_iter().collect();
            if root != core {
                out.push(hypothesis(root, RootStrategy::WeakElision, core));
            }
        }
    }

    if letters.len() == 3 || letters.len() == 4 {
        out.push(hypothesis(core.to_string(), RootStrategy::Verbatim, core));
    }

    if letters.len() > 4 {
        let start = (letters.len() - 3) / 2;
        let root: String = letters[start..start + 3].iter().collect();
        if !out.iter().any(|h| h.root == root) {
            out.push(hypothesis(root, RootStrategy::MiddleTrigram, core));
        }
    }

    out
}

/// Resolve a core to its preferred root hypothesis.
///
/// Fails with `NotFound` only when no hypothesis can be formed (empty core or
/// nothing reducible). Recoverable, surfaced to callers as word-not-found.
pub fn resolve(core: &str) -> Result<RootHypothesis> {
    hypotheses(core)
        .into_iter()
        .next()
        .ok_or_else(|| AnalyzerError::NotFound {
            word: core.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_letter_core_is_its_own_root() {
        let hyp = resolve("كتب").unwrap();
        assert_eq!(hyp.root, "كتب");
        assert_eq!(hyp.strategy, RootStrategy::Verbatim);
        assert_eq!(hyp.pattern, Some("فَعَلَ"));
    }

    #[test]
    fn test_weak_elision_reduces_active_participle() {
        let hyp = resolve("كاتب").unwrap();
        assert_eq!(hyp.root, "كتب");
        assert_eq!(hyp.strategy, RootStrategy::WeakElision);
        assert_eq!(hyp.pattern, Some("فَاعَلَ"));
    }

    #[test]
    fn test_solid_four_letter_core_is_quadriliteral() {
        let hyp = resolve("دحرج").unwrap();
        assert_eq!(hyp.root, "دحرج");
        assert_eq!(hyp.strategy, RootStrategy::Verbatim);
        assert_eq!(hyp.pattern, Some("فَعْلَلَ"));
    }

    #[test]
    fn test_middle_trigram_fallback() {
        let hyps = hypotheses("يقولون");
        assert!(hyps
            .iter()
            .any(|h| h.root == "قول" && h.strategy == RootStrategy::MiddleTrigram));
    }

    #[test]
    fn test_all_roots_have_three_or_four_letters() {
        for core in ["كتب", "كاتب", "استغفر", "الكاتبون", "مدرسه"] {
            for hyp in hypotheses(core) {
                let len = hyp.root.chars().count();
                assert!(len == 3 || len == 4, "root {} from {core}", hyp.root);
            }
        }
    }

    #[test]
    fn test_substitution_reproduces_surface_forms() {
        let root: Vec<char> = "كتب".chars().collect();
        assert_eq!(substitute("فاعل", &root).unwrap(), "كاتب");
        assert_eq!(substitute("استفعل", &root).unwrap(), "استكتب");
        assert_eq!(substitute("فعول", &root).unwrap(), "كتوب");

        let quad: Vec<char> = "دحرج".chars().collect();
        assert_eq!(substitute("تفعلل", &quad).unwrap(), "تدحرج");
    }

    #[test]
    fn test_unmatched_core_reports_no_pattern() {
        // weak elision gives سطر, but no wazn rebuilds سيطر from it
        let hyp = resolve("سيطر").unwrap();
        assert_eq!(hyp.root, "سطر");
        assert_eq!(hyp.pattern, None);
    }

    #[test]
    fn test_too_short_core_is_not_found() {
        assert!(resolve("").is_err());
        assert!(resolve("من").is_err());
    }
}
