//! # Utilities Module
//!
//! ## Purpose
//! Small helpers shared across the analyzer: operation timing and root-letter
//! highlighting for example verses.
//!
//! ## Input/Output Specification
//! - **Input**: Operation names, verse text and roots
//! - **Output**: Elapsed durations, highlighted verse HTML
//!
//! ## Key Features
//! - Performance timer with debug logging
//! - Root-letter highlighting matching the frontend's CSS class

use std::collections::HashSet;
use std::time::Instant;

/// Performance timer for measuring operation duration
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    /// Start a new timer with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Stop timer and log duration
    pub fn stop(self) -> u64 {
        let elapsed = self.elapsed_ms();
        tracing::debug!("timer '{}' completed in {}ms", self.name, elapsed);
        elapsed
    }
}

/// Wrap every root letter of a verse in a highlight span. Letters outside the
/// root letter set pass through untouched.
pub fn highlight_root(verse: &str, root: &str) -> String {
    let root_letters: HashSet<char> = root.chars().collect();
    let mut out = String::with_capacity(verse.len());

    for ch in verse.chars() {
        if root_letters.contains(&ch) {
            out.push_str("<span class=\"highlight-root\">");
            out.push(ch);
            out.push_str("</span>");
        } else {
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_reports_elapsed() {
        let timer = Timer::new("test");
        assert!(timer.elapsed_ms() < 1_000);
        timer.stop();
    }

    #[test]
    fn test_highlight_wraps_only_root_letters() {
        let highlighted = highlight_root("كتب له", "كتب");
        assert_eq!(
            highlighted,
            "<span class=\"highlight-root\">ك</span>\
             <span class=\"highlight-root\">ت</span>\
             <span class=\"highlight-root\">ب</span> له"
        );
    }

    #[test]
    fn test_highlight_without_matches_is_identity() {
        assert_eq!(highlight_root("لن نؤمن", "قسط"), "لن نؤمن");
    }
}
