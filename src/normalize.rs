//! # Text Normalization Module
//!
//! ## Purpose
//! Canonicalizes raw Arabic text for matching: hidden-character stripping,
//! letter-variant folding and diacritic removal, plus tokenization of verse
//! text into Arabic word tokens.
//!
//! ## Input/Output Specification
//! - **Input**: Raw UTF-8 text (words or verse lines)
//! - **Output**: Normalized text free of diacritics, tatweel, hidden
//!   characters and letter-variant ambiguity
//! - **Properties**: Idempotent and total; unrecognized characters pass through
//!
//! ## Key Features
//! - Hamza forms folded to bare alef, tāʾ marbūṭa to hāʾ, alef maqṣūra to yāʾ
//! - Tashkeel removal over the Arabic diacritic Unicode ranges
//! - Arabic-run tokenization; punctuation and foreign characters separate
//!   tokens and never appear inside one

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Zero-width marks, BOM, no-break space and the Arabic letter mark.
/// These never carry lexical content and are stripped before matching.
const HIDDEN_CHARS: [char; 8] = [
    '\u{200B}', '\u{200C}', '\u{200D}', '\u{200E}', '\u{200F}', '\u{FEFF}', '\u{00A0}',
    '\u{061C}',
];

static ARABIC_TOKEN: OnceLock<Regex> = OnceLock::new();

/// Canonicalize raw text for matching.
///
/// Steps, order-sensitive: NFC composition, hidden-character stripping,
/// letter-variant folding (آ/أ/إ → ا, ة → ه, ى → ي, tatweel deleted), then
/// tashkeel removal. The same function must be applied to both query words
/// and corpus text before any comparison.
pub fn normalize(raw: &str) -> String {
    let composed: String = raw.nfc().collect();
    let mut out = String::with_capacity(composed.len());

    for ch in composed.chars() {
        if HIDDEN_CHARS.contains(&ch) || is_tashkeel(ch) {
            continue;
        }
        match ch {
            'آ' | 'أ' | 'إ' => out.push('ا'),
            'ة' => out.push('ه'),
            'ى' => out.push('ي'),
            // tatweel
            'ـ' => {}
            _ => out.push(ch),
        }
    }

    out
}

/// Check whether a character falls in the Arabic diacritic (tashkeel) ranges
pub fn is_tashkeel(ch: char) -> bool {
    matches!(
        ch,
        '\u{064B}'..='\u{0652}' | '\u{0610}'..='\u{061A}' | '\u{06D6}'..='\u{06ED}'
    )
}

/// Check whether a character is an Arabic letter
pub fn is_arabic_letter(ch: char) -> bool {
    ('\u{0621}'..='\u{064A}').contains(&ch)
}

/// Extract the Arabic word tokens of a (normalized) text: maximal runs of
/// Arabic letters. Everything else is a separator.
pub fn tokenize(text: &str) -> Vec<&str> {
    let regex = ARABIC_TOKEN
        .get_or_init(|| Regex::new(r"[\x{0621}-\x{064A}]+").expect("static token pattern"));
    regex.find_iter(text).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folds_letter_variants() {
        assert_eq!(normalize("أكل"), "اكل");
        assert_eq!(normalize("إلى"), "الي");
        assert_eq!(normalize("آمن"), "امن");
        assert_eq!(normalize("رحمة"), "رحمه");
        assert_eq!(normalize("هدى"), "هدي");
    }

    #[test]
    fn test_strips_tashkeel() {
        assert_eq!(normalize("كُتِبَ عَلَيْكُمُ"), "كتب عليكم");
        assert_eq!(normalize("مُحَمَّدٌ"), "محمد");
    }

    #[test]
    fn test_strips_tatweel_and_hidden_characters() {
        assert_eq!(normalize("كـــتـــب"), "كتب");
        assert_eq!(normalize("\u{FEFF}كتب\u{200B}"), "كتب");
        assert_eq!(normalize("لن\u{00A0}نؤمن"), "لننؤمن");
    }

    #[test]
    fn test_unrecognized_characters_pass_through() {
        assert_eq!(normalize("abc 123"), "abc 123");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "قَالُوا لَنْ نُؤْمِنَ",
            "الْكَاتِبُونَ",
            "رحمة الله",
            "ـمـد\u{200C}رسة",
            "mixed عربي text",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_tokenize_splits_on_non_arabic() {
        let tokens = tokenize("قالوا لن نؤمن");
        assert_eq!(tokens, vec!["قالوا", "لن", "نؤمن"]);

        let tokens = tokenize("بسم: الله، 12 الرحمن");
        assert_eq!(tokens, vec!["بسم", "الله", "الرحمن"]);

        assert!(tokenize("no arabic here").is_empty());
    }
}
