//! Case folding and prefix helpers shared by token indexing and name parsing.
//!
//! All comparisons in the matcher happen on "keys": NFC-normalized, trimmed,
//! upper-cased text. Prefix lengths are counted in Unicode scalar values so a
//! five letter Turkish word is five long whatever its UTF-8 length.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Letters outside ASCII that belong to the Turkish alphabet, plus the
/// circumflexed vowels still found on printed menus.
const TURKISH_EXTRA_LETTERS: &str = "ÇĞİÖŞÜçğıöşüÂÎÛâîû";

const COMBINING_DOT_ABOVE: char = '\u{0307}';

/// Script conventions of the page. Keys are the same under every variant;
/// the rules decide which letters make a token count as emphasized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseRules {
    /// Turkish alphabet, including dotted/dotless i.
    #[default]
    Turkish,
    /// Any alphabetic character.
    Unicode,
}

impl CaseRules {
    /// Upper-cases `text` after NFC normalization and trimming.
    ///
    /// Dotted and dotless i fold to one letter, `I`, so that `Simit`,
    /// `SİMİT` and `SIMIT` share a key whichever way the menu or the
    /// catalog was typed.
    pub fn key(self, text: &str) -> String {
        let normalized: String = text.trim().nfc().collect();
        let mut out = String::with_capacity(normalized.len());
        for c in normalized.chars() {
            match c {
                'i' | 'ı' | 'İ' => out.push('I'),
                // leftover dot of a decomposed "i̇"
                COMBINING_DOT_ABOVE if out.ends_with('I') => {}
                _ => out.extend(c.to_uppercase()),
            }
        }
        out
    }

    /// True for alphabetic characters that belong to this script.
    pub fn is_script_letter(self, c: char) -> bool {
        match self {
            CaseRules::Turkish => c.is_ascii_alphabetic() || TURKISH_EXTRA_LETTERS.contains(c),
            CaseRules::Unicode => c.is_alphabetic(),
        }
    }

    /// A token is emphasized when it has no lower-case letter and at least
    /// one letter of the script.
    pub fn is_emphasized(self, text: &str) -> bool {
        let normalized: String = text.nfc().collect();
        let mut has_letter = false;
        for c in normalized.chars() {
            if c.is_lowercase() {
                return false;
            }
            if c.is_alphabetic() && self.is_script_letter(c) {
                has_letter = true;
            }
        }
        has_letter
    }
}

/// Number of Unicode scalar values in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The first `n` characters of `s` (all of `s` when shorter).
pub fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// `key` starts with the first `n` characters of `word`.
#[inline]
pub fn shares_prefix(key: &str, word: &str, n: usize) -> bool {
    key.starts_with(char_prefix(word, n))
}
