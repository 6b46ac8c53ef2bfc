//! Catalog entries and the parsed form of their names.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::text::CaseRules;

// A trailing "(...)" group, e.g. "MENEMEN (SADE)".
static TRAILING_PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(?P<main>.*?)\s*\((?P<alias>[^()]*)\)\s*$").unwrap());

/// One product line from the catalog extractor. Order in the catalog
/// decides which entry gets first pick of ambiguous tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub price: Option<f64>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), ValidationError> {
        match self.price {
            Some(price) if !price.is_finite() => Err(ValidationError::InvalidPrice { index }),
            _ => Ok(()),
        }
    }
}

/// Catalog entry as it arrives on the wire, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCatalogEntry {
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl RawCatalogEntry {
    pub fn into_entry(self, index: usize) -> Result<CatalogEntry, ValidationError> {
        let name = self.name.ok_or(ValidationError::MissingName { index })?;
        let entry = CatalogEntry {
            name,
            price: self.price,
        };
        entry.validate(index)?;
        Ok(entry)
    }
}

/// Validates a wire catalog, failing on the first malformed entry.
pub fn validate_catalog(raw: Vec<RawCatalogEntry>) -> Result<Vec<CatalogEntry>, ValidationError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, entry)| entry.into_entry(index))
        .collect()
}

/// A catalog name split into the words to look for and an optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Upper-cased words, in reading order.
    pub main_words: Vec<String>,
    /// Upper-cased content of a trailing `(...)` group.
    pub parenthetical: Option<String>,
}

impl ParsedName {
    pub fn parse(name: &str, rules: CaseRules) -> Self {
        let (main, alias) = match TRAILING_PARENTHETICAL.captures(name) {
            Some(caps) => (
                caps.name("main").map_or("", |m| m.as_str()),
                caps.name("alias").map(|m| m.as_str().trim()),
            ),
            None => (name, None),
        };

        ParsedName {
            main_words: main.split_whitespace().map(|w| rules.key(w)).collect(),
            parenthetical: alias.filter(|a| !a.is_empty()).map(|a| rules.key(a)),
        }
    }

    pub fn first_word(&self) -> Option<&str> {
        self.main_words.first().map(String::as_str)
    }

    /// Words after the first.
    pub fn following_words(&self) -> &[String] {
        self.main_words.get(1..).unwrap_or(&[])
    }
}
