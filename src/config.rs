//! Matcher configuration.
//!
//! Every tolerance, prefix length and score bonus the engine uses lives here
//! so callers can tune them per menu family. Defaults reproduce the tuned
//! values the engine ships with. Settings can be built in code through
//! [`MatcherConfig::builder`] or loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::text::CaseRules;

/// Complete matcher configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Case rules of the menu's script
    pub case_rules: CaseRules,
    /// Words treated as conjunction markers inside names
    pub conjunctions: Vec<String>,
    /// Best candidates scoring below this are reported as misses
    pub min_score: i32,
    /// Layout region restriction
    pub region: RegionConfig,
    /// Prefix lengths for candidate and continuation matching
    pub prefixes: PrefixConfig,
    /// Spatial tolerances in source pixels
    pub tolerances: ToleranceConfig,
    /// Score bonuses
    pub weights: ScoreWeights,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            case_rules: CaseRules::default(),
            conjunctions: vec!["&".to_string(), "and".to_string()],
            min_score: 0,
            region: RegionConfig::default(),
            prefixes: PrefixConfig::default(),
            tolerances: ToleranceConfig::default(),
            weights: ScoreWeights::default(),
        }
    }
}

/// Layout region settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Tokens whose left edge is at or right of `width * left_column_fraction`
    /// are ignored. Use 1.0 for single-column pages.
    pub left_column_fraction: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            left_column_fraction: 0.55,
        }
    }
}

/// Prefix lengths, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixConfig {
    /// Second candidate pass, for first words at least this long
    pub long: usize,
    /// Third candidate pass, for first words in `medium..long`
    pub medium: usize,
    /// Fallback candidate pass
    pub short: usize,
    /// Following words
    pub continuation: usize,
    /// Parenthetical alias
    pub alias: usize,
}

impl Default for PrefixConfig {
    fn default() -> Self {
        Self {
            long: 5,
            medium: 4,
            short: 3,
            continuation: 3,
            alias: 3,
        }
    }
}

/// Spatial tolerances relative to the first matched token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    /// Max vertical distance between top edges for a conjunction token
    pub conjunction_band: f64,
    /// Max vertical distance between top edges for a following word
    pub continuation_band: f64,
    /// Max vertical distance between top edges for an alias token
    pub alias_band: f64,
    /// How far left of the first token a following word may start
    pub max_backtrack: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            conjunction_band: 25.0,
            continuation_band: 30.0,
            alias_band: 30.0,
            max_backtrack: 10.0,
        }
    }
}

/// Score bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub emphasized_start: i32,
    pub conjunction: i32,
    pub continuation: i32,
    pub emphasized_continuation: i32,
    pub parenthetical: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            emphasized_start: 10,
            conjunction: 2,
            continuation: 3,
            emphasized_continuation: 5,
            parenthetical: 5,
        }
    }
}

impl MatcherConfig {
    pub fn builder() -> MatcherConfigBuilder {
        MatcherConfigBuilder::default()
    }

    /// Parses and validates a TOML document. Missing keys take defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: MatcherConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fraction = self.region.left_column_fraction;
        if !fraction.is_finite() || fraction <= 0.0 {
            return Err(ConfigError::invalid(
                "region.left_column_fraction",
                format!("must be a positive number, got {fraction}"),
            ));
        }

        let p = &self.prefixes;
        for (field, value) in [
            ("prefixes.long", p.long),
            ("prefixes.medium", p.medium),
            ("prefixes.short", p.short),
            ("prefixes.continuation", p.continuation),
            ("prefixes.alias", p.alias),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }
        if !(p.short <= p.medium && p.medium <= p.long) {
            return Err(ConfigError::invalid(
                "prefixes",
                format!(
                    "expected short <= medium <= long, got {} / {} / {}",
                    p.short, p.medium, p.long
                ),
            ));
        }

        let t = &self.tolerances;
        for (field, value) in [
            ("tolerances.conjunction_band", t.conjunction_band),
            ("tolerances.continuation_band", t.continuation_band),
            ("tolerances.alias_band", t.alias_band),
            ("tolerances.max_backtrack", t.max_backtrack),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a non-negative number, got {value}"),
                ));
            }
        }

        if self.conjunctions.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::invalid(
                "conjunctions",
                "markers must not be blank",
            ));
        }

        Ok(())
    }
}

/// Builder for [`MatcherConfig`]; `build` validates.
#[derive(Debug, Clone, Default)]
pub struct MatcherConfigBuilder {
    config: MatcherConfig,
}

impl MatcherConfigBuilder {
    pub fn case_rules(mut self, rules: CaseRules) -> Self {
        self.config.case_rules = rules;
        self
    }

    pub fn left_column_fraction(mut self, fraction: f64) -> Self {
        self.config.region.left_column_fraction = fraction;
        self
    }

    /// Shorthand for `left_column_fraction(1.0)`.
    pub fn single_column(self) -> Self {
        self.left_column_fraction(1.0)
    }

    pub fn prefixes(mut self, prefixes: PrefixConfig) -> Self {
        self.config.prefixes = prefixes;
        self
    }

    pub fn tolerances(mut self, tolerances: ToleranceConfig) -> Self {
        self.config.tolerances = tolerances;
        self
    }

    pub fn weights(mut self, weights: ScoreWeights) -> Self {
        self.config.weights = weights;
        self
    }

    pub fn conjunctions<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.conjunctions = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn min_score(mut self, min_score: i32) -> Self {
        self.config.min_score = min_score;
        self
    }

    pub fn build(self) -> Result<MatcherConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
