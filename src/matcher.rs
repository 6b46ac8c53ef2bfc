//! Candidate discovery, multi-word stitching and scoring.
//!
//! For one catalog name the matcher proposes starting tokens for the first
//! word, grows each start into a match by looking for the following words on
//! the same line, scores every grown match and keeps the best one. Nothing
//! here mutates page state; committing the winner is the caller's job.

use serde::Serialize;
use smallvec::{smallvec, SmallVec};
use std::fmt;
use tracing::{debug, trace};

use crate::assignment::AssignmentTracker;
use crate::catalog::ParsedName;
use crate::config::MatcherConfig;
use crate::layout::{in_same_band, reads_after};
use crate::logging::MENU_MATCH;
use crate::text::{char_len, char_prefix, shares_prefix};
use crate::token::{Token, TokenId, TokenIndex};

/// Which candidate pass produced the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidatePass {
    Exact,
    /// Key starts with the first `n` characters of the word.
    Prefix(usize),
}

impl CandidatePass {
    fn accepts(self, key: &str, word: &str) -> bool {
        match self {
            CandidatePass::Exact => key == word,
            CandidatePass::Prefix(n) => shares_prefix(key, word, n),
        }
    }
}

impl fmt::Display for CandidatePass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidatePass::Exact => write!(f, "exact"),
            CandidatePass::Prefix(n) => write!(f, "prefix-{n}"),
        }
    }
}

/// Why an entry ended without a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    /// Nothing left of the name once the parenthetical was stripped.
    EmptyName,
    /// No unconsumed token matched the first word in any pass.
    NoCandidates,
    /// The best candidate scored under `min_score`.
    BelowMinScore,
}

/// A provisional grouping of tokens hypothesized to spell one name.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    /// First-word token followed by every conjunction/continuation token found.
    pub tokens: SmallVec<[TokenId; 4]>,
    pub score: i32,
    /// The parenthetical alias bonus applied. The alias token itself is never
    /// part of `tokens`.
    pub alias_matched: bool,
}

impl MatchCandidate {
    pub fn start(&self) -> TokenId {
        self.tokens[0]
    }
}

/// Matches catalog names against the tokens of one region of one page.
pub struct Matcher<'a> {
    index: &'a TokenIndex,
    region: &'a [TokenId],
    config: &'a MatcherConfig,
    conjunctions: Vec<String>,
}

impl<'a> Matcher<'a> {
    pub fn new(index: &'a TokenIndex, region: &'a [TokenId], config: &'a MatcherConfig) -> Self {
        let conjunctions = config
            .conjunctions
            .iter()
            .map(|c| config.case_rules.key(c))
            .collect();
        Self {
            index,
            region,
            config,
            conjunctions,
        }
    }

    fn region_tokens(&self) -> impl Iterator<Item = &'a Token> + '_ {
        let index = self.index;
        self.region.iter().map(move |id| index.token(*id))
    }

    /// Region tokens no earlier entry has consumed, in discovery order.
    fn available<'s>(
        &'s self,
        tracker: &'s AssignmentTracker,
    ) -> impl Iterator<Item = &'a Token> + 's {
        self.region_tokens()
            .filter(move |t| tracker.is_available(t.id))
    }

    fn is_conjunction(&self, key: &str) -> bool {
        self.conjunctions.iter().any(|c| c == key)
    }

    /// Starting-token pool for `first_word`, from the first pass that
    /// yields anything: exact, then long or medium prefix depending on the
    /// word's length, then the short prefix fallback.
    pub fn find_candidates(
        &self,
        first_word: &str,
        tracker: &AssignmentTracker,
    ) -> Option<(CandidatePass, Vec<TokenId>)> {
        let prefixes = &self.config.prefixes;
        let len = char_len(first_word);

        let mut passes: SmallVec<[CandidatePass; 3]> = smallvec![CandidatePass::Exact];
        if len >= prefixes.long {
            passes.push(CandidatePass::Prefix(prefixes.long));
        } else if len >= prefixes.medium {
            passes.push(CandidatePass::Prefix(prefixes.medium));
        }
        if len >= prefixes.short {
            passes.push(CandidatePass::Prefix(prefixes.short));
        }

        for pass in passes {
            let pool: Vec<TokenId> = self
                .available(tracker)
                .filter(|t| pass.accepts(&t.key, first_word))
                .map(|t| t.id)
                .collect();
            if !pool.is_empty() {
                trace!(
                    target: MENU_MATCH,
                    word = first_word,
                    %pass,
                    candidates = pool.len(),
                    "Candidate pool found"
                );
                return Some((pass, pool));
            }
        }
        None
    }

    /// Grows a match from `start` across the rest of the name and scores it.
    ///
    /// Following words are searched for in the same horizontal band as the
    /// start token; a word that cannot be found is skipped.
    pub fn stitch(
        &self,
        start: TokenId,
        name: &ParsedName,
        tracker: &AssignmentTracker,
    ) -> MatchCandidate {
        let anchor = self.index.token(start);
        let weights = &self.config.weights;
        let tolerances = &self.config.tolerances;
        let continuation_prefix = self.config.prefixes.continuation;

        let mut tokens: SmallVec<[TokenId; 4]> = smallvec![start];
        let mut score = if anchor.is_emphasized {
            weights.emphasized_start
        } else {
            0
        };

        for word in name.following_words() {
            if self.is_conjunction(word) {
                let found = self.available(tracker).find(|t| {
                    !tokens.contains(&t.id)
                        && self.is_conjunction(&t.key)
                        && in_same_band(anchor, t, tolerances.conjunction_band)
                });
                if let Some(t) = found {
                    tokens.push(t.id);
                    score += weights.conjunction;
                }
                continue;
            }

            let found = self.available(tracker).find(|t| {
                !tokens.contains(&t.id)
                    && (t.key == *word || shares_prefix(&t.key, word, continuation_prefix))
                    && in_same_band(anchor, t, tolerances.continuation_band)
                    && reads_after(anchor, t, tolerances.max_backtrack)
            });
            if let Some(t) = found {
                tokens.push(t.id);
                score += weights.continuation;
                if t.is_emphasized {
                    score += weights.emphasized_continuation;
                }
            }
        }

        let mut alias_matched = false;
        if let Some(alias) = name.parenthetical.as_deref() {
            let alias_prefix = char_prefix(alias, self.config.prefixes.alias);
            alias_matched = self.region_tokens().any(|t| {
                !tokens.contains(&t.id)
                    && in_same_band(anchor, t, tolerances.alias_band)
                    && (t.text.contains('(') || t.key.starts_with(alias_prefix))
            });
            if alias_matched {
                score += weights.parenthetical;
            }
        }

        MatchCandidate {
            tokens,
            score,
            alias_matched,
        }
    }

    /// Best-scoring match for `name` among the currently available tokens.
    ///
    /// Equal scores keep the candidate seen first, so the result only
    /// depends on token order.
    pub fn best_match(
        &self,
        name: &ParsedName,
        tracker: &AssignmentTracker,
    ) -> Result<MatchCandidate, MissReason> {
        let first_word = name.first_word().ok_or(MissReason::EmptyName)?;
        let (pass, pool) = self
            .find_candidates(first_word, tracker)
            .ok_or(MissReason::NoCandidates)?;

        let mut best: Option<MatchCandidate> = None;
        for start in pool {
            let candidate = self.stitch(start, name, tracker);
            trace!(
                target: MENU_MATCH,
                start = %self.index.token(start),
                score = candidate.score,
                tokens = candidate.tokens.len(),
                "Scored candidate"
            );
            if best.as_ref().map_or(true, |b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }

        // A non-empty pool always yields a candidate.
        let best = best.ok_or(MissReason::NoCandidates)?;
        if best.score < self.config.min_score {
            debug!(
                target: MENU_MATCH,
                word = first_word,
                score = best.score,
                min_score = self.config.min_score,
                "Best candidate under minimum score"
            );
            return Err(MissReason::BelowMinScore);
        }

        debug!(
            target: MENU_MATCH,
            word = first_word,
            %pass,
            score = best.score,
            start = %self.index.token(best.start()),
            "Selected match"
        );
        Ok(best)
    }
}
