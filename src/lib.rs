pub mod assignment;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geo;
pub mod layout;
pub mod logging;
pub mod matcher;
pub mod page;
pub mod text;
pub mod token;

pub use crate::catalog::{CatalogEntry, ParsedName, RawCatalogEntry};
pub use crate::config::MatcherConfig;
pub use crate::error::{ConfigError, LocalizeError, ValidationError};
pub use crate::geo::{NormBox, PageSize};
pub use crate::page::{
    localize_pages, LocalizationResult, PageBundle, PageInput, PageRecord, PageResult,
};
pub use crate::token::{RawToken, Token, TokenId, TokenIndex};

use crate::assignment::AssignmentTracker;
use crate::layout::RegionFilter;
use crate::logging::MENU_ASSIGN;
use crate::matcher::Matcher;
use tracing::debug;

/// Locate every catalog entry's name among one page's OCR tokens.
///
/// # Arguments
/// * `tokens` - Positioned tokens from the OCR collaborator
/// * `catalog` - Product names in catalog order; earlier entries get first pick of ambiguous tokens
/// * `true_size` - Decoded image size; falls back to the token extent when `None`
/// * `config` - Matcher tuning
///
/// # Returns
/// One result per catalog entry, in order. Only malformed input or an invalid
/// `config` is an error; an entry that cannot be found comes back with
/// `bbox: None`.
pub fn localize(
    tokens: &[RawToken],
    catalog: &[CatalogEntry],
    true_size: Option<PageSize>,
    config: &MatcherConfig,
) -> Result<PageResult, LocalizeError> {
    // 1. Reject bad settings and malformed catalog entries before doing any work
    config.validate()?;
    for (index, entry) in catalog.iter().enumerate() {
        entry.validate(index)?;
    }

    // 2. Validate and index the tokens
    let index = TokenIndex::build(tokens, true_size, config.case_rules)?;

    // 3. Restrict to the configured column
    let region = RegionFilter::from_config(&config.region).apply(&index);

    // 4. Match entries in catalog order, consuming tokens as we go
    let matcher = Matcher::new(&index, &region, config);
    let mut tracker = AssignmentTracker::new(index.len());
    let mut items = Vec::with_capacity(catalog.len());

    for (position, entry) in catalog.iter().enumerate() {
        let name = ParsedName::parse(&entry.name, config.case_rules);

        let result = match matcher.best_match(&name, &tracker) {
            Ok(candidate) => {
                // candidates are built from available tokens only
                let committed = tracker.commit(position, &candidate.tokens);
                debug_assert!(committed, "matched tokens were already assigned");

                let rect = geo::merge(
                    index.token(candidate.start()).rect(),
                    candidate.tokens[1..].iter().map(|id| index.token(*id).rect()),
                );
                let bbox = geo::normalize(&rect, index.page_size());
                LocalizationResult::assigned(entry, bbox, candidate)
            }
            Err(reason) => {
                debug!(target: MENU_ASSIGN, entry = %entry.name, ?reason, "No location found");
                LocalizationResult::miss(entry, reason)
            }
        };
        items.push(result);
    }

    // 5. Page-level summary
    let page = PageResult::new(items);
    debug!(
        target: MENU_ASSIGN,
        entries = page.len(),
        misses = page.misses(),
        consumed = tracker.consumed_count(),
        "Localized page"
    );
    Ok(page)
}
