use tracing::debug;

use crate::config::RegionConfig;
use crate::geo::PageSize;
use crate::logging::MENU_REGION;
use crate::token::{Token, TokenId, TokenIndex};

/// Restricts matching to one layout column.
///
/// Printed menus are often two-column; searching only the column the
/// catalog describes keeps look-alike words in the other column from
/// being picked up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionFilter {
    left_column_fraction: f64,
}

impl RegionFilter {
    pub fn new(left_column_fraction: f64) -> Self {
        Self {
            left_column_fraction,
        }
    }

    pub fn from_config(config: &RegionConfig) -> Self {
        Self::new(config.left_column_fraction)
    }

    /// x coordinate a token's left edge must stay below.
    pub fn boundary(&self, size: PageSize) -> f64 {
        size.width * self.left_column_fraction
    }

    /// Ids of the tokens inside the region, in index order.
    pub fn apply(&self, index: &TokenIndex) -> Vec<TokenId> {
        let boundary = self.boundary(index.page_size());
        let region: Vec<TokenId> = index
            .tokens()
            .iter()
            .filter(|t| t.left() < boundary)
            .map(|t| t.id)
            .collect();

        debug!(
            target: MENU_REGION,
            boundary,
            kept = region.len(),
            dropped = index.len() - region.len(),
            "Applied column filter"
        );

        region
    }
}

/// Top edges within `tolerance` of each other.
#[inline]
pub fn in_same_band(anchor: &Token, other: &Token, tolerance: f64) -> bool {
    (other.top() - anchor.top()).abs() <= tolerance
}

/// `other` starts no more than `slack` left of `anchor`.
#[inline]
pub fn reads_after(anchor: &Token, other: &Token, slack: f64) -> bool {
    other.left() >= anchor.left() - slack
}
