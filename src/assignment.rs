use tracing::{trace, warn};

use crate::logging::MENU_ASSIGN;
use crate::token::TokenId;

/// Page-scoped record of which catalog entry owns which token.
///
/// Catalog entries are committed in catalog order, so an earlier entry keeps
/// any token a later, similarly named entry would also have wanted. A
/// tracker lives for one `localize` call and is dropped with it.
#[derive(Debug, Clone)]
pub struct AssignmentTracker {
    // entry position per token, indexed by TokenId
    owners: Vec<Option<usize>>,
    consumed: usize,
}

impl AssignmentTracker {
    pub fn new(token_count: usize) -> Self {
        Self {
            owners: vec![None; token_count],
            consumed: 0,
        }
    }

    #[inline]
    pub fn is_consumed(&self, id: TokenId) -> bool {
        matches!(self.owners.get(id.index()), Some(Some(_)))
    }

    #[inline]
    pub fn is_available(&self, id: TokenId) -> bool {
        !self.is_consumed(id)
    }

    /// Catalog position of the entry that consumed `id`.
    pub fn owner_of(&self, id: TokenId) -> Option<usize> {
        self.owners.get(id.index()).copied().flatten()
    }

    /// Marks every token in `tokens` as owned by the entry at `entry`.
    ///
    /// All-or-nothing: returns `false` and changes nothing if any token is
    /// unknown or already consumed.
    pub fn commit(&mut self, entry: usize, tokens: &[TokenId]) -> bool {
        if let Some(&clash) = tokens
            .iter()
            .find(|id| id.index() >= self.owners.len() || self.is_consumed(**id))
        {
            warn!(
                target: MENU_ASSIGN,
                entry,
                token = clash.0,
                owner = ?self.owner_of(clash),
                "Refusing to commit a token that is unknown or already assigned"
            );
            return false;
        }

        for id in tokens {
            self.owners[id.index()] = Some(entry);
        }
        self.consumed += tokens.len();
        trace!(target: MENU_ASSIGN, entry, tokens = ?tokens, "Committed tokens");
        true
    }

    pub fn consumed_count(&self) -> usize {
        self.consumed
    }
}
