//! Per-page results, the persisted page record, and the multi-page driver.

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::catalog::{validate_catalog, CatalogEntry, RawCatalogEntry};
use crate::config::MatcherConfig;
use crate::error::{LocalizeError, ValidationError};
use crate::geo::{NormBox, PageSize};
use crate::localize;
use crate::logging::{MENU_ASSIGN, MENU_TOKENS};
use crate::matcher::{MatchCandidate, MissReason};
use crate::token::{RawToken, TokenId};

/// Outcome for one catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizationResult {
    pub name: String,
    pub price: Option<f64>,
    /// `None` when the name could not be located.
    pub bbox: Option<NormBox>,
    /// Tokens that make up the match, empty on a miss.
    pub tokens: Vec<TokenId>,
    pub score: Option<i32>,
    pub miss_reason: Option<MissReason>,
}

impl LocalizationResult {
    pub(crate) fn assigned(entry: &CatalogEntry, bbox: NormBox, candidate: MatchCandidate) -> Self {
        Self {
            name: entry.name.clone(),
            price: entry.price,
            bbox: Some(bbox),
            tokens: candidate.tokens.into_vec(),
            score: Some(candidate.score),
            miss_reason: None,
        }
    }

    pub(crate) fn miss(entry: &CatalogEntry, reason: MissReason) -> Self {
        Self {
            name: entry.name.clone(),
            price: entry.price,
            bbox: None,
            tokens: Vec::new(),
            score: None,
            miss_reason: Some(reason),
        }
    }

    #[inline]
    pub fn is_miss(&self) -> bool {
        self.bbox.is_none()
    }
}

/// One result per catalog entry, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    items: Vec<LocalizationResult>,
}

impl PageResult {
    pub(crate) fn new(items: Vec<LocalizationResult>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[LocalizationResult] {
        &self.items
    }

    pub fn into_items(self) -> Vec<LocalizationResult> {
        self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LocalizationResult> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.items.iter().filter(|r| !r.is_miss()).count()
    }

    pub fn misses(&self) -> usize {
        self.items.len() - self.hits()
    }

    /// Share of entries located, 0.0 for an empty catalog.
    pub fn hit_rate(&self) -> f64 {
        if self.items.is_empty() {
            0.0
        } else {
            self.hits() as f64 / self.items.len() as f64
        }
    }

    pub fn into_record(self, image_url: impl Into<String>) -> PageRecord {
        PageRecord {
            image_url: image_url.into(),
            items: self.items.into_iter().map(ItemRecord::from).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PageResult {
    type Item = &'a LocalizationResult;
    type IntoIter = std::slice::Iter<'a, LocalizationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Stored shape of one item: what the overlay renderer and the database
/// writer consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    pub price: Option<f64>,
    pub bbox: Option<NormBox>,
}

impl From<LocalizationResult> for ItemRecord {
    fn from(result: LocalizationResult) -> Self {
        Self {
            name: result.name,
            price: result.price,
            bbox: result.bbox,
        }
    }
}

/// One JSON document per processed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub image_url: String,
    pub items: Vec<ItemRecord>,
}

/// Everything needed to localize one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInput {
    pub id: String,
    #[serde(default)]
    pub image_url: String,
    /// Local image used to read the true size when `width`/`height` are absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    pub tokens: Vec<RawToken>,
    pub catalog: Vec<RawCatalogEntry>,
}

impl PageInput {
    /// Authoritative size, when both dimensions were supplied.
    ///
    /// A single dimension is rejected rather than dropped, since the token
    /// extent must not stand in for a size the caller meant to give.
    pub fn true_size(&self) -> Result<Option<PageSize>, ValidationError> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Ok(Some(PageSize::new(width, height))),
            (None, None) => Ok(None),
            (width, height) => Err(ValidationError::PartialPageSize { width, height }),
        }
    }

    /// Fills in `width`/`height` from the image header for a page that only
    /// names a local image. Relative paths resolve against `base_dir`.
    /// Explicit dimensions always win and the image is not opened.
    pub fn resolve_true_size(&mut self, base_dir: &Path) -> Result<(), LocalizeError> {
        if self.true_size()?.is_some() {
            return Ok(());
        }
        let Some(image_path) = self.image_path.as_ref() else {
            warn!(
                target: MENU_TOKENS,
                page = %self.id,
                "No image size or image path; falling back to token extent"
            );
            return Ok(());
        };

        let path = if image_path.is_relative() {
            base_dir.join(image_path)
        } else {
            image_path.clone()
        };
        let (width, height) = image::image_dimensions(&path)
            .map_err(|source| LocalizeError::Image { path, source })?;
        debug!(target: MENU_TOKENS, page = %self.id, width, height, "Read image size");
        self.width = Some(f64::from(width));
        self.height = Some(f64::from(height));
        Ok(())
    }

    pub fn localize(&self, config: &MatcherConfig) -> Result<PageResult, LocalizeError> {
        let true_size = self.true_size()?;
        let catalog = validate_catalog(self.catalog.clone())?;
        localize(&self.tokens, &catalog, true_size, config)
    }
}

/// A batch of pages, as read by the command-line driver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageBundle {
    pub pages: Vec<PageInput>,
}

/// Localizes every page in parallel, one task per page.
///
/// Results are keyed by page id in input order. A page whose input fails
/// is rejected gets an `Err` without affecting the others. When an id repeats,
/// the later page's result replaces the earlier one.
pub fn localize_pages(
    pages: &[PageInput],
    config: &MatcherConfig,
) -> IndexMap<String, Result<PageRecord, LocalizeError>> {
    let results: Vec<(String, Result<PageRecord, LocalizeError>)> = pages
        .par_iter()
        .map(|page| {
            let record = page
                .localize(config)
                .map(|result| result.into_record(page.image_url.clone()));
            (page.id.clone(), record)
        })
        .collect();

    let mut by_id = IndexMap::with_capacity(results.len());
    for (id, record) in results {
        match &record {
            Ok(r) => {
                let misses = r.items.iter().filter(|i| i.bbox.is_none()).count();
                info!(
                    target: MENU_ASSIGN,
                    page = %id,
                    items = r.items.len(),
                    misses,
                    "Page localized"
                );
            }
            Err(e) => warn!(target: MENU_ASSIGN, page = %id, error = %e, "Page rejected"),
        }
        if by_id.insert(id.clone(), record).is_some() {
            warn!(target: MENU_ASSIGN, page = %id, "Duplicate page id; keeping the later page");
        }
    }
    by_id
}
