//! Positioned OCR tokens and the per-page token index.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::geo::{PageSize, Rect};
use crate::logging::MENU_TOKENS;
use crate::text::CaseRules;

/// Typed handle for a token: its position in the OCR output.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl TokenId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A token as delivered by the OCR collaborator, before validation.
///
/// Geometry is either a `topLeft`/`bottomRight` pair or a polygon of
/// `vertices`; every field is optional so that malformed provider output
/// is rejected by [`TokenIndex::build`] rather than by the deserializer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawToken {
    pub text: Option<String>,
    #[serde(default, alias = "top_left", skip_serializing_if = "Option::is_none")]
    pub top_left: Option<(f64, f64)>,
    #[serde(default, alias = "bottom_right", skip_serializing_if = "Option::is_none")]
    pub bottom_right: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<(f64, f64)>>,
}

impl RawToken {
    pub fn new(text: impl Into<String>, top_left: (f64, f64), bottom_right: (f64, f64)) -> Self {
        Self {
            text: Some(text.into()),
            top_left: Some(top_left),
            bottom_right: Some(bottom_right),
            vertices: None,
        }
    }

    pub fn from_vertices(text: impl Into<String>, vertices: Vec<(f64, f64)>) -> Self {
        Self {
            text: Some(text.into()),
            top_left: None,
            bottom_right: None,
            vertices: Some(vertices),
        }
    }

    fn rect(&self, index: usize) -> Result<Rect, ValidationError> {
        let rect = match (self.top_left, self.bottom_right, self.vertices.as_deref()) {
            (Some((x0, y0)), Some((x1, y1)), _) => Rect::new(x0, y0, x1, y1),
            (_, _, Some(points)) => {
                Rect::bounding(points).ok_or(ValidationError::MissingGeometry { index })?
            }
            _ => return Err(ValidationError::MissingGeometry { index }),
        };

        if ![rect.x0, rect.y0, rect.x1, rect.y1]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(ValidationError::NonFiniteGeometry { index });
        }
        if rect.x1 < rect.x0 || rect.y1 < rect.y0 {
            return Err(ValidationError::InvertedBox {
                index,
                x0: rect.x0,
                y0: rect.y0,
                x1: rect.x1,
                y1: rect.y1,
            });
        }
        Ok(rect)
    }
}

/// A validated token. Geometry is never modified after indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: TokenId,
    pub text: String,
    /// Upper-cased, NFC-normalized text used for every comparison.
    pub key: String,
    pub top_left: (f64, f64),
    pub bottom_right: (f64, f64),
    pub is_emphasized: bool,
}

impl Token {
    #[inline]
    pub fn left(&self) -> f64 {
        self.top_left.0
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.top_left.1
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.bottom_right.0
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.bottom_right.1
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.left(), self.top(), self.right(), self.bottom())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} \"{}\" ({:.0},{:.0})-({:.0},{:.0}){}",
            self.id.0,
            self.text,
            self.left(),
            self.top(),
            self.right(),
            self.bottom(),
            if self.is_emphasized { " [caps]" } else { "" }
        )
    }
}

/// Where the page dimensions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSource {
    /// Supplied by the image decoder.
    Authoritative,
    /// Max extent of the tokens; underestimates the real page.
    TokenExtent,
}

/// Validated tokens of one page plus the page's effective size.
#[derive(Debug, Clone)]
pub struct TokenIndex {
    tokens: Vec<Token>,
    page_size: PageSize,
    size_source: SizeSource,
}

impl TokenIndex {
    /// Validates `raw` and derives the page size. An authoritative
    /// `true_size` always wins over the token extent.
    pub fn build(
        raw: &[RawToken],
        true_size: Option<PageSize>,
        rules: CaseRules,
    ) -> Result<Self, ValidationError> {
        if let Some(size) = true_size {
            if !size.is_usable() {
                return Err(ValidationError::InvalidPageSize {
                    width: size.width,
                    height: size.height,
                });
            }
        }

        let mut tokens = Vec::with_capacity(raw.len());
        for (index, raw_token) in raw.iter().enumerate() {
            let text = raw_token
                .text
                .as_deref()
                .ok_or(ValidationError::MissingText { index })?;
            let rect = raw_token.rect(index)?;

            tokens.push(Token {
                id: TokenId(index as u32),
                text: text.to_string(),
                key: rules.key(text),
                top_left: (rect.x0, rect.y0),
                bottom_right: (rect.x1, rect.y1),
                is_emphasized: rules.is_emphasized(text),
            });
        }

        let (page_size, size_source) = match true_size {
            Some(size) => (size, SizeSource::Authoritative),
            None => {
                let extent = tokens.iter().fold(PageSize::new(0.0, 0.0), |acc, t| {
                    PageSize::new(acc.width.max(t.right()), acc.height.max(t.bottom()))
                });
                if !tokens.is_empty() {
                    warn!(
                        target: MENU_TOKENS,
                        width = extent.width,
                        height = extent.height,
                        "No image size supplied; using token extent"
                    );
                }
                (extent, SizeSource::TokenExtent)
            }
        };

        debug!(
            target: MENU_TOKENS,
            tokens = tokens.len(),
            emphasized = tokens.iter().filter(|t| t.is_emphasized).count(),
            width = page_size.width,
            height = page_size.height,
            "Indexed page tokens"
        );

        Ok(Self {
            tokens,
            page_size,
            size_source,
        })
    }

    #[inline]
    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn size_source(&self) -> SizeSource {
        self.size_source
    }
}
