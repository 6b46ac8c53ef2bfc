#![allow(dead_code)]

use menu_anchor::{
    localize, CatalogEntry, MatcherConfig, PageResult, PageSize, RawToken, TokenId,
};

pub const GLYPH_WIDTH: f64 = 12.0;
pub const LINE_HEIGHT: f64 = 20.0;

/// Builds a page of tokens and a catalog for a `localize` call.
#[derive(Debug, Default)]
pub struct PageBuilder {
    tokens: Vec<RawToken>,
    catalog: Vec<CatalogEntry>,
    size: Option<PageSize>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authoritative page size.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(PageSize::new(width, height));
        self
    }

    /// Adds a token whose width follows its character count.
    pub fn add_word(&mut self, text: &str, x: f64, y: f64) -> TokenId {
        let width = text.chars().count() as f64 * GLYPH_WIDTH;
        self.add_token(text, x, y, width, LINE_HEIGHT)
    }

    pub fn add_token(&mut self, text: &str, x: f64, y: f64, width: f64, height: f64) -> TokenId {
        let id = TokenId(self.tokens.len() as u32);
        self.tokens
            .push(RawToken::new(text, (x, y), (x + width, y + height)));
        id
    }

    /// Adds words left to right on one line, one space apart.
    pub fn add_line(&mut self, words: &[&str], x: f64, y: f64) -> Vec<TokenId> {
        let mut cursor = x;
        words
            .iter()
            .map(|w| {
                let id = self.add_word(w, cursor, y);
                cursor += (w.chars().count() as f64 + 1.0) * GLYPH_WIDTH;
                id
            })
            .collect()
    }

    pub fn add_item(&mut self, name: &str, price: Option<f64>) {
        self.catalog.push(CatalogEntry::new(name, price));
    }

    pub fn tokens(&self) -> &[RawToken] {
        &self.tokens
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn localize(&self, config: &MatcherConfig) -> PageResult {
        localize(&self.tokens, &self.catalog, self.size, config).expect("valid page input")
    }
}

pub fn single_column() -> MatcherConfig {
    MatcherConfig::builder()
        .single_column()
        .build()
        .expect("valid config")
}
