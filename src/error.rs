//! Error types for the localization engine.
//!
//! Only malformed input or configuration raises. A catalog entry that cannot
//! be located is a regular outcome and is reported through a `None` bounding
//! box instead.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed token, catalog or page-size input. Fatal to a single
/// `localize` call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("token #{index} has no text")]
    MissingText { index: usize },

    #[error("token #{index} has no geometry (expected topLeft/bottomRight or vertices)")]
    MissingGeometry { index: usize },

    #[error("token #{index} has non-finite coordinates")]
    NonFiniteGeometry { index: usize },

    #[error(
        "token #{index} has an inverted box: top-left ({x0}, {y0}) is past bottom-right ({x1}, {y1})"
    )]
    InvertedBox {
        index: usize,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    },

    #[error("catalog entry #{index} has no name")]
    MissingName { index: usize },

    #[error("catalog entry #{index} has a non-finite price")]
    InvalidPrice { index: usize },

    #[error("page size {width}x{height} is not usable")]
    InvalidPageSize { width: f64, height: f64 },

    #[error("page size needs both dimensions, got width {width:?} and height {height:?}")]
    PartialPageSize {
        width: Option<f64>,
        height: Option<f64>,
    },
}

/// Invalid or unreadable matcher configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
}

/// Anything that stops one page from being localized.
#[derive(Debug, Error)]
pub enum LocalizeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid matcher configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to read image size of {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
