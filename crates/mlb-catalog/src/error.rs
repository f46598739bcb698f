//! Error types for catalog loading
//!
//! Loading is the only fallible catalog operation: once a [`StaticCatalog`]
//! exists it is valid and read-only.
//!
//! [`StaticCatalog`]: crate::StaticCatalog

use crate::card::{CardCategory, CardId};
use std::path::PathBuf;

/// Errors raised while loading or validating a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid catalog JSON
    #[error("malformed catalog json: {0}")]
    Json(#[from] serde_json::Error),

    /// Card with blank identifier
    #[error("card #{index} has an empty id")]
    EmptyId { index: usize },

    /// Card with blank caption
    #[error("card '{id}' has an empty caption")]
    EmptyCaption { id: CardId },

    /// Identifier used twice
    #[error("duplicate card id: '{0}'")]
    DuplicateId(CardId),

    /// Local number outside the category's numbering block
    #[error("card '{id}' number {number} outside 1..={max} for {category}")]
    NumberOutOfRange {
        id: CardId,
        category: CardCategory,
        number: u32,
        max: u32,
    },

    /// Two cards resolve to the same display number
    #[error("cards '{first}' and '{second}' share display number {number}")]
    DuplicateNumber {
        first: CardId,
        second: CardId,
        number: u32,
    },
}

impl CatalogError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
