//! MLB Card Catalog
//!
//! Immutable, validated list of bias and mitigation cards.
//!
//! # Core Concepts
//!
//! - [`Card`]: a bias or mitigation technique with a category-derived display number
//! - [`CardId`]: globally unique string identifier
//! - [`CardCatalog`]: read-only lookup interface consumed by the workspace and gate engines
//! - [`StaticCatalog`]: validated in-memory catalog loaded once from JSON
//!
//! # Example
//!
//! ```rust,ignore
//! use mlb_catalog::{CardCatalog, StaticCatalog};
//!
//! let catalog = StaticCatalog::from_path("cards.json")?;
//! let card = catalog.card_by_id("confirmation-bias").unwrap();
//! println!("#{} {}", card.display_number(), card.caption);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod card;
mod catalog;
mod error;

pub use card::{Card, CardCategory, CardId, CardKind};
pub use catalog::{CardCatalog, CatalogDocument, StaticCatalog};
pub use error::CatalogError;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
