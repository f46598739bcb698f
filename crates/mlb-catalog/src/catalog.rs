//! Card catalog lookups
//!
//! [`CardCatalog`] is the narrow read interface the workspace engine and the
//! gate engine depend on. [`StaticCatalog`] is the validated, in-memory
//! implementation loaded once from JSON.

use crate::card::{Card, CardId};
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Read-only card lookups
pub trait CardCatalog {
    /// Look up a card by id
    fn card_by_id(&self, id: &str) -> Option<&Card>;

    /// All bias cards in catalog order
    fn bias_cards(&self) -> Vec<&Card>;

    /// All mitigation cards in catalog order
    fn mitigation_cards(&self) -> Vec<&Card>;

    /// Check whether an id resolves
    #[inline]
    fn contains(&self, id: &str) -> bool {
        self.card_by_id(id).is_some()
    }

    /// Caption for display, falling back to the raw id
    fn caption_or_id<'a>(&'a self, id: &'a str) -> &'a str {
        self.card_by_id(id).map_or(id, |card| card.caption.as_str())
    }
}

/// On-disk catalog document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Cards in catalog order
    pub cards: Vec<Card>,
}

/// Validated in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    cards: Vec<Card>,
    by_id: HashMap<CardId, usize>,
}

impl StaticCatalog {
    /// Build catalog from cards, validating ids and numbering
    ///
    /// # Errors
    /// Returns the first violation found: blank id or caption, duplicate id,
    /// local number outside the category block, or colliding display numbers.
    pub fn new(cards: Vec<Card>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(cards.len());
        let mut by_number: HashMap<u32, &CardId> = HashMap::with_capacity(cards.len());

        for (index, card) in cards.iter().enumerate() {
            if card.id.is_blank() {
                return Err(CatalogError::EmptyId { index });
            }
            if card.caption.trim().is_empty() {
                return Err(CatalogError::EmptyCaption {
                    id: card.id.clone(),
                });
            }
            let max = card.category.capacity();
            if card.number == 0 || card.number > max {
                return Err(CatalogError::NumberOutOfRange {
                    id: card.id.clone(),
                    category: card.category,
                    number: card.number,
                    max,
                });
            }
            if by_id.insert(card.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId(card.id.clone()));
            }
            let number = card.display_number();
            if let Some(first) = by_number.insert(number, &card.id) {
                return Err(CatalogError::DuplicateNumber {
                    first: first.clone(),
                    second: card.id.clone(),
                    number,
                });
            }
        }

        Ok(Self { cards, by_id })
    }

    /// Parse and validate a catalog document
    ///
    /// # Errors
    /// Returns [`CatalogError::Json`] for malformed input, or a validation error.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let catalog = Self::new(document.cards)?;
        tracing::info!(
            biases = catalog.bias_cards().len(),
            mitigations = catalog.mitigation_cards().len(),
            "loaded card catalog"
        );
        Ok(catalog)
    }

    /// Read, parse and validate a catalog file
    ///
    /// # Errors
    /// Returns [`CatalogError::Io`] if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json =
            std::fs::read_to_string(path).map_err(|e| CatalogError::io_error(path, e))?;
        Self::from_json_str(&json)
    }

    /// All cards in catalog order
    #[inline]
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of cards
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if catalog is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Serializable form
    #[must_use]
    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            cards: self.cards.clone(),
        }
    }
}

impl CardCatalog for StaticCatalog {
    fn card_by_id(&self, id: &str) -> Option<&Card> {
        self.by_id.get(id).map(|&index| &self.cards[index])
    }

    fn bias_cards(&self) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.is_bias()).collect()
    }

    fn mitigation_cards(&self) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.is_mitigation()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardCategory;

    fn sample() -> Vec<Card> {
        vec![
            Card::new("confirmation-bias", CardCategory::CognitiveBias, 1, "Confirmation Bias"),
            Card::new("label-bias", CardCategory::StatisticalBias, 1, "Label Bias"),
            Card::new("peer-review", CardCategory::MitigationTechnique, 1, "Peer Review"),
        ]
    }

    #[test]
    fn lookups() {
        let catalog = StaticCatalog::new(sample()).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.bias_cards().len(), 2);
        assert_eq!(catalog.mitigation_cards().len(), 1);
        assert_eq!(
            catalog.card_by_id("label-bias").map(Card::display_number),
            Some(201)
        );
        assert!(catalog.card_by_id("missing").is_none());
        assert_eq!(catalog.caption_or_id("peer-review"), "Peer Review");
        assert_eq!(catalog.caption_or_id("missing"), "missing");
    }

    #[test]
    fn rejects_duplicate_id() {
        let mut cards = sample();
        cards.push(Card::new("label-bias", CardCategory::SocialBias, 2, "Again"));

        let result = StaticCatalog::new(cards);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id.as_str() == "label-bias"));
    }

    #[test]
    fn rejects_number_collision() {
        let mut cards = sample();
        cards.push(Card::new("anchoring", CardCategory::CognitiveBias, 1, "Anchoring"));

        let result = StaticCatalog::new(cards);
        assert!(matches!(result, Err(CatalogError::DuplicateNumber { number: 1, .. })));
    }

    #[test]
    fn rejects_number_outside_block() {
        let cards = vec![Card::new("x", CardCategory::SocialBias, 100, "X")];
        assert!(matches!(
            StaticCatalog::new(cards),
            Err(CatalogError::NumberOutOfRange { max: 99, .. })
        ));

        let cards = vec![Card::new("y", CardCategory::SocialBias, 0, "Y")];
        assert!(StaticCatalog::new(cards).is_err());
    }

    #[test]
    fn rejects_blank_fields() {
        let cards = vec![Card::new(" ", CardCategory::SocialBias, 1, "X")];
        assert!(matches!(
            StaticCatalog::new(cards),
            Err(CatalogError::EmptyId { index: 0 })
        ));

        let cards = vec![Card::new("x", CardCategory::SocialBias, 1, "")];
        assert!(matches!(
            StaticCatalog::new(cards),
            Err(CatalogError::EmptyCaption { .. })
        ));
    }
}
