//! Card identity and content
//!
//! Provides [`CardId`], [`CardCategory`] and [`Card`].

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Globally unique card identifier
///
/// Identifiers are opaque strings (`"confirmation-bias"`, `"peer-review"`).
/// Ordering is lexicographic so collections keyed by card stay deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Create identifier from any string-like value
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as `&str`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check for an empty or whitespace-only identifier
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for CardId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CardId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether a card describes a bias or a countermeasure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    /// Cognitive, social or statistical bias
    Bias,
    /// Mitigation technique
    Mitigation,
}

/// Card category
///
/// Each category owns a numeric block: a card's display number is the
/// category offset plus its number within the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardCategory {
    /// Biases in individual judgement
    CognitiveBias,
    /// Biases arising from social structures
    SocialBias,
    /// Biases in data and statistical procedure
    StatisticalBias,
    /// Countermeasures
    MitigationTechnique,
}

impl CardCategory {
    /// All categories in catalog order
    pub const ALL: [Self; 4] = [
        Self::CognitiveBias,
        Self::SocialBias,
        Self::StatisticalBias,
        Self::MitigationTechnique,
    ];

    /// First display number of the category block
    #[inline]
    #[must_use]
    pub const fn id_offset(self) -> u32 {
        match self {
            Self::CognitiveBias => 0,
            Self::SocialBias => 100,
            Self::StatisticalBias => 200,
            Self::MitigationTechnique => 1000,
        }
    }

    /// Largest local number that still fits inside the block
    #[inline]
    #[must_use]
    pub const fn capacity(self) -> u32 {
        match self {
            Self::CognitiveBias | Self::SocialBias | Self::StatisticalBias => 99,
            Self::MitigationTechnique => 999,
        }
    }

    /// Bias or mitigation
    #[inline]
    #[must_use]
    pub const fn kind(self) -> CardKind {
        match self {
            Self::MitigationTechnique => CardKind::Mitigation,
            _ => CardKind::Bias,
        }
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CognitiveBias => "cognitive-bias",
            Self::SocialBias => "social-bias",
            Self::StatisticalBias => "statistical-bias",
            Self::MitigationTechnique => "mitigation-technique",
        }
    }
}

impl fmt::Display for CardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single catalog card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier
    pub id: CardId,
    /// Category (determines bias/mitigation and numbering block)
    pub category: CardCategory,
    /// Number within the category, starting at 1
    pub number: u32,
    /// Short title shown on the card
    pub caption: String,
    /// Longer explanation
    #[serde(default)]
    pub description: String,
    /// Worked example, if the card has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl Card {
    /// Create card without description or example
    #[must_use]
    pub fn new(
        id: impl Into<CardId>,
        category: CardCategory,
        number: u32,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            number,
            caption: caption.into(),
            description: String::new(),
            example: None,
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With worked example
    #[inline]
    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Catalog-wide display number (category offset + local number)
    #[inline]
    #[must_use]
    pub fn display_number(&self) -> u32 {
        self.category.id_offset() + self.number
    }

    /// Bias or mitigation
    #[inline]
    #[must_use]
    pub fn kind(&self) -> CardKind {
        self.category.kind()
    }

    /// Check if card is a bias
    #[inline]
    #[must_use]
    pub fn is_bias(&self) -> bool {
        self.kind() == CardKind::Bias
    }

    /// Check if card is a mitigation
    #[inline]
    #[must_use]
    pub fn is_mitigation(&self) -> bool {
        self.kind() == CardKind::Mitigation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_number_uses_category_offset() {
        let social = Card::new("in-group", CardCategory::SocialBias, 4, "In-group Bias");
        let mitigation = Card::new("peer-review", CardCategory::MitigationTechnique, 12, "Peer Review");

        assert_eq!(social.display_number(), 104);
        assert_eq!(mitigation.display_number(), 1012);
    }

    #[test]
    fn category_kind() {
        assert_eq!(CardCategory::StatisticalBias.kind(), CardKind::Bias);
        assert_eq!(CardCategory::MitigationTechnique.kind(), CardKind::Mitigation);
    }

    #[test]
    fn category_wire_names() {
        for category in CardCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn card_id_is_transparent() {
        let id = CardId::from("optimism-bias");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"optimism-bias\"");
        assert!(!id.is_blank());
        assert!(CardId::new("  ").is_blank());
    }
}
