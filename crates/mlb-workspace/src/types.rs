//! Core domain types
//!
//! Defines the entities of an in-progress analysis:
//! - identifiers for assignments and actions
//! - risk categories and the twelve lifecycle stages
//! - risk assignments, stage assignments and bias/mitigation pairs

use chrono::{DateTime, Utc};
use mlb_catalog::CardId;
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Unique assignment identifier (ULID for sortability)
///
/// Used as the undo handle for risk and stage assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(pub Ulid);

impl AssignmentId {
    /// Generate new assignment ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for AssignmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic source of assignment ids
///
/// Plain `Ulid::new()` values minted within one millisecond order by their
/// random bits. This source never hands out an id at or below the last one,
/// so id order is creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentIdGenerator {
    previous: Ulid,
}

impl AssignmentIdGenerator {
    /// Create a generator with no history
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id, strictly greater than every id handed out or observed
    pub fn next_id(&mut self) -> AssignmentId {
        let fresh = Ulid::new();
        let id = if fresh > self.previous {
            fresh
        } else {
            self.previous.increment().unwrap_or_else(|| {
                Ulid::from_parts(self.previous.timestamp_ms().saturating_add(1), 0)
            })
        };
        self.previous = id;
        AssignmentId(id)
    }

    /// Account for an id minted elsewhere, e.g. loaded from a snapshot
    pub fn observe(&mut self, id: AssignmentId) {
        if id.0 > self.previous {
            self.previous = id.0;
        }
    }
}

/// Unique action identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub Ulid);

impl ActionId {
    /// Generate new action ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Risk level a user assigns to a bias
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskCategory {
    HighRisk,
    MediumRisk,
    LowRisk,
    NeedsDiscussion,
}

impl RiskCategory {
    /// All categories in display order
    pub const ALL: [Self; 4] = [
        Self::HighRisk,
        Self::MediumRisk,
        Self::LowRisk,
        Self::NeedsDiscussion,
    ];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighRisk => "high-risk",
            Self::MediumRisk => "medium-risk",
            Self::LowRisk => "low-risk",
            Self::NeedsDiscussion => "needs-discussion",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse grouping of lifecycle stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecyclePhase {
    ProjectDesign,
    ModelDevelopment,
    SystemDeployment,
}

impl LifecyclePhase {
    /// Human-readable name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProjectDesign => "project design",
            Self::ModelDevelopment => "model development",
            Self::SystemDeployment => "system deployment",
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the twelve phases of an ML project
///
/// Variants are declared in project order, so `Ord` follows the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleStage {
    ProjectPlanning,
    ProblemFormulation,
    DataExtractionProcurement,
    DataAnalysis,
    PreprocessingFeatureEngineering,
    ModelSelectionTraining,
    ModelTestingValidation,
    ModelReporting,
    SystemImplementation,
    UserTraining,
    SystemUseMonitoring,
    ModelUpdatingDeprovisioning,
}

impl LifecycleStage {
    /// All stages in project order
    pub const ALL: [Self; 12] = [
        Self::ProjectPlanning,
        Self::ProblemFormulation,
        Self::DataExtractionProcurement,
        Self::DataAnalysis,
        Self::PreprocessingFeatureEngineering,
        Self::ModelSelectionTraining,
        Self::ModelTestingValidation,
        Self::ModelReporting,
        Self::SystemImplementation,
        Self::UserTraining,
        Self::SystemUseMonitoring,
        Self::ModelUpdatingDeprovisioning,
    ];

    /// Phase this stage belongs to
    #[must_use]
    pub const fn phase(self) -> LifecyclePhase {
        match self {
            Self::ProjectPlanning
            | Self::ProblemFormulation
            | Self::DataExtractionProcurement
            | Self::DataAnalysis => LifecyclePhase::ProjectDesign,
            Self::PreprocessingFeatureEngineering
            | Self::ModelSelectionTraining
            | Self::ModelTestingValidation
            | Self::ModelReporting => LifecyclePhase::ModelDevelopment,
            Self::SystemImplementation
            | Self::UserTraining
            | Self::SystemUseMonitoring
            | Self::ModelUpdatingDeprovisioning => LifecyclePhase::SystemDeployment,
        }
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectPlanning => "project-planning",
            Self::ProblemFormulation => "problem-formulation",
            Self::DataExtractionProcurement => "data-extraction-procurement",
            Self::DataAnalysis => "data-analysis",
            Self::PreprocessingFeatureEngineering => "preprocessing-feature-engineering",
            Self::ModelSelectionTraining => "model-selection-training",
            Self::ModelTestingValidation => "model-testing-validation",
            Self::ModelReporting => "model-reporting",
            Self::SystemImplementation => "system-implementation",
            Self::UserTraining => "user-training",
            Self::SystemUseMonitoring => "system-use-monitoring",
            Self::ModelUpdatingDeprovisioning => "model-updating-deprovisioning",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProjectPlanning => "Project Planning",
            Self::ProblemFormulation => "Problem Formulation",
            Self::DataExtractionProcurement => "Data Extraction or Procurement",
            Self::DataAnalysis => "Data Analysis",
            Self::PreprocessingFeatureEngineering => "Preprocessing & Feature Engineering",
            Self::ModelSelectionTraining => "Model Selection & Training",
            Self::ModelTestingValidation => "Model Testing & Validation",
            Self::ModelReporting => "Model Reporting",
            Self::SystemImplementation => "System Implementation",
            Self::UserTraining => "User Training",
            Self::SystemUseMonitoring => "System Use & Monitoring",
            Self::ModelUpdatingDeprovisioning => "Model Updating or Deprovisioning",
        }
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effectiveness rating outside 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("effectiveness rating must be within 1..=5, got {0}")]
pub struct RatingOutOfRange(pub u8);

/// Effectiveness of a mitigation against a bias, 1 (weak) to 5 (strong)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct EffectivenessRating(u8);

impl EffectivenessRating {
    /// Lowest rating
    pub const MIN: u8 = 1;
    /// Highest rating
    pub const MAX: u8 = 5;

    /// Create rating, rejecting values outside 1..=5
    ///
    /// # Errors
    /// Returns [`RatingOutOfRange`] for out-of-range input.
    pub fn new(value: u8) -> Result<Self, RatingOutOfRange> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingOutOfRange(value))
        }
    }

    /// Raw value
    #[inline]
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for EffectivenessRating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EffectivenessRating> for u8 {
    fn from(value: EffectivenessRating) -> Self {
        value.0
    }
}

/// Risk level given to one card
///
/// At most one live assignment exists per card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssignment {
    pub id: AssignmentId,
    pub card_id: CardId,
    pub risk_category: RiskCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl RiskAssignment {
    /// Create assignment stamped now
    #[must_use]
    pub fn new(card_id: CardId, risk_category: RiskCategory) -> Self {
        Self {
            id: AssignmentId::new(),
            card_id,
            risk_category,
            annotation: None,
            timestamp: Utc::now(),
        }
    }

    /// With explicit id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: AssignmentId) -> Self {
        self.id = id;
        self
    }

    /// With annotation
    #[inline]
    #[must_use]
    pub fn with_annotation(mut self, annotation: Option<String>) -> Self {
        self.annotation = annotation;
        self
    }
}

/// Placement of a card in a lifecycle stage
///
/// A card may hold one assignment per stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageAssignment {
    pub id: AssignmentId,
    pub card_id: CardId,
    pub stage: LifecycleStage,
    /// Rationale for the placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl StageAssignment {
    /// Create assignment stamped now
    #[must_use]
    pub fn new(card_id: CardId, stage: LifecycleStage) -> Self {
        Self {
            id: AssignmentId::new(),
            card_id,
            stage,
            annotation: None,
            timestamp: Utc::now(),
        }
    }

    /// With explicit id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: AssignmentId) -> Self {
        self.id = id;
        self
    }

    /// With rationale
    #[inline]
    #[must_use]
    pub fn with_annotation(mut self, annotation: Option<String>) -> Self {
        self.annotation = annotation;
        self
    }

    /// Check for a non-blank rationale
    #[inline]
    #[must_use]
    pub fn has_rationale(&self) -> bool {
        has_text(self.annotation.as_deref())
    }
}

/// Composite key of a [`CardPair`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub bias_id: CardId,
    pub mitigation_id: CardId,
}

impl PairKey {
    /// Create key
    #[inline]
    #[must_use]
    pub fn new(bias_id: impl Into<CardId>, mitigation_id: impl Into<CardId>) -> Self {
        Self {
            bias_id: bias_id.into(),
            mitigation_id: mitigation_id.into(),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.bias_id, self.mitigation_id)
    }
}

/// Association between a bias and a mitigation technique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPair {
    pub bias_id: CardId,
    pub mitigation_id: CardId,
    /// Implementation note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effectiveness_rating: Option<EffectivenessRating>,
    pub timestamp: DateTime<Utc>,
}

impl CardPair {
    /// Create unrated pair stamped now
    #[must_use]
    pub fn new(bias_id: CardId, mitigation_id: CardId) -> Self {
        Self {
            bias_id,
            mitigation_id,
            annotation: None,
            effectiveness_rating: None,
            timestamp: Utc::now(),
        }
    }

    /// Composite key
    #[must_use]
    pub fn key(&self) -> PairKey {
        PairKey::new(self.bias_id.clone(), self.mitigation_id.clone())
    }

    /// Check whether the pair carries a rating or a non-blank note
    #[inline]
    #[must_use]
    pub fn is_documented(&self) -> bool {
        self.effectiveness_rating.is_some() || has_text(self.annotation.as_deref())
    }
}

/// Requested change to a pair's mutable fields
///
/// `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairUpdate {
    pub annotation: Option<Option<String>>,
    pub effectiveness_rating: Option<Option<EffectivenessRating>>,
}

impl PairUpdate {
    /// Set or clear the note
    #[inline]
    #[must_use]
    pub fn annotation(mut self, annotation: Option<String>) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Set or clear the rating
    #[inline]
    #[must_use]
    pub fn rating(mut self, rating: Option<EffectivenessRating>) -> Self {
        self.effectiveness_rating = Some(rating);
        self
    }
}

pub(crate) fn has_text(text: Option<&str>) -> bool {
    text.is_some_and(|t| !t.trim().is_empty())
}
