//! Invertible workspace actions
//!
//! Provides [`WorkspaceAction`], the command object recorded in history, and
//! [`ActionKind`], the closed set of mutations it can describe.
//!
//! Every action built through [`WorkspaceAction::new`] carries a fully formed
//! inverse. The inverse never carries one of its own: redo re-applies the
//! original forward action rather than the inverse of an inverse.

use crate::state::DomainState;
use crate::types::{
    ActionId, AssignmentId, CardPair, EffectivenessRating, LifecycleStage, PairKey,
    RiskAssignment, StageAssignment,
};
use chrono::{DateTime, Utc};
use mlb_catalog::CardId;
use serde::{Deserialize, Serialize};

/// Mutation described by an action
///
/// Dispatch over this enum is exhaustive; adding a variant is a compile
/// error until [`ActionKind::apply_to`] handles it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ActionKind {
    /// Insert or replace the card's risk assignment
    AssignRisk { assignment: RiskAssignment },

    /// Remove the card's risk assignment
    RemoveRisk { card_id: CardId },

    /// Insert a stage assignment under its own id
    AssignStage { assignment: StageAssignment },

    /// Remove one specific stage assignment
    RemoveStageAssignment { assignment_id: AssignmentId },

    /// Overwrite a stage assignment's rationale
    UpdateStageAssignment {
        assignment_id: AssignmentId,
        annotation: Option<String>,
    },

    /// Insert a pair (no-op if the key exists)
    CreatePair { pair: CardPair },

    /// Remove a pair
    RemovePair { key: PairKey },

    /// Overwrite a pair's note and rating
    UpdatePair {
        key: PairKey,
        annotation: Option<String>,
        effectiveness_rating: Option<EffectivenessRating>,
    },

    /// Set or clear a card's free-text note
    SetAnnotation { card_id: CardId, text: Option<String> },

    /// Mark a lifecycle stage complete or open
    SetLifecycleStageCompleted {
        stage: LifecycleStage,
        completed: bool,
    },
}

impl ActionKind {
    /// Wire name of the variant
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::AssignRisk { .. } => "assign-risk",
            Self::RemoveRisk { .. } => "remove-risk",
            Self::AssignStage { .. } => "assign-stage",
            Self::RemoveStageAssignment { .. } => "remove-stage-assignment",
            Self::UpdateStageAssignment { .. } => "update-stage-assignment",
            Self::CreatePair { .. } => "create-pair",
            Self::RemovePair { .. } => "remove-pair",
            Self::UpdatePair { .. } => "update-pair",
            Self::SetAnnotation { .. } => "set-annotation",
            Self::SetLifecycleStageCompleted { .. } => "set-lifecycle-stage-completed",
        }
    }

    /// Apply to state
    ///
    /// Returns `false` when the target no longer exists (or already exists,
    /// for pair creation) and nothing changed.
    pub(crate) fn apply_to(&self, state: &mut DomainState) -> bool {
        match self {
            Self::AssignRisk { assignment } => {
                state.put_risk(assignment.clone());
                true
            }
            Self::RemoveRisk { card_id } => state.take_risk(card_id.as_str()).is_some(),
            Self::AssignStage { assignment } => {
                state.put_stage_assignment(assignment.clone());
                true
            }
            Self::RemoveStageAssignment { assignment_id } => {
                state.take_stage_assignment(*assignment_id).is_some()
            }
            Self::UpdateStageAssignment {
                assignment_id,
                annotation,
            } => state.set_stage_annotation(*assignment_id, annotation.clone()),
            Self::CreatePair { pair } => state.put_pair(pair.clone()),
            Self::RemovePair { key } => state.take_pair(key).is_some(),
            Self::UpdatePair {
                key,
                annotation,
                effectiveness_rating,
            } => state.set_pair_fields(key, annotation.clone(), *effectiveness_rating),
            Self::SetAnnotation { card_id, text } => {
                state.set_annotation(card_id.clone(), text.clone());
                true
            }
            Self::SetLifecycleStageCompleted { stage, completed } => {
                state.set_stage_completed(*stage, *completed);
                true
            }
        }
    }
}

/// Command object recorded in undo history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkspaceAction {
    id: ActionId,
    kind: ActionKind,
    timestamp: DateTime<Utc>,
    description: String,
    inverse: Option<Box<WorkspaceAction>>,
}

impl WorkspaceAction {
    /// Create an action together with the mutation that undoes it
    ///
    /// `inverse` must be computed from the state *before* `kind` is applied.
    #[must_use]
    pub fn new(kind: ActionKind, inverse: ActionKind, description: impl Into<String>) -> Self {
        let description = description.into();
        let timestamp = Utc::now();
        let inverse = Self {
            id: ActionId::new(),
            kind: inverse,
            timestamp,
            description: format!("Undo: {description}"),
            inverse: None,
        };
        Self {
            id: ActionId::new(),
            kind,
            timestamp,
            description,
            inverse: Some(Box::new(inverse)),
        }
    }

    /// Action id
    #[inline]
    #[must_use]
    pub fn id(&self) -> ActionId {
        self.id
    }

    /// Mutation
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    /// Creation time
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Human-readable description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Action that undoes this one; `None` for an inverse
    #[inline]
    #[must_use]
    pub fn inverse(&self) -> Option<&WorkspaceAction> {
        self.inverse.as_deref()
    }

    /// Check if this action can be undone
    #[inline]
    #[must_use]
    pub fn is_reversible(&self) -> bool {
        self.inverse.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign() -> (WorkspaceAction, AssignmentId) {
        let assignment = StageAssignment::new("bias-1".into(), LifecycleStage::DataAnalysis);
        let id = assignment.id;
        let action = WorkspaceAction::new(
            ActionKind::AssignStage { assignment },
            ActionKind::RemoveStageAssignment { assignment_id: id },
            "Assign bias-1 to Data Analysis",
        );
        (action, id)
    }

    #[test]
    fn inverse_is_one_level_deep() {
        let (action, id) = assign();

        let inverse = action.inverse().unwrap();
        assert!(inverse.inverse().is_none());
        assert!(!inverse.is_reversible());
        assert_eq!(
            inverse.kind(),
            &ActionKind::RemoveStageAssignment { assignment_id: id }
        );
        assert_eq!(inverse.description(), "Undo: Assign bias-1 to Data Analysis");
        assert_ne!(inverse.id(), action.id());
    }

    #[test]
    fn apply_then_inverse_restores_state() {
        let (action, _) = assign();
        let mut state = DomainState::new();

        assert!(action.kind().apply_to(&mut state));
        assert_eq!(state.stage_assignment_count(), 1);

        assert!(action.inverse().unwrap().kind().apply_to(&mut state));
        assert_eq!(state, DomainState::new());
    }

    #[test]
    fn apply_reports_missing_targets() {
        let mut state = DomainState::new();
        let remove = ActionKind::RemoveStageAssignment {
            assignment_id: AssignmentId::new(),
        };
        assert!(!remove.apply_to(&mut state));

        let update = ActionKind::UpdatePair {
            key: PairKey::new("b", "m"),
            annotation: None,
            effectiveness_rating: None,
        };
        assert!(!update.apply_to(&mut state));
    }

    #[test]
    fn kind_serializes_with_type_tag() {
        let kind = ActionKind::RemoveRisk {
            card_id: "bias-1".into(),
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "remove-risk");
        assert_eq!(json["card_id"], "bias-1");
        assert_eq!(kind.type_name(), "remove-risk");
    }
}
