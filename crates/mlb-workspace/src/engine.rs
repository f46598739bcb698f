//! Workspace engine
//!
//! [`Workspace`] owns the domain state, the activity progress and the undo
//! log for one session. It is the single writer: every public mutator
//! captures the pre-mutation values, builds a forward action plus its exact
//! inverse, and only then applies it.
//!
//! User-facing conditions never surface as errors. Removing something that
//! is not there, creating a pair that exists, or updating a field to the
//! value it already holds are silent no-ops that leave history untouched.

use crate::action::{ActionKind, WorkspaceAction};
use crate::activity::{ActivityError, ActivityStage, ActivityStageState};
use crate::config::WorkspaceConfig;
use crate::history::History;
use crate::snapshot::SessionMetadata;
use crate::state::DomainState;
use crate::types::{
    AssignmentId, AssignmentIdGenerator, CardPair, LifecycleStage, PairKey, PairUpdate, RiskAssignment, RiskCategory,
    StageAssignment,
};
use chrono::Utc;
use mlb_catalog::CardId;

/// Engine instance for one workspace session
#[derive(Debug, Clone)]
pub struct Workspace {
    pub(crate) state: DomainState,
    pub(crate) activity: ActivityStageState,
    pub(crate) history: History,
    pub(crate) session: SessionMetadata,
    pub(crate) ids: AssignmentIdGenerator,
}

impl Workspace {
    /// Create an empty workspace
    #[must_use]
    pub fn new(config: WorkspaceConfig) -> Self {
        let session = SessionMetadata::new(config.activity_id.clone());
        tracing::debug!(
            session = %session.session_id,
            max_history = config.max_history_size,
            "created workspace"
        );
        Self {
            state: DomainState::new(),
            activity: ActivityStageState::new(),
            history: History::new(config.max_history_size),
            session,
            ids: AssignmentIdGenerator::new(),
        }
    }

    /// Read-only domain state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &DomainState {
        &self.state
    }

    /// Activity progress
    #[inline]
    #[must_use]
    pub fn activity(&self) -> &ActivityStageState {
        &self.activity
    }

    /// Undo/redo log
    #[inline]
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Session metadata
    #[inline]
    #[must_use]
    pub fn session(&self) -> &SessionMetadata {
        &self.session
    }

    // ------------------------------------------------------------------
    // Action engine
    // ------------------------------------------------------------------

    /// Apply an action, optionally recording it for undo
    ///
    /// Recording clears the redo stack and evicts the oldest entries beyond
    /// the history bound.
    ///
    /// `add_to_history` is not unconditional: an action whose `apply_to`
    /// reports no change is dropped without touching either stack, and an
    /// action without an inverse is applied but never recorded.
    ///
    /// Returns whether the state changed.
    pub fn apply(&mut self, action: WorkspaceAction, add_to_history: bool) -> bool {
        let changed = action.kind().apply_to(&mut self.state);
        if !changed {
            tracing::trace!(
                action = action.kind().type_name(),
                "action target missing, nothing applied"
            );
            return false;
        }

        tracing::debug!(
            action = action.kind().type_name(),
            id = %action.id(),
            description = action.description(),
            "applied action"
        );
        self.touch();

        if add_to_history {
            if !action.is_reversible() {
                tracing::warn!(
                    action = action.kind().type_name(),
                    "action has no inverse, not recorded in history"
                );
                return true;
            }
            let evicted = self.history.record(action);
            if evicted > 0 {
                tracing::debug!(evicted, "history bound reached, dropped oldest actions");
            }
        }
        true
    }

    /// Undo the most recent action
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(action) = self.history.pop_undo() else {
            return false;
        };
        if let Some(inverse) = action.inverse() {
            inverse.kind().apply_to(&mut self.state);
        }
        tracing::debug!(description = action.description(), "undo");
        self.history.push_redo(action);
        self.touch();
        true
    }

    /// Re-apply the most recently undone action
    ///
    /// Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(action) = self.history.pop_redo() else {
            return false;
        };
        action.kind().apply_to(&mut self.state);
        tracing::debug!(description = action.description(), "redo");
        self.history.push_undo(action);
        self.touch();
        true
    }

    /// Check if undo is possible
    #[inline]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is possible
    #[inline]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Label for the undo button
    #[must_use]
    pub fn undo_description(&self) -> Option<&str> {
        self.history.peek_undo().map(WorkspaceAction::description)
    }

    /// Label for the redo button
    #[must_use]
    pub fn redo_description(&self) -> Option<&str> {
        self.history.peek_redo().map(WorkspaceAction::description)
    }

    /// Forget all undo/redo entries
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ------------------------------------------------------------------
    // Risk assignments
    // ------------------------------------------------------------------

    /// Give a card a risk category, replacing any previous one
    ///
    /// Returns the id of the live assignment. Re-assigning an identical
    /// category and note is a no-op that returns the existing id.
    pub fn assign_bias_risk(
        &mut self,
        card_id: impl Into<CardId>,
        risk_category: RiskCategory,
        annotation: Option<String>,
    ) -> AssignmentId {
        let card_id = card_id.into();
        let previous = self.state.risk_assignment(card_id.as_str()).cloned();
        if let Some(prev) = &previous {
            if prev.risk_category == risk_category && prev.annotation == annotation {
                return prev.id;
            }
        }

        let assignment = RiskAssignment::new(card_id.clone(), risk_category)
            .with_id(self.ids.next_id())
            .with_annotation(annotation);
        let id = assignment.id;
        let description = format!("Mark {card_id} as {risk_category}");
        let inverse = match previous {
            Some(prev) => ActionKind::AssignRisk { assignment: prev },
            None => ActionKind::RemoveRisk { card_id },
        };
        self.apply(
            WorkspaceAction::new(ActionKind::AssignRisk { assignment }, inverse, description),
            true,
        );
        id
    }

    /// Remove a card's risk assignment
    pub fn remove_bias_risk(&mut self, card_id: &str) -> bool {
        let Some(previous) = self.state.risk_assignment(card_id).cloned() else {
            return false;
        };
        let description = format!("Remove risk for {card_id}");
        self.apply(
            WorkspaceAction::new(
                ActionKind::RemoveRisk {
                    card_id: previous.card_id.clone(),
                },
                ActionKind::AssignRisk {
                    assignment: previous,
                },
                description,
            ),
            true,
        )
    }

    // ------------------------------------------------------------------
    // Stage assignments
    // ------------------------------------------------------------------

    /// Place a card in a lifecycle stage
    ///
    /// A card may sit in several stages. Placing it in a stage it already
    /// occupies returns the existing assignment id. A new rationale given
    /// for an existing placement replaces the old one as an undoable
    /// [`Self::update_stage_assignment`]; `None` keeps the current rationale.
    pub fn assign_card_to_stage(
        &mut self,
        card_id: impl Into<CardId>,
        stage: LifecycleStage,
        annotation: Option<String>,
    ) -> AssignmentId {
        let card_id = card_id.into();
        if let Some(existing) = self.state.find_stage_assignment(card_id.as_str(), stage) {
            let id = existing.id;
            if annotation.is_some() && existing.annotation != annotation {
                self.update_stage_assignment(id, annotation);
            }
            return id;
        }

        let assignment = StageAssignment::new(card_id, stage)
            .with_id(self.ids.next_id())
            .with_annotation(annotation);
        let id = assignment.id;
        let description = format!("Assign {} to {}", assignment.card_id, stage.label());
        self.apply(
            WorkspaceAction::new(
                ActionKind::AssignStage { assignment },
                ActionKind::RemoveStageAssignment { assignment_id: id },
                description,
            ),
            true,
        );
        id
    }

    /// Remove one specific stage assignment
    pub fn remove_from_stage(&mut self, assignment_id: AssignmentId) -> bool {
        let Some(previous) = self.state.stage_assignment(assignment_id).cloned() else {
            return false;
        };
        let description = format!(
            "Remove {} from {}",
            previous.card_id,
            previous.stage.label()
        );
        self.apply(
            WorkspaceAction::new(
                ActionKind::RemoveStageAssignment { assignment_id },
                ActionKind::AssignStage {
                    assignment: previous,
                },
                description,
            ),
            true,
        )
    }

    /// Remove a card from a stage by (card, stage)
    pub fn remove_card_from_stage(&mut self, card_id: &str, stage: LifecycleStage) -> bool {
        match self.state.find_stage_assignment(card_id, stage).map(|a| a.id) {
            Some(id) => self.remove_from_stage(id),
            None => false,
        }
    }

    /// Set or clear the rationale of a stage assignment
    pub fn update_stage_assignment(
        &mut self,
        assignment_id: AssignmentId,
        annotation: Option<String>,
    ) -> bool {
        let Some(previous) = self.state.stage_assignment(assignment_id) else {
            return false;
        };
        if previous.annotation == annotation {
            return false;
        }
        let description = format!(
            "Update rationale for {} in {}",
            previous.card_id,
            previous.stage.label()
        );
        let inverse = ActionKind::UpdateStageAssignment {
            assignment_id,
            annotation: previous.annotation.clone(),
        };
        self.apply(
            WorkspaceAction::new(
                ActionKind::UpdateStageAssignment {
                    assignment_id,
                    annotation,
                },
                inverse,
                description,
            ),
            true,
        )
    }

    // ------------------------------------------------------------------
    // Pairs
    // ------------------------------------------------------------------

    /// Pair a bias with a mitigation
    ///
    /// Returns `false` if the pair already exists.
    pub fn create_card_pair(
        &mut self,
        bias_id: impl Into<CardId>,
        mitigation_id: impl Into<CardId>,
    ) -> bool {
        let pair = CardPair::new(bias_id.into(), mitigation_id.into());
        let key = pair.key();
        if self
            .state
            .card_pair(key.bias_id.as_str(), key.mitigation_id.as_str())
            .is_some()
        {
            return false;
        }
        let description = format!("Pair {}", key);
        self.apply(
            WorkspaceAction::new(
                ActionKind::CreatePair { pair },
                ActionKind::RemovePair { key },
                description,
            ),
            true,
        )
    }

    /// Remove a pair
    pub fn remove_card_pair(&mut self, bias_id: &str, mitigation_id: &str) -> bool {
        let Some(previous) = self.state.card_pair(bias_id, mitigation_id).cloned() else {
            return false;
        };
        let key = previous.key();
        let description = format!("Unpair {}", key);
        self.apply(
            WorkspaceAction::new(
                ActionKind::RemovePair { key },
                ActionKind::CreatePair { pair: previous },
                description,
            ),
            true,
        )
    }

    /// Change a pair's note and/or rating
    ///
    /// The inverse restores the exact previous values of both fields.
    pub fn update_card_pair(
        &mut self,
        bias_id: &str,
        mitigation_id: &str,
        update: PairUpdate,
    ) -> bool {
        let Some(previous) = self.state.card_pair(bias_id, mitigation_id) else {
            return false;
        };
        let annotation = update
            .annotation
            .unwrap_or_else(|| previous.annotation.clone());
        let effectiveness_rating = update
            .effectiveness_rating
            .unwrap_or(previous.effectiveness_rating);
        if annotation == previous.annotation
            && effectiveness_rating == previous.effectiveness_rating
        {
            return false;
        }

        let key = previous.key();
        let inverse = ActionKind::UpdatePair {
            key: key.clone(),
            annotation: previous.annotation.clone(),
            effectiveness_rating: previous.effectiveness_rating,
        };
        let description = format!("Update pair {}", key);
        self.apply(
            WorkspaceAction::new(
                ActionKind::UpdatePair {
                    key,
                    annotation,
                    effectiveness_rating,
                },
                inverse,
                description,
            ),
            true,
        )
    }

    // ------------------------------------------------------------------
    // Annotations and lifecycle completion
    // ------------------------------------------------------------------

    /// Set a card's free-text note; blank text clears it
    pub fn set_annotation(&mut self, card_id: impl Into<CardId>, text: Option<String>) -> bool {
        let card_id = card_id.into();
        let text = text.filter(|t| !t.trim().is_empty());
        let previous = self.state.annotation(card_id.as_str()).map(str::to_string);
        if previous == text {
            return false;
        }
        let description = match text {
            Some(_) => format!("Annotate {card_id}"),
            None => format!("Clear note on {card_id}"),
        };
        self.apply(
            WorkspaceAction::new(
                ActionKind::SetAnnotation {
                    card_id: card_id.clone(),
                    text,
                },
                ActionKind::SetAnnotation {
                    card_id,
                    text: previous,
                },
                description,
            ),
            true,
        )
    }

    /// Mark a lifecycle stage complete
    pub fn complete_lifecycle_stage(&mut self, stage: LifecycleStage) -> bool {
        self.set_lifecycle_stage_completed(stage, true)
    }

    /// Reopen a completed lifecycle stage
    pub fn reopen_lifecycle_stage(&mut self, stage: LifecycleStage) -> bool {
        self.set_lifecycle_stage_completed(stage, false)
    }

    fn set_lifecycle_stage_completed(&mut self, stage: LifecycleStage, completed: bool) -> bool {
        if self.state.is_stage_completed(stage) == completed {
            return false;
        }
        let verb = if completed { "Complete" } else { "Reopen" };
        self.apply(
            WorkspaceAction::new(
                ActionKind::SetLifecycleStageCompleted { stage, completed },
                ActionKind::SetLifecycleStageCompleted {
                    stage,
                    completed: !completed,
                },
                format!("{verb} {}", stage.label()),
            ),
            true,
        )
    }

    // ------------------------------------------------------------------
    // Activity stages (not recorded in history)
    // ------------------------------------------------------------------

    /// Open a stage without gating
    pub fn set_current_activity_stage(&mut self, stage: ActivityStage) {
        self.activity.set_current_activity_stage(stage);
        self.touch();
    }

    /// Mark an activity stage complete; `false` if it already was
    pub fn complete_activity_stage(&mut self, stage: ActivityStage) -> bool {
        let added = self.activity.complete_activity_stage(stage);
        if added {
            tracing::info!(stage = %stage, "activity stage completed");
            self.touch();
        }
        added
    }

    /// Check whether navigation to `target` is allowed
    #[inline]
    #[must_use]
    pub fn can_advance_to_stage(&self, target: ActivityStage) -> bool {
        self.activity.can_advance_to_stage(target)
    }

    /// Navigate to `target` if allowed
    ///
    /// # Errors
    /// Returns [`ActivityError::StageLocked`] when `target` is not reachable.
    pub fn advance_to(&mut self, target: ActivityStage) -> Result<(), ActivityError> {
        self.activity.advance_to(target)?;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.session.last_modified = Utc::now();
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(WorkspaceConfig::default())
    }
}
