//! Domain state of an in-progress analysis
//!
//! [`DomainState`] holds the mutable collections. Readers get full access;
//! mutation primitives are crate-private so every change flows through the
//! action engine and stays undoable.
//!
//! Collections are ordered maps keyed by stable identifiers, so two states
//! holding the same entities compare equal regardless of edit history.

use crate::types::{
    AssignmentId, CardPair, EffectivenessRating, LifecycleStage, PairKey, RiskAssignment,
    StageAssignment,
};
use mlb_catalog::CardId;
use std::collections::{BTreeMap, BTreeSet};

/// The mutable collections that make up a user's analysis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainState {
    risk_assignments: BTreeMap<CardId, RiskAssignment>,
    stage_assignments: BTreeMap<AssignmentId, StageAssignment>,
    card_pairs: BTreeMap<PairKey, CardPair>,
    annotations: BTreeMap<CardId, String>,
    completed_stages: BTreeSet<LifecycleStage>,
}

impl DomainState {
    /// Create empty state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether no collection holds anything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.risk_assignments.is_empty()
            && self.stage_assignments.is_empty()
            && self.card_pairs.is_empty()
            && self.annotations.is_empty()
            && self.completed_stages.is_empty()
    }

    // ------------------------------------------------------------------
    // Risk assignments
    // ------------------------------------------------------------------

    /// Risk assignment for a card
    #[inline]
    #[must_use]
    pub fn risk_assignment(&self, card_id: &str) -> Option<&RiskAssignment> {
        self.risk_assignments.get(card_id)
    }

    /// All risk assignments, ordered by card id
    pub fn risk_assignments(&self) -> impl Iterator<Item = &RiskAssignment> {
        self.risk_assignments.values()
    }

    /// Number of risk assignments
    #[inline]
    #[must_use]
    pub fn risk_assignment_count(&self) -> usize {
        self.risk_assignments.len()
    }

    // ------------------------------------------------------------------
    // Stage assignments
    // ------------------------------------------------------------------

    /// Stage assignment by id
    #[inline]
    #[must_use]
    pub fn stage_assignment(&self, id: AssignmentId) -> Option<&StageAssignment> {
        self.stage_assignments.get(&id)
    }

    /// All stage assignments, in creation order
    pub fn stage_assignments(&self) -> impl Iterator<Item = &StageAssignment> {
        self.stage_assignments.values()
    }

    /// Number of stage assignments
    #[inline]
    #[must_use]
    pub fn stage_assignment_count(&self) -> usize {
        self.stage_assignments.len()
    }

    /// Assignments of one card across stages
    pub fn assignments_for_card<'a>(
        &'a self,
        card_id: &'a str,
    ) -> impl Iterator<Item = &'a StageAssignment> + 'a {
        self.stage_assignments
            .values()
            .filter(move |a| a.card_id.as_str() == card_id)
    }

    /// Assignments placed in one stage
    pub fn assignments_for_stage(
        &self,
        stage: LifecycleStage,
    ) -> impl Iterator<Item = &StageAssignment> {
        self.stage_assignments
            .values()
            .filter(move |a| a.stage == stage)
    }

    /// First assignment of `card_id` in `stage`
    #[must_use]
    pub fn find_stage_assignment(
        &self,
        card_id: &str,
        stage: LifecycleStage,
    ) -> Option<&StageAssignment> {
        self.stage_assignments
            .values()
            .find(|a| a.stage == stage && a.card_id.as_str() == card_id)
    }

    /// Distinct lifecycle stages holding at least one card
    #[must_use]
    pub fn covered_stages(&self) -> BTreeSet<LifecycleStage> {
        self.stage_assignments.values().map(|a| a.stage).collect()
    }

    // ------------------------------------------------------------------
    // Pairs
    // ------------------------------------------------------------------

    /// Pair by composite key
    #[inline]
    #[must_use]
    pub fn card_pair(&self, bias_id: &str, mitigation_id: &str) -> Option<&CardPair> {
        self.card_pairs
            .get(&PairKey::new(bias_id, mitigation_id))
    }

    /// All pairs, ordered by (bias, mitigation)
    pub fn card_pairs(&self) -> impl Iterator<Item = &CardPair> {
        self.card_pairs.values()
    }

    /// Number of pairs
    #[inline]
    #[must_use]
    pub fn card_pair_count(&self) -> usize {
        self.card_pairs.len()
    }

    /// Pairs for one bias
    pub fn pairs_for_bias<'a>(&'a self, bias_id: &'a str) -> impl Iterator<Item = &'a CardPair> + 'a {
        self.card_pairs
            .values()
            .filter(move |p| p.bias_id.as_str() == bias_id)
    }

    /// Pairs whose bias is assigned to `stage`
    ///
    /// Pairs store no stage of their own; the association is a join against
    /// stage assignments.
    pub fn pairs_for_stage(&self, stage: LifecycleStage) -> impl Iterator<Item = &CardPair> {
        let biases: BTreeSet<&CardId> = self
            .assignments_for_stage(stage)
            .map(|a| &a.card_id)
            .collect();
        self.card_pairs
            .values()
            .filter(move |p| biases.contains(&p.bias_id))
    }

    // ------------------------------------------------------------------
    // Annotations and lifecycle completion
    // ------------------------------------------------------------------

    /// Free-text note for a card
    #[inline]
    #[must_use]
    pub fn annotation(&self, card_id: &str) -> Option<&str> {
        self.annotations.get(card_id).map(String::as_str)
    }

    /// All notes, ordered by card id
    pub fn annotations(&self) -> impl Iterator<Item = (&CardId, &str)> {
        self.annotations.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Check whether a lifecycle stage is marked complete
    #[inline]
    #[must_use]
    pub fn is_stage_completed(&self, stage: LifecycleStage) -> bool {
        self.completed_stages.contains(&stage)
    }

    /// Lifecycle stages marked complete
    #[inline]
    #[must_use]
    pub fn completed_stages(&self) -> &BTreeSet<LifecycleStage> {
        &self.completed_stages
    }

    // ------------------------------------------------------------------
    // Mutation primitives (engine only)
    // ------------------------------------------------------------------

    /// Insert or replace the card's risk assignment, returning the replaced one
    pub(crate) fn put_risk(&mut self, assignment: RiskAssignment) -> Option<RiskAssignment> {
        self.risk_assignments
            .insert(assignment.card_id.clone(), assignment)
    }

    pub(crate) fn take_risk(&mut self, card_id: &str) -> Option<RiskAssignment> {
        self.risk_assignments.remove(card_id)
    }

    pub(crate) fn put_stage_assignment(&mut self, assignment: StageAssignment) {
        self.stage_assignments.insert(assignment.id, assignment);
    }

    pub(crate) fn take_stage_assignment(&mut self, id: AssignmentId) -> Option<StageAssignment> {
        self.stage_assignments.remove(&id)
    }

    /// Replace an assignment's rationale; `false` if the id is unknown
    pub(crate) fn set_stage_annotation(
        &mut self,
        id: AssignmentId,
        annotation: Option<String>,
    ) -> bool {
        match self.stage_assignments.get_mut(&id) {
            Some(assignment) => {
                assignment.annotation = annotation;
                true
            }
            None => false,
        }
    }

    /// Insert pair unless its key exists; `false` if it was already present
    pub(crate) fn put_pair(&mut self, pair: CardPair) -> bool {
        let key = pair.key();
        if self.card_pairs.contains_key(&key) {
            return false;
        }
        self.card_pairs.insert(key, pair);
        true
    }

    pub(crate) fn take_pair(&mut self, key: &PairKey) -> Option<CardPair> {
        self.card_pairs.remove(key)
    }

    /// Overwrite a pair's mutable fields; `false` if the key is unknown
    pub(crate) fn set_pair_fields(
        &mut self,
        key: &PairKey,
        annotation: Option<String>,
        effectiveness_rating: Option<EffectivenessRating>,
    ) -> bool {
        match self.card_pairs.get_mut(key) {
            Some(pair) => {
                pair.annotation = annotation;
                pair.effectiveness_rating = effectiveness_rating;
                true
            }
            None => false,
        }
    }

    /// Set or clear a note
    pub(crate) fn set_annotation(&mut self, card_id: CardId, text: Option<String>) {
        match text {
            Some(text) => {
                self.annotations.insert(card_id, text);
            }
            None => {
                self.annotations.remove(card_id.as_str());
            }
        }
    }

    pub(crate) fn set_stage_completed(&mut self, stage: LifecycleStage, completed: bool) {
        if completed {
            self.completed_stages.insert(stage);
        } else {
            self.completed_stages.remove(&stage);
        }
    }
}
