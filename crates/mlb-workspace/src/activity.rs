//! Five-stage activity progress
//!
//! Tracks which workflow stage is open and which have been completed.
//! Completion is monotonic. Forward navigation reaches at most one stage past
//! the highest completed one; backward navigation is always allowed.
//!
//! This is the activity-level tracker. Per-lifecycle-stage bookkeeping lives
//! in [`DomainState::completed_stages`](crate::DomainState::completed_stages).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Activity stage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActivityError {
    /// Stage number outside 1..=5
    #[error("activity stage must be within 1..=5, got {0}")]
    InvalidStage(u8),

    /// Navigation past the reachable range
    #[error("cannot advance to stage {target}: complete stage {required} first")]
    StageLocked { target: u8, required: u8 },
}

/// One of the five sequential workflow steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ActivityStage {
    /// 1: sort biases into risk categories
    RiskCategorize = 1,
    /// 2: place biases in lifecycle stages
    LifecycleAssign = 2,
    /// 3: record rationale for placements
    Rationale = 3,
    /// 4: pair biases with mitigations
    Mitigate = 4,
    /// 5: review and report
    Review = 5,
}

impl ActivityStage {
    /// All stages in order
    pub const ALL: [Self; 5] = [
        Self::RiskCategorize,
        Self::LifecycleAssign,
        Self::Rationale,
        Self::Mitigate,
        Self::Review,
    ];

    /// Stage number, 1..=5
    #[inline]
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Following stage, `None` after review
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::try_from(self.number() + 1).ok()
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RiskCategorize => "risk-categorize",
            Self::LifecycleAssign => "lifecycle-assign",
            Self::Rationale => "rationale",
            Self::Mitigate => "mitigate",
            Self::Review => "review",
        }
    }
}

impl TryFrom<u8> for ActivityStage {
    type Error = ActivityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::RiskCategorize),
            2 => Ok(Self::LifecycleAssign),
            3 => Ok(Self::Rationale),
            4 => Ok(Self::Mitigate),
            5 => Ok(Self::Review),
            other => Err(ActivityError::InvalidStage(other)),
        }
    }
}

impl From<ActivityStage> for u8 {
    fn from(value: ActivityStage) -> Self {
        value.number()
    }
}

impl fmt::Display for ActivityStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.as_str())
    }
}

/// Current stage plus the set of completed stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStageState {
    current_stage: ActivityStage,
    completed_activity_stages: BTreeSet<ActivityStage>,
}

impl ActivityStageState {
    /// Stage 1, nothing completed
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_stage: ActivityStage::RiskCategorize,
            completed_activity_stages: BTreeSet::new(),
        }
    }

    /// Open stage
    #[inline]
    #[must_use]
    pub fn current_stage(&self) -> ActivityStage {
        self.current_stage
    }

    /// Completed stages
    #[inline]
    #[must_use]
    pub fn completed_activity_stages(&self) -> &BTreeSet<ActivityStage> {
        &self.completed_activity_stages
    }

    /// Check if a stage has been completed
    #[inline]
    #[must_use]
    pub fn is_completed(&self, stage: ActivityStage) -> bool {
        self.completed_activity_stages.contains(&stage)
    }

    /// Highest completed stage number, 0 when none
    #[inline]
    #[must_use]
    pub fn completed_progress(&self) -> u8 {
        self.completed_activity_stages
            .last()
            .map_or(0, |s| s.number())
    }

    /// Terminal: the review stage is complete
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_completed(ActivityStage::Review)
    }

    /// Set the open stage without any gating
    ///
    /// Gating is the caller's job via [`Self::can_advance_to_stage`].
    pub fn set_current_activity_stage(&mut self, stage: ActivityStage) {
        self.current_stage = stage;
    }

    /// Mark a stage completed; returns `false` if it already was
    pub fn complete_activity_stage(&mut self, stage: ActivityStage) -> bool {
        self.completed_activity_stages.insert(stage)
    }

    /// Check whether navigation to `target` is allowed
    #[must_use]
    pub fn can_advance_to_stage(&self, target: ActivityStage) -> bool {
        validate_transition(self, target).is_ok()
    }

    /// Navigate to `target` if allowed
    ///
    /// # Errors
    /// Returns [`ActivityError::StageLocked`] when `target` is beyond the
    /// reachable range.
    pub fn advance_to(&mut self, target: ActivityStage) -> Result<(), ActivityError> {
        validate_transition(self, target)?;
        self.current_stage = target;
        Ok(())
    }
}

impl Default for ActivityStageState {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates navigation from the current state to `target`.
pub fn validate_transition(
    state: &ActivityStageState,
    target: ActivityStage,
) -> Result<(), ActivityError> {
    if allowed(state, target) {
        Ok(())
    } else {
        Err(ActivityError::StageLocked {
            target: target.number(),
            required: target.number() - 1,
        })
    }
}

/// Stages reachable from the current state, in order
#[must_use]
pub fn reachable_stages(state: &ActivityStageState) -> Vec<ActivityStage> {
    ActivityStage::ALL
        .into_iter()
        .filter(|&s| allowed(state, s))
        .collect()
}

fn allowed(state: &ActivityStageState, target: ActivityStage) -> bool {
    target == ActivityStage::RiskCategorize
        || target <= state.current_stage
        || state.completed_progress() >= target.number() - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let state = ActivityStageState::new();
        assert_eq!(state.current_stage(), ActivityStage::RiskCategorize);
        assert_eq!(state.completed_progress(), 0);
        assert_eq!(reachable_stages(&state), vec![ActivityStage::RiskCategorize]);
        assert!(!state.is_complete());
    }

    #[test]
    fn forward_only_one_past_highest_completed() {
        let mut state = ActivityStageState::new();
        state.complete_activity_stage(ActivityStage::RiskCategorize);

        assert!(state.can_advance_to_stage(ActivityStage::LifecycleAssign));
        assert!(!state.can_advance_to_stage(ActivityStage::Rationale));
        assert_eq!(
            state.advance_to(ActivityStage::Mitigate),
            Err(ActivityError::StageLocked {
                target: 4,
                required: 3
            })
        );
        assert_eq!(state.current_stage(), ActivityStage::RiskCategorize);
    }

    #[test]
    fn backward_navigation_is_free() {
        let mut state = ActivityStageState::new();
        state.set_current_activity_stage(ActivityStage::Mitigate);

        assert!(state.can_advance_to_stage(ActivityStage::Rationale));
        assert!(state.advance_to(ActivityStage::LifecycleAssign).is_ok());
        // stage 4 was current before, but nothing is completed
        assert!(!state.can_advance_to_stage(ActivityStage::Mitigate));
    }

    #[test]
    fn completion_is_monotonic() {
        let mut state = ActivityStageState::new();
        assert!(state.complete_activity_stage(ActivityStage::Rationale));
        let snapshot = state.clone();

        assert!(!state.complete_activity_stage(ActivityStage::Rationale));
        assert_eq!(state, snapshot);
    }

    #[test]
    fn terminal_after_review() {
        let mut state = ActivityStageState::new();
        for stage in ActivityStage::ALL {
            state.complete_activity_stage(stage);
        }
        assert!(state.is_complete());
        assert_eq!(ActivityStage::Review.next(), None);
        assert_eq!(
            ActivityStage::Rationale.next(),
            Some(ActivityStage::Mitigate)
        );
    }

    #[test]
    fn stage_numbers() {
        assert_eq!(ActivityStage::try_from(0), Err(ActivityError::InvalidStage(0)));
        assert_eq!(ActivityStage::try_from(6), Err(ActivityError::InvalidStage(6)));
        assert_eq!(ActivityStage::try_from(3), Ok(ActivityStage::Rationale));

        let json = serde_json::to_string(&ActivityStageState::new()).unwrap();
        assert_eq!(json, r#"{"current_stage":1,"completed_activity_stages":[]}"#);
        assert!(serde_json::from_str::<ActivityStageState>(
            r#"{"current_stage":7,"completed_activity_stages":[]}"#
        )
        .is_err());
    }
}
