//! Persisted workspace layout
//!
//! A snapshot is the flat JSON object written to durable storage: session
//! metadata plus the domain collections and activity progress. Undo history
//! is deliberately absent, so undo/redo starts empty after a reload.
//!
//! Import is the trust boundary. [`Workspace::from_snapshot`] checks
//! referential integrity against the catalog and rejects anything the engine
//! would otherwise have to defend against later.

use crate::activity::ActivityStageState;
use crate::config::WorkspaceConfig;
use crate::engine::Workspace;
use crate::history::History;
use crate::state::DomainState;
use crate::types::{
    AssignmentId, AssignmentIdGenerator, CardPair, LifecycleStage, PairKey, RiskAssignment,
    StageAssignment,
};
use chrono::{DateTime, Utc};
use mlb_catalog::{CardCatalog, CardId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use ulid::Ulid;

/// Current snapshot format
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Session bookkeeping stored alongside the domain collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
}

impl SessionMetadata {
    /// Fresh session stamped now
    #[must_use]
    pub fn new(activity_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: Ulid::new().to_string(),
            created_at: now,
            last_modified: now,
            activity_id,
        }
    }
}

/// Serializable workspace state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    #[serde(flatten)]
    pub session: SessionMetadata,
    #[serde(default)]
    pub risk_assignments: Vec<RiskAssignment>,
    #[serde(default)]
    pub stage_assignments: Vec<StageAssignment>,
    #[serde(default)]
    pub card_pairs: Vec<CardPair>,
    #[serde(default)]
    pub annotations: BTreeMap<CardId, String>,
    #[serde(default)]
    pub completed_stages: Vec<LifecycleStage>,
    #[serde(default)]
    pub activity_stage_state: ActivityStageState,
}

fn default_format_version() -> u32 {
    SNAPSHOT_FORMAT_VERSION
}

/// Snapshot load and import errors
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// IO error during read or write
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not a valid snapshot document
    #[error("malformed workspace snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Written by a newer format
    #[error("unsupported snapshot format version {0}")]
    UnsupportedVersion(u32),

    /// Card id absent from the catalog
    #[error("{context} references unknown card '{card_id}'")]
    UnknownCard { card_id: CardId, context: &'static str },

    /// Pair side has the wrong card kind
    #[error("pair {key} must join a bias with a mitigation")]
    InvalidPair { key: PairKey },

    /// Card carries two risk assignments
    #[error("card '{0}' has more than one risk assignment")]
    DuplicateRisk(CardId),

    /// Assignment id used twice
    #[error("duplicate assignment id {0}")]
    DuplicateAssignment(AssignmentId),

    /// Pair key used twice
    #[error("duplicate pair {0}")]
    DuplicatePair(PairKey),
}

impl SnapshotError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl WorkspaceSnapshot {
    /// Parse a snapshot document
    ///
    /// # Errors
    /// Returns [`SnapshotError::Json`] for malformed input or
    /// [`SnapshotError::UnsupportedVersion`] for a newer format.
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.format_version > SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.format_version));
        }
        Ok(snapshot)
    }

    /// Read a snapshot file
    ///
    /// # Errors
    /// Returns [`SnapshotError::Io`] if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let json =
            std::fs::read_to_string(path).map_err(|e| SnapshotError::io_error(path, e))?;
        Self::from_json_str(&json)
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    /// Returns [`SnapshotError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty-printed JSON to `path`
    ///
    /// # Errors
    /// Returns [`SnapshotError::Io`] if the file cannot be written.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|e| SnapshotError::io_error(path, e))
    }

    /// Check referential integrity against a catalog
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn validate<C: CardCatalog + ?Sized>(&self, catalog: &C) -> Result<(), SnapshotError> {
        let known = |card_id: &CardId, context: &'static str| {
            if catalog.contains(card_id.as_str()) {
                Ok(())
            } else {
                Err(SnapshotError::UnknownCard {
                    card_id: card_id.clone(),
                    context,
                })
            }
        };

        let mut risk_cards = HashSet::new();
        for assignment in &self.risk_assignments {
            known(&assignment.card_id, "risk assignment")?;
            if !risk_cards.insert(&assignment.card_id) {
                return Err(SnapshotError::DuplicateRisk(assignment.card_id.clone()));
            }
        }

        let mut assignment_ids = HashSet::new();
        for assignment in &self.stage_assignments {
            known(&assignment.card_id, "stage assignment")?;
            if !assignment_ids.insert(assignment.id) {
                return Err(SnapshotError::DuplicateAssignment(assignment.id));
            }
        }

        let mut pair_keys = HashSet::new();
        for pair in &self.card_pairs {
            let key = pair.key();
            let bias = catalog.card_by_id(pair.bias_id.as_str());
            let mitigation = catalog.card_by_id(pair.mitigation_id.as_str());
            match (bias, mitigation) {
                (None, _) => return Err(SnapshotError::UnknownCard {
                    card_id: pair.bias_id.clone(),
                    context: "card pair",
                }),
                (_, None) => return Err(SnapshotError::UnknownCard {
                    card_id: pair.mitigation_id.clone(),
                    context: "card pair",
                }),
                (Some(b), Some(m)) if !(b.is_bias() && m.is_mitigation()) => {
                    return Err(SnapshotError::InvalidPair { key });
                }
                _ => {}
            }
            if !pair_keys.insert(key.clone()) {
                return Err(SnapshotError::DuplicatePair(key));
            }
        }

        for card_id in self.annotations.keys() {
            known(card_id, "annotation")?;
        }
        Ok(())
    }

    fn into_state(self) -> (DomainState, ActivityStageState, SessionMetadata) {
        let mut state = DomainState::new();
        for assignment in self.risk_assignments {
            state.put_risk(assignment);
        }
        for assignment in self.stage_assignments {
            state.put_stage_assignment(assignment);
        }
        for pair in self.card_pairs {
            state.put_pair(pair);
        }
        for (card_id, text) in self.annotations {
            state.set_annotation(card_id, Some(text));
        }
        for stage in self.completed_stages {
            state.set_stage_completed(stage, true);
        }
        (state, self.activity_stage_state, self.session)
    }
}

impl Workspace {
    /// Read-only snapshot for persistence and export
    #[must_use]
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            session: self.session.clone(),
            risk_assignments: self.state.risk_assignments().cloned().collect(),
            stage_assignments: self.state.stage_assignments().cloned().collect(),
            card_pairs: self.state.card_pairs().cloned().collect(),
            annotations: self
                .state
                .annotations()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect(),
            completed_stages: self.state.completed_stages().iter().copied().collect(),
            activity_stage_state: self.activity.clone(),
        }
    }

    /// Admit a persisted snapshot after checking it against the catalog
    ///
    /// The restored workspace keeps the snapshot's session metadata and
    /// starts with empty history. `config.activity_id` fills in a missing
    /// activity id but never overrides a stored one.
    ///
    /// # Errors
    /// Returns a [`SnapshotError`] describing the first integrity violation.
    pub fn from_snapshot<C: CardCatalog + ?Sized>(
        snapshot: WorkspaceSnapshot,
        catalog: &C,
        config: WorkspaceConfig,
    ) -> Result<Self, SnapshotError> {
        snapshot.validate(catalog)?;
        let (state, activity, mut session) = snapshot.into_state();
        if session.activity_id.is_none() {
            session.activity_id = config.activity_id;
        }
        tracing::info!(
            session = %session.session_id,
            risks = state.risk_assignment_count(),
            stages = state.stage_assignment_count(),
            pairs = state.card_pair_count(),
            "restored workspace snapshot"
        );
        let mut ids = AssignmentIdGenerator::new();
        for id in state
            .risk_assignments()
            .map(|a| a.id)
            .chain(state.stage_assignments().map(|a| a.id))
        {
            ids.observe(id);
        }
        Ok(Self {
            state,
            activity,
            history: History::new(config.max_history_size),
            session,
            ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskCategory;
    use mlb_catalog::{Card, CardCategory, StaticCatalog};

    fn catalog() -> StaticCatalog {
        StaticCatalog::new(vec![
            Card::new("bias-1", CardCategory::CognitiveBias, 1, "Bias One"),
            Card::new("bias-2", CardCategory::SocialBias, 1, "Bias Two"),
            Card::new("mitigation-1", CardCategory::MitigationTechnique, 1, "Mitigation One"),
        ])
        .unwrap()
    }

    #[test]
    fn snapshot_excludes_history() {
        let mut ws = Workspace::default();
        ws.assign_bias_risk("bias-1", RiskCategory::HighRisk, None);
        let json = ws.snapshot().to_json_pretty().unwrap();

        assert!(json.contains("\"session_id\""));
        assert!(json.contains("\"risk_assignments\""));
        assert!(!json.contains("undo"));
    }

    #[test]
    fn restored_workspace_appends_after_loaded_assignments() {
        let mut ws = Workspace::default();
        ws.assign_card_to_stage("bias-1", LifecycleStage::DataAnalysis, None);
        ws.assign_card_to_stage("bias-2", LifecycleStage::DataAnalysis, None);

        let mut restored =
            Workspace::from_snapshot(ws.snapshot(), &catalog(), WorkspaceConfig::default()).unwrap();
        let added = restored.assign_card_to_stage("bias-1", LifecycleStage::ModelReporting, None);

        let last = restored.state().stage_assignments().last().map(|a| a.id);
        assert_eq!(last, Some(added));
    }

    #[test]
    fn rejects_unknown_card() {
        let mut ws = Workspace::default();
        ws.assign_card_to_stage("ghost", LifecycleStage::DataAnalysis, None);

        let result = Workspace::from_snapshot(ws.snapshot(), &catalog(), WorkspaceConfig::default());
        assert!(matches!(
            result,
            Err(SnapshotError::UnknownCard { context: "stage assignment", .. })
        ));
    }

    #[test]
    fn rejects_reversed_pair() {
        let mut ws = Workspace::default();
        ws.create_card_pair("mitigation-1", "bias-1");

        let result = Workspace::from_snapshot(ws.snapshot(), &catalog(), WorkspaceConfig::default());
        assert!(matches!(result, Err(SnapshotError::InvalidPair { .. })));
    }

    #[test]
    fn rejects_duplicate_risk() {
        let mut ws = Workspace::default();
        ws.assign_bias_risk("bias-1", RiskCategory::LowRisk, None);
        let mut snapshot = ws.snapshot();
        let mut copy = snapshot.risk_assignments[0].clone();
        copy.id = AssignmentId::new();
        snapshot.risk_assignments.push(copy);

        let result = Workspace::from_snapshot(snapshot, &catalog(), WorkspaceConfig::default());
        assert!(matches!(result, Err(SnapshotError::DuplicateRisk(_))));
    }

    #[test]
    fn rejects_future_version() {
        let mut snapshot = Workspace::default().snapshot();
        snapshot.format_version = SNAPSHOT_FORMAT_VERSION + 1;
        let json = snapshot.to_json_pretty().unwrap();

        assert!(matches!(
            WorkspaceSnapshot::from_json_str(&json),
            Err(SnapshotError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn activity_id_fills_gap_only() {
        let ws = Workspace::new(WorkspaceConfig::new().with_activity_id("stored"));
        let restored = Workspace::from_snapshot(
            ws.snapshot(),
            &catalog(),
            WorkspaceConfig::new().with_activity_id("other"),
        )
        .unwrap();
        assert_eq!(restored.session().activity_id.as_deref(), Some("stored"));

        let ws = Workspace::default();
        let restored = Workspace::from_snapshot(
            ws.snapshot(),
            &catalog(),
            WorkspaceConfig::new().with_activity_id("filled"),
        )
        .unwrap();
        assert_eq!(restored.session().activity_id.as_deref(), Some("filled"));
    }
}
