//! MLB Workspace - reversible analysis state
//!
//! The engine behind a bias-card analysis session:
//! - Domain state: risk assignments, stage assignments, bias/mitigation pairs,
//!   free-text notes and lifecycle-stage completion
//! - Invertible actions recorded in a bounded undo/redo log
//! - Five-stage activity progress with gated forward navigation
//! - Snapshots for persistence and export (history is never persisted)
//!
//! # Example
//!
//! ```rust,ignore
//! use mlb_workspace::{LifecycleStage, Workspace, WorkspaceConfig};
//!
//! let mut ws = Workspace::new(WorkspaceConfig::default());
//! ws.assign_card_to_stage("bias-1", LifecycleStage::DataAnalysis, None);
//! ws.create_card_pair("bias-1", "mitigation-3");
//!
//! ws.undo(); // pair removed, stage assignment intact
//! ws.redo(); // pair back
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod action;
pub mod activity;
pub mod config;
pub mod engine;
pub mod history;
pub mod snapshot;
pub mod state;
pub mod types;

// Re-exports for convenience
pub use action::{ActionKind, WorkspaceAction};
pub use activity::{ActivityError, ActivityStage, ActivityStageState};
pub use config::{WorkspaceConfig, DEFAULT_MAX_HISTORY_SIZE};
pub use engine::Workspace;
pub use history::History;
pub use snapshot::{SessionMetadata, SnapshotError, WorkspaceSnapshot, SNAPSHOT_FORMAT_VERSION};
pub use state::DomainState;
pub use types::{
    ActionId, AssignmentId, AssignmentIdGenerator, CardPair, EffectivenessRating, LifecyclePhase,
    LifecycleStage, PairKey, PairUpdate, RatingOutOfRange, RiskAssignment, RiskCategory,
    StageAssignment,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with a workspace
    pub use crate::{
        ActivityStage, EffectivenessRating, LifecycleStage, PairUpdate, RiskCategory, Workspace,
        WorkspaceConfig,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
