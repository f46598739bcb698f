//! Workspace engine configuration

use serde::{Deserialize, Serialize};

/// Default undo depth
pub const DEFAULT_MAX_HISTORY_SIZE: usize = 50;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Maximum number of undoable actions kept
    pub max_history_size: usize,
    /// Activity this workspace belongs to, recorded in session metadata
    pub activity_id: Option<String>,
}

impl WorkspaceConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With history bound
    #[inline]
    #[must_use]
    pub fn with_max_history_size(mut self, max: usize) -> Self {
        self.max_history_size = max;
        self
    }

    /// With activity id
    #[inline]
    #[must_use]
    pub fn with_activity_id(mut self, activity_id: impl Into<String>) -> Self {
        self.activity_id = Some(activity_id.into());
        self
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
            activity_id: None,
        }
    }
}
