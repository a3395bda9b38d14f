use crate::error::{AmrError, Result};
use crate::progress::{self, ProgressReport};
use crate::task::TaskRecord;
use crate::types::InstanceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// InstanceRecord
// ---------------------------------------------------------------------------

/// One assignment of a task to execution, tracked by coarse status and the
/// index of the action currently being executed. The owning service embeds
/// the task so progress can be derived from the record alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: String,
    pub task_id: String,
    pub status: InstanceStatus,
    #[serde(default)]
    pub current_action_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InstanceRecord {
    pub fn task_name(&self) -> &str {
        self.task.as_ref().map(|t| t.name.as_str()).unwrap_or("Unknown")
    }

    /// Derive the per-step progress view from the embedded task.
    pub fn progress(&self) -> Result<ProgressReport> {
        let task = self
            .task
            .as_ref()
            .ok_or_else(|| AmrError::TaskNotFound(self.task_id.clone()))?;
        progress::derive(&task.actions, &self.status, self.current_action_index)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
