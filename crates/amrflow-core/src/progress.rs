use crate::action::Action;
use crate::error::{AmrError, Result};
use crate::types::InstanceStatus;
use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// StepStatus
// ---------------------------------------------------------------------------

/// Derived status of one action within an observed instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "String")]
pub enum StepStatus {
    Completed,
    Pending,
    Abandoned,
    /// The currently-active step mirrors the coarse instance status
    /// (In Progress, Paused, or an unrecognized status verbatim).
    Current(InstanceStatus),
}

impl StepStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StepStatus::Completed => "Completed",
            StepStatus::Pending => "Pending",
            StepStatus::Abandoned => "Abandoned",
            StepStatus::Current(status) => status.as_str(),
        }
    }
}

impl From<StepStatus> for String {
    fn from(status: StepStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProgressReport
// ---------------------------------------------------------------------------

/// Per-step breakdown and aggregate completion for one task instance.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub steps: Vec<StepStatus>,
    pub total: usize,
    pub completed: usize,
    /// Index of the step currently highlighted, clamped to the sequence.
    pub active_step: usize,
    pub percentage: u32,
    /// Actions that will never run, reported only for abandoned instances
    /// that stopped short of the end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unexecuted: Option<usize>,
}

/// Derive the progress view for an instance over its task's action list.
///
/// Precedence per step is load-bearing: anything strictly before the
/// current index is Completed even for a Failed instance; abandonment only
/// paints the current step and the ones after it. An empty action list has
/// no derivable view and fails with `EmptyWorkflow`; callers render a
/// "no actions" placeholder instead.
pub fn derive(
    actions: &[Action],
    status: &InstanceStatus,
    current_action_index: usize,
) -> Result<ProgressReport> {
    let total = actions.len();
    if total == 0 {
        return Err(AmrError::EmptyWorkflow);
    }

    let is_completed = *status == InstanceStatus::Completed;
    let is_abandoned = status.is_abandoned();

    let completed = if is_completed {
        total
    } else {
        current_action_index.min(total)
    };
    let active_step = if is_completed {
        total - 1
    } else {
        current_action_index.min(total - 1)
    };
    let percentage = ((completed as f64 / total as f64) * 100.0).round() as u32;

    let steps = (0..total)
        .map(|i| {
            if is_completed || i < current_action_index {
                StepStatus::Completed
            } else if i == current_action_index {
                match status {
                    InstanceStatus::Queued => StepStatus::Pending,
                    _ if is_abandoned => StepStatus::Abandoned,
                    other => StepStatus::Current(other.clone()),
                }
            } else if is_abandoned {
                StepStatus::Abandoned
            } else {
                StepStatus::Pending
            }
        })
        .collect();

    let unexecuted = (is_abandoned && completed < total).then_some(total - completed);

    Ok(ProgressReport {
        steps,
        total,
        completed,
        active_step,
        percentage,
        unexecuted,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
