use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

/// The closed set of action kinds an AMR task sequence may contain.
///
/// Wire names are the upper-case tags the fleet API has always used
/// (`"WAIT"` is the wire name for `WaitForTime`). Adding a variant requires
/// registering its configuration schema in `registry` at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "MOVE")]
    Move,
    #[serde(rename = "LATCH")]
    Latch,
    #[serde(rename = "UNLATCH")]
    Unlatch,
    #[serde(rename = "REVERSE")]
    Reverse,
    #[serde(rename = "WAIT FOR TRIGGER")]
    WaitForTrigger,
    #[serde(rename = "WAIT")]
    WaitForTime,
    #[serde(rename = "RELEASE TRIGGER")]
    ReleaseTrigger,
    #[serde(rename = "HORN")]
    Horn,
    #[serde(rename = "ANNOUNCE")]
    Announce,
    #[serde(rename = "ROTATE")]
    Rotate,
}

impl ActionType {
    pub fn all() -> &'static [ActionType] {
        &[
            ActionType::Move,
            ActionType::Latch,
            ActionType::Unlatch,
            ActionType::Reverse,
            ActionType::WaitForTrigger,
            ActionType::WaitForTime,
            ActionType::ReleaseTrigger,
            ActionType::Horn,
            ActionType::Announce,
            ActionType::Rotate,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Move => "MOVE",
            ActionType::Latch => "LATCH",
            ActionType::Unlatch => "UNLATCH",
            ActionType::Reverse => "REVERSE",
            ActionType::WaitForTrigger => "WAIT FOR TRIGGER",
            ActionType::WaitForTime => "WAIT",
            ActionType::ReleaseTrigger => "RELEASE TRIGGER",
            ActionType::Horn => "HORN",
            ActionType::Announce => "ANNOUNCE",
            ActionType::Rotate => "ROTATE",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionType {
    type Err = crate::error::AmrError;

    /// Accepts the wire name in any case, with hyphens or underscores in
    /// place of spaces (`"wait-for-trigger"` parses as `WaitForTrigger`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "MOVE" => Ok(ActionType::Move),
            "LATCH" => Ok(ActionType::Latch),
            "UNLATCH" => Ok(ActionType::Unlatch),
            "REVERSE" => Ok(ActionType::Reverse),
            "WAIT FOR TRIGGER" => Ok(ActionType::WaitForTrigger),
            "WAIT" | "WAIT FOR TIME" => Ok(ActionType::WaitForTime),
            "RELEASE TRIGGER" => Ok(ActionType::ReleaseTrigger),
            "HORN" => Ok(ActionType::Horn),
            "ANNOUNCE" => Ok(ActionType::Announce),
            "ROTATE" => Ok(ActionType::Rotate),
            _ => Err(crate::error::AmrError::UnknownActionType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// InstanceStatus
// ---------------------------------------------------------------------------

/// Coarse lifecycle status of a task instance, as reported by the backend.
///
/// The backend is the source of truth for these values; anything it reports
/// outside the known set is carried verbatim in `Other` and treated as
/// display-only rather than rejected at the deserialization boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstanceStatus {
    Queued,
    InProgress,
    Paused,
    Completed,
    Failed,
    Cancelled,
    Other(String),
}

impl InstanceStatus {
    pub fn known() -> &'static [InstanceStatus] {
        &[
            InstanceStatus::Queued,
            InstanceStatus::InProgress,
            InstanceStatus::Paused,
            InstanceStatus::Completed,
            InstanceStatus::Failed,
            InstanceStatus::Cancelled,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            InstanceStatus::Queued => "Queued",
            InstanceStatus::InProgress => "In Progress",
            InstanceStatus::Paused => "Paused",
            InstanceStatus::Completed => "Completed",
            InstanceStatus::Failed => "Failed",
            InstanceStatus::Cancelled => "Cancelled",
            InstanceStatus::Other(s) => s,
        }
    }

    /// Execution has ended and will not resume.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InstanceStatus::Completed | InstanceStatus::Failed | InstanceStatus::Cancelled
        )
    }

    /// The instance stopped before running every action.
    pub fn is_abandoned(&self) -> bool {
        matches!(self, InstanceStatus::Cancelled | InstanceStatus::Failed)
    }

    /// Whether Start/Pause/Cancel controls apply. Queued instances belong to
    /// the dispatcher, terminal instances are done, and unrecognized
    /// statuses are display-only.
    pub fn offers_controls(&self) -> bool {
        matches!(self, InstanceStatus::InProgress | InstanceStatus::Paused)
    }
}

impl From<String> for InstanceStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Queued" => InstanceStatus::Queued,
            "In Progress" => InstanceStatus::InProgress,
            "Paused" => InstanceStatus::Paused,
            "Completed" => InstanceStatus::Completed,
            "Failed" => InstanceStatus::Failed,
            "Cancelled" => InstanceStatus::Cancelled,
            _ => InstanceStatus::Other(s),
        }
    }
}

impl From<InstanceStatus> for String {
    fn from(status: InstanceStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
