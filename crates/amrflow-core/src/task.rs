use crate::action::Action;
use crate::error::Result;
use crate::workflow::Workflow;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TaskRecord
// ---------------------------------------------------------------------------

/// The durable form of a submitted workflow, as the task service stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

// ---------------------------------------------------------------------------
// TaskDraft
// ---------------------------------------------------------------------------

/// A task ready for submission: a `TaskRecord` without its service-assigned
/// id. Construction runs the workflow validity check so an unsubmittable
/// sequence fails loudly before it ever reaches the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub actions: Vec<Action>,
}

impl TaskDraft {
    pub fn from_workflow(
        name: impl Into<String>,
        description: impl Into<String>,
        workflow: &Workflow,
    ) -> Result<Self> {
        workflow.validate()?;
        Ok(Self {
            name: name.into(),
            description: description.into(),
            actions: workflow.actions().to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ConfigValue;
    use crate::error::AmrError;
    use crate::types::ActionType;

    #[test]
    fn draft_from_valid_workflow() {
        let mut wf = Workflow::new();
        wf.add(ActionType::Latch);
        let draft = TaskDraft::from_workflow("Pickup", "latch only", &wf).unwrap();
        assert_eq!(draft.name, "Pickup");
        assert_eq!(draft.actions.len(), 1);
    }

    #[test]
    fn draft_rejects_invalid_workflow() {
        let mut wf = Workflow::new();
        wf.add(ActionType::Move);
        assert!(matches!(
            TaskDraft::from_workflow("Pickup", "", &wf),
            Err(AmrError::ValidationFailed { .. })
        ));
        assert!(matches!(
            TaskDraft::from_workflow("Empty", "", &Workflow::new()),
            Err(AmrError::EmptyWorkflow)
        ));
    }

    #[test]
    fn task_record_json_shape() {
        let json = r#"{
            "id": "6613a",
            "name": "Dock run",
            "actions": [
                {"id": "action-1", "type": "MOVE", "config": {"location": "Shipping Dock"}},
                {"id": "action-2", "type": "LATCH"}
            ]
        }"#;
        let task: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(task.description, "");
        assert_eq!(task.actions.len(), 2);
        assert_eq!(task.actions[0].action_type, ActionType::Move);
        assert_eq!(
            task.actions[0].get("location"),
            Some(&ConfigValue::from("Shipping Dock"))
        );
        assert!(task.actions[1].config.is_empty());
    }
}
