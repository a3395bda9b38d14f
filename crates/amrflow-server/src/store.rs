use amrflow_core::instance::InstanceRecord;
use amrflow_core::task::{TaskDraft, TaskRecord};
use amrflow_core::types::InstanceStatus;
use amrflow_core::workflow::Workflow;
use amrflow_core::{AmrError, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// In-memory task and instance records. Cloning shares the underlying
/// maps; the store is the single owner of record state on the server.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    tasks: HashMap<String, TaskRecord>,
    instances: HashMap<String, InstanceRecord>,
}

/// What a dispatcher tick did to one running instance.
#[derive(Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved on to the action at the returned index.
    Advanced(usize),
    /// The last action finished; the instance is now Completed.
    Completed,
    /// Paused instances hold their position.
    Held,
    /// The instance ended or vanished; the executor is free.
    Released,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// Persist a submitted draft. The sequence is re-validated here; the
    /// store owns the record and does not trust the submitting client.
    pub async fn create_task(&self, draft: TaskDraft) -> Result<TaskRecord> {
        let workflow = Workflow::from_actions(draft.actions)?;
        workflow.validate()?;

        let task = TaskRecord {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            description: draft.description,
            actions: workflow.actions().to_vec(),
        };
        let mut inner = self.inner.write().await;
        inner.tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    pub async fn list_tasks(&self) -> Vec<TaskRecord> {
        let inner = self.inner.read().await;
        let mut tasks: Vec<TaskRecord> = inner.tasks.values().cloned().collect();
        tasks.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        tasks
    }

    pub async fn get_task(&self, id: &str) -> Result<TaskRecord> {
        let inner = self.inner.read().await;
        inner
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| AmrError::TaskNotFound(id.to_string()))
    }

    pub async fn delete_task(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .tasks
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AmrError::TaskNotFound(id.to_string()))
    }

    // -----------------------------------------------------------------------
    // Instances
    // -----------------------------------------------------------------------

    /// Queue a new instance of an existing task. The task is embedded in
    /// the record so observers can derive progress without a second fetch.
    pub async fn create_instance(&self, task_id: &str) -> Result<InstanceRecord> {
        let mut inner = self.inner.write().await;
        let task = inner
            .tasks
            .get(task_id)
            .cloned()
            .ok_or_else(|| AmrError::TaskNotFound(task_id.to_string()))?;

        let now = Utc::now();
        let instance = InstanceRecord {
            id: Uuid::new_v4().to_string(),
            task_id: task_id.to_string(),
            status: InstanceStatus::Queued,
            current_action_index: 0,
            task: Some(task),
            created_at: now,
            updated_at: now,
        };
        inner.instances.insert(instance.id.clone(), instance.clone());
        Ok(instance)
    }

    pub async fn list_instances(&self) -> Vec<InstanceRecord> {
        let inner = self.inner.read().await;
        let mut instances: Vec<InstanceRecord> = inner.instances.values().cloned().collect();
        instances.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        instances
    }

    pub async fn get_instance(&self, id: &str) -> Result<InstanceRecord> {
        let inner = self.inner.read().await;
        inner
            .instances
            .get(id)
            .cloned()
            .ok_or_else(|| AmrError::InstanceNotFound(id.to_string()))
    }

    pub async fn set_status(&self, id: &str, status: InstanceStatus) -> Result<InstanceRecord> {
        let mut inner = self.inner.write().await;
        let instance = inner
            .instances
            .get_mut(id)
            .ok_or_else(|| AmrError::InstanceNotFound(id.to_string()))?;
        instance.status = status;
        instance.updated_at = Utc::now();
        Ok(instance.clone())
    }

    pub async fn cancel(&self, id: &str) -> Result<InstanceRecord> {
        self.set_status(id, InstanceStatus::Cancelled).await
    }

    pub async fn refresh_status(&self, id: &str) -> Result<InstanceStatus> {
        Ok(self.get_instance(id).await?.status)
    }

    // -----------------------------------------------------------------------
    // Dispatcher support
    // -----------------------------------------------------------------------

    /// Claim the oldest queued instance for an executor: it transitions to
    /// In Progress at action 0 and is returned. None when nothing is queued.
    pub async fn claim_next_queued(&self) -> Option<InstanceRecord> {
        let mut inner = self.inner.write().await;
        let id = inner
            .instances
            .values()
            .filter(|i| i.status == InstanceStatus::Queued)
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)))
            .map(|i| i.id.clone())?;

        let instance = inner.instances.get_mut(&id)?;
        instance.status = InstanceStatus::InProgress;
        instance.current_action_index = 0;
        instance.updated_at = Utc::now();
        Some(instance.clone())
    }

    /// Advance a claimed instance by one action. Paused instances hold;
    /// reaching the last action completes the instance; anything terminal
    /// or missing releases the executor.
    pub async fn step_instance(&self, id: &str) -> StepOutcome {
        let mut inner = self.inner.write().await;
        let Some(instance) = inner.instances.get_mut(id) else {
            return StepOutcome::Released;
        };

        match instance.status {
            InstanceStatus::Paused => StepOutcome::Held,
            InstanceStatus::InProgress => {
                let total = instance.task.as_ref().map(|t| t.actions.len()).unwrap_or(0);
                instance.updated_at = Utc::now();
                if instance.current_action_index + 1 >= total {
                    instance.status = InstanceStatus::Completed;
                    StepOutcome::Completed
                } else {
                    instance.current_action_index += 1;
                    StepOutcome::Advanced(instance.current_action_index)
                }
            }
            _ => StepOutcome::Released,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
