use amrflow_core::instance::InstanceRecord;
use amrflow_core::task::{TaskDraft, TaskRecord};
use amrflow_core::types::InstanceStatus;
use amrflow_core::{AmrError, Result};
use std::time::Duration;

/// Blocking client for the task and instance services.
///
/// Each method issues exactly one request and either returns the parsed
/// record or an `AmrError::Service` naming the failed operation. A failed
/// call never leaves partial state behind for the caller to reconcile.
pub struct ApiClient {
    base: String,
    agent: ureq::Agent,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(10))
                .build(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Pull the error message out of a failed call. The service reports
    /// `{"error": "..."}` bodies; transport failures use the ureq message.
    fn service_err(operation: &str, err: ureq::Error) -> AmrError {
        let message = match err {
            ureq::Error::Status(code, response) => response
                .into_json::<serde_json::Value>()
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| format!("HTTP {code}")),
            ureq::Error::Transport(t) => t.to_string(),
        };
        AmrError::service(operation, message)
    }

    fn parse<T: serde::de::DeserializeOwned>(
        operation: &str,
        response: ureq::Response,
    ) -> Result<T> {
        response
            .into_json::<T>()
            .map_err(|e| AmrError::service(operation, e.to_string()))
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    pub fn create_task(&self, draft: &TaskDraft) -> Result<TaskRecord> {
        let response = self
            .agent
            .post(&self.url("/api/tasks"))
            .send_json(draft)
            .map_err(|e| Self::service_err("create task", e))?;
        Self::parse("create task", response)
    }

    pub fn list_tasks(&self) -> Result<Vec<TaskRecord>> {
        let response = self
            .agent
            .get(&self.url("/api/tasks"))
            .call()
            .map_err(|e| Self::service_err("list tasks", e))?;
        Self::parse("list tasks", response)
    }

    pub fn delete_task(&self, id: &str) -> Result<()> {
        self.agent
            .delete(&self.url(&format!("/api/tasks/{id}")))
            .call()
            .map_err(|e| Self::service_err("delete task", e))?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Instances
    // -----------------------------------------------------------------------

    pub fn create_instance(&self, task_id: &str) -> Result<InstanceRecord> {
        let response = self
            .agent
            .post(&self.url("/api/instances"))
            .send_json(serde_json::json!({ "task_id": task_id }))
            .map_err(|e| Self::service_err("assign task", e))?;
        Self::parse("assign task", response)
    }

    pub fn list_instances(&self) -> Result<Vec<InstanceRecord>> {
        let response = self
            .agent
            .get(&self.url("/api/instances"))
            .call()
            .map_err(|e| Self::service_err("list instances", e))?;
        Self::parse("list instances", response)
    }

    pub fn get_instance(&self, id: &str) -> Result<InstanceRecord> {
        let response = self
            .agent
            .get(&self.url(&format!("/api/instances/{id}")))
            .call()
            .map_err(|e| Self::service_err("fetch instance", e))?;
        Self::parse("fetch instance", response)
    }

    pub fn set_status(&self, id: &str, status: InstanceStatus) -> Result<InstanceRecord> {
        let operation = match status {
            InstanceStatus::InProgress => "start instance",
            InstanceStatus::Paused => "pause instance",
            _ => "set instance status",
        };
        let response = self
            .agent
            .put(&self.url(&format!("/api/instances/{id}/status")))
            .send_json(serde_json::json!({ "status": status }))
            .map_err(|e| Self::service_err(operation, e))?;
        Self::parse(operation, response)
    }

    pub fn start(&self, id: &str) -> Result<InstanceRecord> {
        self.set_status(id, InstanceStatus::InProgress)
    }

    pub fn pause(&self, id: &str) -> Result<InstanceRecord> {
        self.set_status(id, InstanceStatus::Paused)
    }

    pub fn cancel(&self, id: &str) -> Result<InstanceRecord> {
        let response = self
            .agent
            .post(&self.url(&format!("/api/instances/{id}/cancel")))
            .send_json(serde_json::json!({}))
            .map_err(|e| Self::service_err("cancel instance", e))?;
        Self::parse("cancel instance", response)
    }

    pub fn refresh_status(&self, id: &str) -> Result<InstanceStatus> {
        #[derive(serde::Deserialize)]
        struct StatusBody {
            status: InstanceStatus,
        }
        let response = self
            .agent
            .get(&self.url(&format!("/api/instances/{id}/status")))
            .call()
            .map_err(|e| Self::service_err("refresh status", e))?;
        Ok(Self::parse::<StatusBody>("refresh status", response)?.status)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
