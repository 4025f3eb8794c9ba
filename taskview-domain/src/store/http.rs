use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use std::collections::HashSet;
use taskview_core::config::StoreConfig;
use tracing::{debug, info, warn};

use super::TaskStore;
use crate::credentials::Credential;
use crate::error::{FailureCause, TaskViewError};
use crate::tasks::{Task, TaskDraft};

const TASKS_PATH: &str = "/tasks";
const CLIENT_USER_AGENT: &str = concat!("taskview/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY_CHARS: usize = 512;

/// [`TaskStore`] over HTTP: `GET` and `POST` on `<base_url>/tasks` with a bearer
/// header, JSON in both directions.
#[derive(Debug, Clone)]
pub struct HttpTaskStore {
    client: Client,
    tasks_url: String,
}

impl HttpTaskStore {
    /// Builds a client with the configured connect and request timeouts.
    pub fn new(config: &StoreConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        let tasks_url = format!("{}{}", base_url.trim_end_matches('/'), TASKS_PATH);
        Self { client, tasks_url }
    }

    pub fn tasks_url(&self) -> &str {
        &self.tasks_url
    }
}

fn require_credential(credential: &Credential) -> Result<&str, TaskViewError> {
    if credential.is_blank() {
        return Err(TaskViewError::MissingCredential);
    }
    Ok(credential.as_str().trim())
}

fn transport_cause(error: &reqwest::Error) -> FailureCause {
    FailureCause::Transport { message: error.to_string(), timed_out: error.is_timeout() }
}

fn logged(method: &str, url: &str, cause: FailureCause) -> FailureCause {
    warn!(%method, %url, %cause, "Task store request failed");
    cause
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

/// Splits a response into its body bytes, or the cause of a non-2xx status.
async fn read_success_body(response: Response) -> Result<Vec<u8>, FailureCause> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error response body".to_string());
        return Err(FailureCause::Status { status: status.as_u16(), body: truncate_body(&body) });
    }
    response.bytes().await.map(|b| b.to_vec()).map_err(|e| transport_cause(&e))
}

fn decode_tasks(body: &[u8]) -> Result<Vec<Task>, FailureCause> {
    let tasks: Vec<Task> = serde_json::from_slice(body).map_err(|e| FailureCause::Decode(e.to_string()))?;
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(task.id) {
            return Err(FailureCause::Decode(format!("duplicate task id {}", task.id)));
        }
    }
    Ok(tasks)
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn fetch_tasks(&self, credential: &Credential) -> Result<Vec<Task>, TaskViewError> {
        let token = require_credential(credential)?;
        debug!(url = %self.tasks_url, "Fetching tasks");

        let response = self
            .client
            .get(&self.tasks_url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| TaskViewError::FetchFailed(logged("GET", &self.tasks_url, transport_cause(&e))))?;

        let tasks = match read_success_body(response).await {
            Ok(body) => decode_tasks(&body),
            Err(cause) => Err(cause),
        }
        .map_err(|cause| TaskViewError::FetchFailed(logged("GET", &self.tasks_url, cause)))?;

        debug!(count = tasks.len(), "Fetched tasks");
        Ok(tasks)
    }

    async fn create_task(&self, credential: &Credential, draft: &TaskDraft) -> Result<Task, TaskViewError> {
        let token = require_credential(credential)?;
        debug!(url = %self.tasks_url, title = %draft.title, "Creating task");

        let response = self
            .client
            .post(&self.tasks_url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .bearer_auth(token)
            .json(draft)
            .send()
            .await
            .map_err(|e| TaskViewError::CreateFailed(logged("POST", &self.tasks_url, transport_cause(&e))))?;

        let task = match read_success_body(response).await {
            Ok(body) => serde_json::from_slice::<Task>(&body).map_err(|e| FailureCause::Decode(e.to_string())),
            Err(cause) => Err(cause),
        }
        .map_err(|cause| TaskViewError::CreateFailed(logged("POST", &self.tasks_url, cause)))?;

        info!(task_id = %task.id, owner = %task.owner_id, "Task created");
        Ok(task)
    }
}
