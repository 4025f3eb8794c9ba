use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, trace, warn};

use super::events::TaskViewEvent;
use super::types::{Operation, SurfacedError, TaskViewState, ViewPhase};
use crate::credentials::{Credential, CredentialSource};
use crate::derivation::{self, TaskRow};
use crate::error::TaskViewError;
use crate::identity;
use crate::store::TaskStore;
use crate::tasks::{FilterCriteria, Task, TaskDraft, UserId};

// --- TaskViewService Trait ---

#[async_trait]
pub trait TaskViewService: Send + Sync {
    /// First load of the view. Does nothing unless the view is still `Idle`.
    async fn mount(&self) -> Result<(), TaskViewError>;

    /// Re-fetches the collection regardless of phase.
    async fn refresh(&self) -> Result<(), TaskViewError>;

    /// Creates a task and, on success, re-fetches the collection.
    ///
    /// A failed create leaves the phase and the collection untouched. A failed
    /// re-fetch after a successful create is surfaced in the state, and the created
    /// task is still returned.
    async fn submit_task(&self, draft: TaskDraft) -> Result<Task, TaskViewError>;

    async fn snapshot(&self) -> TaskViewState;
    async fn filtered(&self, criteria: &FilterCriteria) -> Vec<Task>;
    async fn rows(&self, criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<TaskRow>;

    /// Identity asserted by the current credential, `None` when signed out.
    async fn current_identity(&self) -> Result<Option<UserId>, TaskViewError>;

    async fn outstanding_for(&self, identity: Option<&UserId>) -> usize;
    async fn outstanding_for_current_user(&self) -> Result<usize, TaskViewError>;
    async fn outstanding_by_owner(&self) -> BTreeMap<UserId, usize>;

    fn subscribe(&self) -> broadcast::Receiver<TaskViewEvent>;
}

// --- DefaultTaskViewService Implementation ---

pub struct DefaultTaskViewService {
    store: Arc<dyn TaskStore>,
    credentials: Arc<dyn CredentialSource>,
    state: Arc<RwLock<TaskViewState>>,
    /// Serializes mount, refresh and submit; tokio's mutex queues waiters in order.
    sync_lock: Mutex<()>,
    event_sender: broadcast::Sender<TaskViewEvent>,
}

impl DefaultTaskViewService {
    pub fn new(
        store: Arc<dyn TaskStore>,
        credentials: Arc<dyn CredentialSource>,
        broadcast_capacity: usize,
    ) -> Self {
        let (event_sender, _) = broadcast::channel(broadcast_capacity.max(1));
        Self {
            store,
            credentials,
            state: Arc::new(RwLock::new(TaskViewState::default())),
            sync_lock: Mutex::new(()),
            event_sender,
        }
    }

    fn publish(&self, event: TaskViewEvent) {
        if let Err(e) = self.event_sender.send(event) {
            trace!("No subscriber for task view event: {:?}", e.0);
        }
    }

    async fn transition(&self, to: ViewPhase) {
        let from = {
            let mut state = self.state.write().await;
            std::mem::replace(&mut state.phase, to)
        };
        if from != to {
            debug!(%from, %to, "Task view phase changed");
            self.publish(TaskViewEvent::PhaseChanged { from, to });
        }
    }

    async fn surface(&self, operation: Operation, error: TaskViewError) {
        warn!(%operation, %error, "Task view operation failed");
        let surfaced = SurfacedError { operation, error, at: Utc::now() };
        self.state.write().await.last_error = Some(surfaced.clone());
        self.publish(TaskViewEvent::ErrorSurfaced(surfaced));
    }

    async fn require_credential(&self) -> Result<Credential, TaskViewError> {
        self.credentials.load_credential().await?.ok_or(TaskViewError::MissingCredential)
    }

    /// Caller must hold `sync_lock`.
    async fn fetch_locked(&self) -> Result<(), TaskViewError> {
        self.transition(ViewPhase::Loading).await;

        let result = match self.require_credential().await {
            Ok(credential) => self.store.fetch_tasks(&credential).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(tasks) => {
                let count = tasks.len();
                {
                    let mut state = self.state.write().await;
                    state.tasks = tasks;
                    state.last_error = None;
                    state.last_loaded_at = Some(Utc::now());
                }
                self.transition(ViewPhase::Loaded).await;
                self.publish(TaskViewEvent::TasksReplaced { count });
                info!(count, "Task collection loaded");
                Ok(())
            }
            Err(error) => {
                self.surface(Operation::Fetch, error.clone()).await;
                self.transition(ViewPhase::Error).await;
                Err(error)
            }
        }
    }

    async fn create_locked(&self, draft: &TaskDraft) -> Result<Task, TaskViewError> {
        draft.validate()?;
        let credential = self.require_credential().await?;
        self.store.create_task(&credential, draft).await
    }
}

#[async_trait]
impl TaskViewService for DefaultTaskViewService {
    async fn mount(&self) -> Result<(), TaskViewError> {
        let _guard = self.sync_lock.lock().await;
        let phase = self.state.read().await.phase;
        if phase != ViewPhase::Idle {
            debug!(%phase, "Task view already mounted, skipping initial fetch");
            return Ok(());
        }
        self.fetch_locked().await
    }

    async fn refresh(&self) -> Result<(), TaskViewError> {
        let _guard = self.sync_lock.lock().await;
        self.fetch_locked().await
    }

    async fn submit_task(&self, draft: TaskDraft) -> Result<Task, TaskViewError> {
        let _guard = self.sync_lock.lock().await;
        debug!(title = %draft.title, "Submitting task draft");

        let created = match self.create_locked(&draft).await {
            Ok(task) => task,
            Err(error) => {
                self.surface(Operation::Create, error.clone()).await;
                return Err(error);
            }
        };

        self.publish(TaskViewEvent::TaskCreated { task: created.clone() });
        if let Err(e) = self.fetch_locked().await {
            warn!(task_id = %created.id, error = %e, "Task created but the collection could not be refreshed");
        }
        Ok(created)
    }

    async fn snapshot(&self) -> TaskViewState {
        self.state.read().await.clone()
    }

    async fn filtered(&self, criteria: &FilterCriteria) -> Vec<Task> {
        derivation::filtered_view(&self.state.read().await.tasks, criteria)
    }

    async fn rows(&self, criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<TaskRow> {
        derivation::task_rows(&self.state.read().await.tasks, criteria, now)
    }

    async fn current_identity(&self) -> Result<Option<UserId>, TaskViewError> {
        let credential = self.credentials.load_credential().await?;
        Ok(identity::extract_identity(credential.as_ref())?)
    }

    async fn outstanding_for(&self, identity: Option<&UserId>) -> usize {
        derivation::outstanding_count_for(&self.state.read().await.tasks, identity)
    }

    async fn outstanding_for_current_user(&self) -> Result<usize, TaskViewError> {
        let identity = self.current_identity().await?;
        Ok(self.outstanding_for(identity.as_ref()).await)
    }

    async fn outstanding_by_owner(&self) -> BTreeMap<UserId, usize> {
        derivation::outstanding_counts_by_owner(&self.state.read().await.tasks)
    }

    fn subscribe(&self) -> broadcast::Receiver<TaskViewEvent> {
        self.event_sender.subscribe()
    }
}
