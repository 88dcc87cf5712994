//! Repository port for task persistence, lookup, and filtered listing.

use crate::fault::{Fault, FaultKind};
use crate::identity::domain::IdentityId;
use crate::task::domain::{Task, TaskId, TaskState, Urgency};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Filter set for task listings.
///
/// All filters are conjunctive; an empty query matches every task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    state: Option<TaskState>,
    category: Option<String>,
    urgency: Option<Urgency>,
    client: Option<IdentityId>,
    provider: Option<IdentityId>,
}

impl TaskQuery {
    /// Creates an empty query matching every task.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: None,
            category: None,
            urgency: None,
            client: None,
            provider: None,
        }
    }

    /// Restricts results to one lifecycle state.
    #[must_use]
    pub const fn with_state(mut self, state: TaskState) -> Self {
        self.state = Some(state);
        self
    }

    /// Restricts results to one category (case-insensitive match).
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts results to one urgency level.
    #[must_use]
    pub const fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }

    /// Restricts results to tasks posted by one client.
    #[must_use]
    pub const fn with_client(mut self, client: IdentityId) -> Self {
        self.client = Some(client);
        self
    }

    /// Restricts results to tasks assigned to one provider.
    #[must_use]
    pub const fn with_provider(mut self, provider: IdentityId) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Returns the state filter.
    #[must_use]
    pub const fn state(&self) -> Option<TaskState> {
        self.state
    }

    /// Returns the category filter.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns the urgency filter.
    #[must_use]
    pub const fn urgency(&self) -> Option<Urgency> {
        self.urgency
    }

    /// Returns the client filter.
    #[must_use]
    pub const fn client(&self) -> Option<IdentityId> {
        self.client
    }

    /// Returns the provider filter.
    #[must_use]
    pub const fn provider(&self) -> Option<IdentityId> {
        self.provider
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// The write is version-checked: the caller's aggregate must carry the
    /// version it was loaded at. On success the stored version increments
    /// and the updated aggregate is returned.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist and [`TaskRepositoryError::VersionConflict`] when another
    /// write landed since the caller loaded the task.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns tasks matching the query, newest first.
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The write lost an optimistic-concurrency race.
    #[error("stale write on task {task_id}: expected version {expected}, found {actual}")]
    VersionConflict {
        /// Task being written.
        task_id: TaskId,
        /// Version the caller loaded.
        expected: u64,
        /// Version found in storage.
        actual: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Fault for TaskRepositoryError {
    fn fault_kind(&self) -> FaultKind {
        match self {
            Self::DuplicateTask(_) | Self::VersionConflict { .. } => FaultKind::Conflict,
            Self::NotFound(_) => FaultKind::NotFound,
            Self::Persistence(_) => FaultKind::Internal,
        }
    }
}
