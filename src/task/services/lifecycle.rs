//! Service layer for the task lifecycle: creation, bidding, assignment,
//! acceptance, progress, and completion with its points side effect.

use crate::fault::{Fault, FaultKind};
use crate::identity::{
    domain::{IdentityId, Role},
    ports::{IdentityRepository, IdentityRepositoryError, PointsCredit},
};
use crate::task::{
    domain::{
        Bid, BidId, BidOffer, Budget, ParseTaskStateError, ParseUrgencyError, Task,
        TaskDomainError, TaskDraft, TaskId, TaskState, Urgency,
    },
    ports::{TaskQuery, TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Points credited to the posting client when an engagement completes.
pub const CLIENT_COMPLETION_AWARD: u32 = 10;

/// Points credited to the assigned provider when an engagement completes.
pub const PROVIDER_COMPLETION_AWARD: u32 = 20;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    client: IdentityId,
    title: String,
    description: String,
    category: String,
    location: String,
    budget_minor: i64,
    scheduled_at: DateTime<Utc>,
    skills_required: Vec<String>,
    urgency: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        client: IdentityId,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        location: impl Into<String>,
        budget_minor: i64,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            client,
            title: title.into(),
            description: description.into(),
            category: category.into(),
            location: location.into(),
            budget_minor,
            scheduled_at,
            skills_required: Vec::new(),
            urgency: None,
        }
    }

    /// Sets the skill requirements.
    #[must_use]
    pub fn with_skills(mut self, skills: impl IntoIterator<Item = String>) -> Self {
        self.skills_required = skills.into_iter().collect();
        self
    }

    /// Sets the urgency level (defaults to `medium` when absent).
    #[must_use]
    pub fn with_urgency(mut self, urgency: impl Into<String>) -> Self {
        self.urgency = Some(urgency.into());
        self
    }
}

/// Request payload for submitting a bid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitBidRequest {
    task_id: TaskId,
    bidder: IdentityId,
    amount_minor: Option<i64>,
    proposal: Option<String>,
    estimated_hours: Option<u32>,
}

impl SubmitBidRequest {
    /// Creates a bare expression-of-interest bid request.
    #[must_use]
    pub const fn new(task_id: TaskId, bidder: IdentityId) -> Self {
        Self {
            task_id,
            bidder,
            amount_minor: None,
            proposal: None,
            estimated_hours: None,
        }
    }

    /// Sets the offered price in minor currency units.
    #[must_use]
    pub const fn with_amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    /// Sets the proposal text.
    #[must_use]
    pub fn with_proposal(mut self, proposal: impl Into<String>) -> Self {
        self.proposal = Some(proposal.into());
        self
    }

    /// Sets the estimated duration in hours.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: u32) -> Self {
        self.estimated_hours = Some(hours);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or authorisation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The status value is not a known lifecycle state.
    #[error(transparent)]
    InvalidState(#[from] ParseTaskStateError),
    /// The urgency value is not a known level.
    #[error(transparent)]
    InvalidUrgency(#[from] ParseUrgencyError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Identity repository operation failed.
    #[error(transparent)]
    Identity(#[from] IdentityRepositoryError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// No identity exists with the given identifier.
    #[error("identity {0} not found")]
    IdentityNotFound(IdentityId),
    /// The operation requires the client role.
    #[error("identity {0} must hold the client role for this operation")]
    ClientRoleRequired(IdentityId),
    /// The operation requires the provider role.
    #[error("identity {0} must hold the provider role for this operation")]
    ProviderRoleRequired(IdentityId),
    /// The task completed but the points award did not land.
    ///
    /// The completion itself is durable; the award can be retried through
    /// the points ledger once the underlying failure clears.
    #[error("task {task_id} completed but the points award failed: {source}")]
    CompletionAwardFailed {
        /// Completed task.
        task_id: TaskId,
        /// Failure reported by the identity repository.
        source: IdentityRepositoryError,
    },
}

impl Fault for TaskLifecycleError {
    fn fault_kind(&self) -> FaultKind {
        match self {
            Self::Domain(err) => err.fault_kind(),
            Self::InvalidState(_) | Self::InvalidUrgency(_) => FaultKind::Validation,
            Self::Repository(err) => err.fault_kind(),
            Self::Identity(err) => err.fault_kind(),
            Self::TaskNotFound(_) | Self::IdentityNotFound(_) => FaultKind::NotFound,
            Self::ClientRoleRequired(_) | Self::ProviderRoleRequired(_) => FaultKind::Forbidden,
            Self::CompletionAwardFailed { .. } => FaultKind::Internal,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<T, I, C>
where
    T: TaskRepository,
    I: IdentityRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    identities: Arc<I>,
    clock: Arc<C>,
}

impl<T, I, C> TaskLifecycleService<T, I, C>
where
    T: TaskRepository,
    I: IdentityRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, identities: Arc<I>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            identities,
            clock,
        }
    }

    async fn find_task_or_error(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }

    async fn find_identity_role(
        &self,
        identity_id: IdentityId,
    ) -> TaskLifecycleResult<Role> {
        let identity = self
            .identities
            .find_by_id(identity_id)
            .await?
            .ok_or(TaskLifecycleError::IdentityNotFound(identity_id))?;
        Ok(identity.role())
    }

    /// Creates a new open task for a client.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the client does not resolve or
    /// does not hold the client role, any required field fails validation,
    /// or persistence rejects the record.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let role = self.find_identity_role(request.client).await?;
        if role != Role::Client {
            return Err(TaskLifecycleError::ClientRoleRequired(request.client));
        }

        let urgency = match request.urgency.as_deref() {
            Some(value) => Urgency::try_from(value)?,
            None => Urgency::default(),
        };
        let budget = Budget::from_minor_units(request.budget_minor)?;

        let draft = TaskDraft {
            client: request.client,
            title: request.title,
            description: request.description,
            category: request.category,
            location: request.location,
            budget,
            scheduled_at: request.scheduled_at,
            skills_required: request.skills_required,
            urgency,
        };
        let task = Task::new(draft, &*self.clock)?;
        self.tasks.store(&task).await?;
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn get(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.find_task_or_error(task_id).await
    }

    /// Returns tasks matching the query, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the listing fails.
    pub async fn list(&self, query: &TaskQuery) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.list(query).await?)
    }

    /// Appends a bid from an authenticated identity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task or bidder does not
    /// resolve, the bid violates the bidding rules, or the write loses a
    /// version race.
    pub async fn submit_bid(&self, request: SubmitBidRequest) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(request.task_id).await?;
        // Resolve the bidder so unregistered identities cannot enter the
        // bidder list.
        let _ = self.find_identity_role(request.bidder).await?;

        let mut offer = BidOffer::new();
        if let Some(amount_minor) = request.amount_minor {
            offer = offer.with_amount(Budget::from_minor_units(amount_minor)?);
        }
        if let Some(proposal) = request.proposal {
            offer = offer.with_proposal(proposal);
        }
        if let Some(hours) = request.estimated_hours {
            offer = offer.with_estimated_hours(hours);
        }

        let bid = Bid::new(request.bidder, offer, &*self.clock)?;
        task.submit_bid(bid, &*self.clock)?;
        Ok(self.tasks.update(&task).await?)
    }

    /// Books a provider directly (legacy flow), moving the task to
    /// `pending`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task or provider does not
    /// resolve, the provider does not hold the provider role, the actor is
    /// not the posting client, or the transition is illegal.
    pub async fn book(
        &self,
        task_id: TaskId,
        actor: IdentityId,
        provider: IdentityId,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        let role = self.find_identity_role(provider).await?;
        if role != Role::Provider {
            return Err(TaskLifecycleError::ProviderRoleRequired(provider));
        }

        task.book(actor, provider, &*self.clock)?;
        Ok(self.tasks.update(&task).await?)
    }

    /// Assigns the provider from an existing bid, moving the task to
    /// `assigned`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task or bid does not
    /// resolve, the actor is not the posting client, or the transition is
    /// illegal.
    pub async fn assign_bid(
        &self,
        task_id: TaskId,
        actor: IdentityId,
        bid_id: BidId,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        task.assign_bid(actor, bid_id, &*self.clock)?;
        Ok(self.tasks.update(&task).await?)
    }

    /// Accepts the engagement on behalf of the assigned provider.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task does not resolve, the
    /// actor is not the assigned provider, or the transition is illegal.
    pub async fn accept(&self, task_id: TaskId, actor: IdentityId) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        task.accept(actor, &*self.clock)?;
        Ok(self.tasks.update(&task).await?)
    }

    /// Applies a provider-driven status update against the transition
    /// table.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the status value is unknown, the
    /// actor is not the assigned provider, or the transition is illegal.
    pub async fn update_status(
        &self,
        task_id: TaskId,
        actor: IdentityId,
        status: &str,
    ) -> TaskLifecycleResult<Task> {
        let target = TaskState::try_from(status)?;
        let mut task = self.find_task_or_error(task_id).await?;
        task.update_status(actor, target, &*self.clock)?;
        Ok(self.tasks.update(&task).await?)
    }

    /// Cancels the engagement on behalf of either participant.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task does not resolve, the
    /// actor is not a participant, or the task is already terminal.
    pub async fn cancel(&self, task_id: TaskId, actor: IdentityId) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        task.cancel(actor, &*self.clock)?;
        Ok(self.tasks.update(&task).await?)
    }

    /// Completes the engagement and awards points to both participants.
    ///
    /// The completed task is persisted first; the award (client
    /// [`CLIENT_COMPLETION_AWARD`], provider [`PROVIDER_COMPLETION_AWARD`])
    /// is then applied as one atomic credit batch. Because `completed` is a
    /// terminal state, re-completing fails and the award cannot double-pay.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::CompletionAwardFailed`] when the task
    /// completed durably but the credit batch failed; other
    /// [`TaskLifecycleError`] values cover unresolved references, actors
    /// outside the engagement, and illegal transitions.
    pub async fn complete(&self, task_id: TaskId, actor: IdentityId) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        task.complete(actor, &*self.clock)?;
        let updated = self.tasks.update(&task).await?;

        let provider = updated
            .provider()
            .ok_or(TaskDomainError::ProviderNotAssigned(task_id))?;
        let credits = [
            PointsCredit::new(updated.client(), CLIENT_COMPLETION_AWARD),
            PointsCredit::new(provider, PROVIDER_COMPLETION_AWARD),
        ];
        if let Err(source) = self.identities.credit_all(&credits, self.clock.utc()).await {
            return Err(TaskLifecycleError::CompletionAwardFailed { task_id, source });
        }
        Ok(updated)
    }
}
