//! Task aggregate root and the lifecycle state machine.

use super::{Bid, BidId, Budget, ParseTaskStateError, ParseUrgencyError, TaskDomainError, TaskId};
use crate::identity::domain::IdentityId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle state.
///
/// The legacy booking flow and the bid-assignment flow share one
/// enumeration: booking moves an open task to `pending`, assignment moves
/// it to `assigned`, and both converge on `accepted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Task is posted and accepting bids.
    Open,
    /// A provider has been booked and must still accept.
    Pending,
    /// A bid has been assigned and the provider must still accept.
    Assigned,
    /// The provider has accepted the engagement.
    Accepted,
    /// The engagement has been moved to a new time.
    Rescheduled,
    /// Work is underway.
    InProgress,
    /// The engagement finished successfully.
    Completed,
    /// The engagement was called off.
    Cancelled,
}

impl TaskState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::Accepted => "accepted",
            Self::Rescheduled => "rescheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Pending | Self::Assigned | Self::Cancelled)
                | (
                    Self::Pending,
                    Self::Accepted | Self::Rescheduled | Self::Cancelled
                )
                | (
                    Self::Assigned,
                    Self::Accepted
                        | Self::InProgress
                        | Self::Rescheduled
                        | Self::Completed
                        | Self::Cancelled
                )
                | (
                    Self::Accepted,
                    Self::InProgress | Self::Rescheduled | Self::Completed | Self::Cancelled
                )
                | (
                    Self::Rescheduled,
                    Self::Accepted | Self::InProgress | Self::Cancelled
                )
                | (Self::InProgress, Self::Completed | Self::Cancelled)
        )
    }

    /// Returns whether this state admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Hyphenated spellings appear in legacy payloads.
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "pending" => Ok(Self::Pending),
            "assigned" => Ok(Self::Assigned),
            "accepted" => Ok(Self::Accepted),
            "rescheduled" => Ok(Self::Rescheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

/// Urgency of a posted task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Whenever convenient.
    Low,
    /// Ordinary scheduling.
    #[default]
    Medium,
    /// Prioritised scheduling.
    High,
    /// Immediate attention.
    Urgent,
}

impl Urgency {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Urgency {
    type Error = ParseUrgencyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseUrgencyError(value.to_owned())),
        }
    }
}

/// Parameter object for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Posting client.
    pub client: IdentityId,
    /// Short task title.
    pub title: String,
    /// Detailed description of the work.
    pub description: String,
    /// Free-text category.
    pub category: String,
    /// Free-text location or coordinate string.
    pub location: String,
    /// Offered budget.
    pub budget: Budget,
    /// Requested schedule.
    pub scheduled_at: DateTime<Utc>,
    /// Skills the work calls for.
    pub skills_required: Vec<String>,
    /// Scheduling urgency.
    pub urgency: Urgency,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    category: String,
    location: String,
    client: IdentityId,
    provider: Option<IdentityId>,
    budget: Budget,
    scheduled_at: DateTime<Utc>,
    skills_required: Vec<String>,
    urgency: Urgency,
    bids: Vec<Bid>,
    state: TaskState,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted category.
    pub category: String,
    /// Persisted location.
    pub location: String,
    /// Persisted posting client.
    pub client: IdentityId,
    /// Persisted assigned provider, if any.
    pub provider: Option<IdentityId>,
    /// Persisted budget.
    pub budget: Budget,
    /// Persisted schedule.
    pub scheduled_at: DateTime<Utc>,
    /// Persisted skill requirements.
    pub skills_required: Vec<String>,
    /// Persisted urgency.
    pub urgency: Urgency,
    /// Persisted bid list.
    pub bids: Vec<Bid>,
    /// Persisted lifecycle state.
    pub state: TaskState,
    /// Persisted optimistic-concurrency version.
    pub version: u64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new open task from a draft.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskDomainError`] when any required text field is empty
    /// after trimming.
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = required_text(draft.title, TaskDomainError::EmptyTitle)?;
        let description = required_text(draft.description, TaskDomainError::EmptyDescription)?;
        let category = required_text(draft.category, TaskDomainError::EmptyCategory)?;
        let location = required_text(draft.location, TaskDomainError::EmptyLocation)?;
        let skills_required = draft
            .skills_required
            .into_iter()
            .map(|skill| required_text(skill, TaskDomainError::EmptySkillRequirement))
            .collect::<Result<Vec<_>, _>>()?;

        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title,
            description,
            category,
            location,
            client: draft.client,
            provider: None,
            budget: draft.budget,
            scheduled_at: draft.scheduled_at,
            skills_required,
            urgency: draft.urgency,
            bids: Vec::new(),
            state: TaskState::Open,
            version: 1,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            category: data.category,
            location: data.location,
            client: data.client,
            provider: data.provider,
            budget: data.budget,
            scheduled_at: data.scheduled_at,
            skills_required: data.skills_required,
            urgency: data.urgency,
            bids: data.bids,
            state: data.state,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the free-text category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the free-text location.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the posting client.
    #[must_use]
    pub const fn client(&self) -> IdentityId {
        self.client
    }

    /// Returns the assigned provider, if any.
    #[must_use]
    pub const fn provider(&self) -> Option<IdentityId> {
        self.provider
    }

    /// Returns the offered budget.
    #[must_use]
    pub const fn budget(&self) -> Budget {
        self.budget
    }

    /// Returns the requested schedule.
    #[must_use]
    pub const fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    /// Returns the skill requirements.
    #[must_use]
    pub fn skills_required(&self) -> &[String] {
        &self.skills_required
    }

    /// Returns the scheduling urgency.
    #[must_use]
    pub const fn urgency(&self) -> Urgency {
        self.urgency
    }

    /// Returns the ordered bid list.
    #[must_use]
    pub fn bids(&self) -> &[Bid] {
        &self.bids
    }

    /// Returns the bid with the given identifier, if present.
    #[must_use]
    pub fn find_bid(&self, bid_id: BidId) -> Option<&Bid> {
        self.bids.iter().find(|bid| bid.id() == bid_id)
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the optimistic-concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Appends a bid to the bidder list.
    ///
    /// No state transition occurs; tasks accept bids only while open.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::BiddingClosed`] once the task has left the
    /// open state, [`TaskDomainError::OwnTaskBid`] when the posting client
    /// bids on their own task, and [`TaskDomainError::DuplicateBid`] when
    /// the bidder already has an entry.
    pub fn submit_bid(&mut self, bid: Bid, clock: &impl Clock) -> Result<BidId, TaskDomainError> {
        if self.state != TaskState::Open {
            return Err(TaskDomainError::BiddingClosed {
                task_id: self.id,
                state: self.state,
            });
        }
        if bid.bidder() == self.client {
            return Err(TaskDomainError::OwnTaskBid { task_id: self.id });
        }
        if self.bids.iter().any(|entry| entry.bidder() == bid.bidder()) {
            return Err(TaskDomainError::DuplicateBid {
                task_id: self.id,
                bidder: bid.bidder(),
            });
        }

        let bid_id = bid.id();
        self.bids.push(bid);
        self.touch(clock);
        Ok(bid_id)
    }

    /// Books a provider directly (legacy flow) and moves the task to
    /// `pending`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotTaskClient`] when the actor is not the
    /// posting client or [`TaskDomainError::InvalidStateTransition`] when
    /// the task is not open.
    pub fn book(
        &mut self,
        actor: IdentityId,
        provider: IdentityId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_client(actor)?;
        self.transition_to(TaskState::Pending)?;
        self.provider = Some(provider);
        self.touch(clock);
        Ok(())
    }

    /// Assigns the provider from an existing bid and moves the task to
    /// `assigned`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotTaskClient`] when the actor is not the
    /// posting client, [`TaskDomainError::UnknownBid`] when the bid does
    /// not resolve, or [`TaskDomainError::InvalidStateTransition`] when the
    /// task is not open.
    pub fn assign_bid(
        &mut self,
        actor: IdentityId,
        bid_id: BidId,
        clock: &impl Clock,
    ) -> Result<IdentityId, TaskDomainError> {
        self.ensure_client(actor)?;
        let bidder = self
            .find_bid(bid_id)
            .map(Bid::bidder)
            .ok_or(TaskDomainError::UnknownBid {
                task_id: self.id,
                bid_id,
            })?;

        self.transition_to(TaskState::Assigned)?;
        self.provider = Some(bidder);
        self.touch(clock);
        Ok(bidder)
    }

    /// Accepts the engagement on behalf of the assigned provider.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignedProvider`] when the actor is
    /// not the assigned provider or
    /// [`TaskDomainError::InvalidStateTransition`] when acceptance is not
    /// reachable from the current state.
    pub fn accept(&mut self, actor: IdentityId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_assigned_provider(actor)?;
        self.transition_to(TaskState::Accepted)?;
        self.touch(clock);
        Ok(())
    }

    /// Applies a provider-driven status update.
    ///
    /// Only `in_progress`, `rescheduled`, and `cancelled` may be set this
    /// way; completion goes through [`Task::complete`] so its side effects
    /// fire.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignedProvider`] when the actor is
    /// not the assigned provider, [`TaskDomainError::StatusUpdateNotAllowed`]
    /// for states outside the provider-settable set, or
    /// [`TaskDomainError::InvalidStateTransition`] for illegal transitions.
    pub fn update_status(
        &mut self,
        actor: IdentityId,
        target: TaskState,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_assigned_provider(actor)?;
        if !matches!(
            target,
            TaskState::InProgress | TaskState::Rescheduled | TaskState::Cancelled
        ) {
            return Err(TaskDomainError::StatusUpdateNotAllowed { target });
        }
        self.transition_to(target)?;
        self.touch(clock);
        Ok(())
    }

    /// Marks the engagement as completed.
    ///
    /// Either participant may complete. Completion is terminal, so calling
    /// this twice fails the transition and keeps the points side effect
    /// exactly-once.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotParticipant`] when the actor is
    /// neither the client nor the provider,
    /// [`TaskDomainError::ProviderNotAssigned`] when no provider is set, or
    /// [`TaskDomainError::InvalidStateTransition`] when completion is not
    /// reachable from the current state.
    pub fn complete(
        &mut self,
        actor: IdentityId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_participant(actor)?;
        if self.provider.is_none() {
            return Err(TaskDomainError::ProviderNotAssigned(self.id));
        }
        self.transition_to(TaskState::Completed)?;
        self.touch(clock);
        Ok(())
    }

    /// Calls the engagement off.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotParticipant`] when the actor is
    /// neither the client nor the provider or
    /// [`TaskDomainError::InvalidStateTransition`] when the task is already
    /// terminal.
    pub fn cancel(&mut self, actor: IdentityId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_participant(actor)?;
        self.transition_to(TaskState::Cancelled)?;
        self.touch(clock);
        Ok(())
    }

    /// Increments the optimistic-concurrency version after a successful
    /// repository write.
    pub(crate) fn bump_version(&mut self) {
        self.version = self.version.saturating_add(1);
    }

    fn ensure_client(&self, actor: IdentityId) -> Result<(), TaskDomainError> {
        if actor != self.client {
            return Err(TaskDomainError::NotTaskClient {
                task_id: self.id,
                actor,
            });
        }
        Ok(())
    }

    fn ensure_assigned_provider(&self, actor: IdentityId) -> Result<(), TaskDomainError> {
        match self.provider {
            Some(provider) if provider == actor => Ok(()),
            Some(_) => Err(TaskDomainError::NotAssignedProvider {
                task_id: self.id,
                actor,
            }),
            None => Err(TaskDomainError::ProviderNotAssigned(self.id)),
        }
    }

    fn ensure_participant(&self, actor: IdentityId) -> Result<(), TaskDomainError> {
        if actor == self.client || self.provider == Some(actor) {
            return Ok(());
        }
        Err(TaskDomainError::NotParticipant {
            task_id: self.id,
            actor,
        })
    }

    fn transition_to(&mut self, target: TaskState) -> Result<(), TaskDomainError> {
        if !self.state.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Trims a required text field, rejecting empty values with the given
/// error.
fn required_text(value: String, empty_error: TaskDomainError) -> Result<String, TaskDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(empty_error);
    }
    Ok(trimmed.to_owned())
}
