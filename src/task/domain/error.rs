//! Error types for task domain validation and parsing.

use super::{BidId, TaskId, TaskState};
use crate::fault::{Fault, FaultKind};
use crate::identity::domain::IdentityId;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The task category is empty after trimming.
    #[error("task category must not be empty")]
    EmptyCategory,

    /// The task location is empty after trimming.
    #[error("task location must not be empty")]
    EmptyLocation,

    /// A required-skill entry is empty after trimming.
    #[error("required skills must not be empty")]
    EmptySkillRequirement,

    /// The budget is zero or negative.
    #[error("budget {0} must be a positive amount in minor units")]
    InvalidBudget(i64),

    /// A bid proposal is present but empty after trimming.
    #[error("bid proposal must not be empty when supplied")]
    EmptyProposal,

    /// The requested status change is not a legal transition.
    #[error("task {task_id} cannot transition from {from} to {to}")]
    InvalidStateTransition {
        /// Task being transitioned.
        task_id: TaskId,
        /// Current lifecycle state.
        from: TaskState,
        /// Requested lifecycle state.
        to: TaskState,
    },

    /// Bids are only accepted while a task is open.
    #[error("task {task_id} no longer accepts bids in state {state}")]
    BiddingClosed {
        /// Task being bid on.
        task_id: TaskId,
        /// Current lifecycle state.
        state: TaskState,
    },

    /// A client attempted to bid on their own task.
    #[error("the posting client cannot bid on task {task_id}")]
    OwnTaskBid {
        /// Task being bid on.
        task_id: TaskId,
    },

    /// The bidder already has a bid on this task.
    #[error("identity {bidder} already has a bid on task {task_id}")]
    DuplicateBid {
        /// Task being bid on.
        task_id: TaskId,
        /// Identity submitting the duplicate bid.
        bidder: IdentityId,
    },

    /// The referenced bid does not exist on this task.
    #[error("bid {bid_id} not found on task {task_id}")]
    UnknownBid {
        /// Task being assigned.
        task_id: TaskId,
        /// Unresolved bid identifier.
        bid_id: BidId,
    },

    /// The acting identity is not the posting client.
    #[error("identity {actor} is not the client of task {task_id}")]
    NotTaskClient {
        /// Task being acted on.
        task_id: TaskId,
        /// Acting identity.
        actor: IdentityId,
    },

    /// The acting identity is not the assigned provider.
    #[error("identity {actor} is not the assigned provider of task {task_id}")]
    NotAssignedProvider {
        /// Task being acted on.
        task_id: TaskId,
        /// Acting identity.
        actor: IdentityId,
    },

    /// The acting identity is neither the client nor the provider.
    #[error("identity {actor} is not a participant of task {task_id}")]
    NotParticipant {
        /// Task being acted on.
        task_id: TaskId,
        /// Acting identity.
        actor: IdentityId,
    },

    /// The operation requires an assigned provider.
    #[error("task {0} has no assigned provider")]
    ProviderNotAssigned(TaskId),

    /// The target state is not reachable through a provider status update.
    #[error("status {target} cannot be set through a provider status update")]
    StatusUpdateNotAllowed {
        /// Requested lifecycle state.
        target: TaskState,
    },
}

impl Fault for TaskDomainError {
    fn fault_kind(&self) -> FaultKind {
        match self {
            Self::NotTaskClient { .. }
            | Self::NotAssignedProvider { .. }
            | Self::NotParticipant { .. } => FaultKind::Forbidden,
            Self::UnknownBid { .. } => FaultKind::NotFound,
            Self::DuplicateBid { .. } => FaultKind::Conflict,
            _ => FaultKind::Validation,
        }
    }
}

/// Error returned while parsing task states from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);

/// Error returned while parsing urgency levels from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown urgency level: {0}")]
pub struct ParseUrgencyError(pub String);
