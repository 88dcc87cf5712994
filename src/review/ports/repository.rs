//! Repository port for review persistence and lookup.

use crate::fault::{Fault, FaultKind};
use crate::identity::domain::IdentityId;
use crate::review::domain::{Review, ReviewId};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for review repository operations.
pub type ReviewRepositoryResult<T> = Result<T, ReviewRepositoryError>;

/// Review persistence contract.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Stores a new review.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewRepositoryError::DuplicateReview`] when the review
    /// ID already exists or
    /// [`ReviewRepositoryError::DuplicateTaskReviewer`] when the reviewer
    /// already reviewed the task.
    async fn store(&self, review: &Review) -> ReviewRepositoryResult<()>;

    /// Finds a review by identifier.
    ///
    /// Returns `None` when the review does not exist.
    async fn find_by_id(&self, id: ReviewId) -> ReviewRepositoryResult<Option<Review>>;

    /// Returns all reviews left on the given task.
    async fn find_by_task(&self, task_id: TaskId) -> ReviewRepositoryResult<Vec<Review>>;

    /// Returns all reviews received by the given identity, newest first.
    async fn find_by_reviewee(
        &self,
        reviewee: IdentityId,
    ) -> ReviewRepositoryResult<Vec<Review>>;
}

/// Errors returned by review repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReviewRepositoryError {
    /// A review with the same identifier already exists.
    #[error("duplicate review identifier: {0}")]
    DuplicateReview(ReviewId),

    /// The reviewer already reviewed this task.
    #[error("identity {reviewer} already reviewed task {task_id}")]
    DuplicateTaskReviewer {
        /// Task being reviewed.
        task_id: TaskId,
        /// Reviewer with an existing review.
        reviewer: IdentityId,
    },

    /// The review was not found.
    #[error("review not found: {0}")]
    NotFound(ReviewId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReviewRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Fault for ReviewRepositoryError {
    fn fault_kind(&self) -> FaultKind {
        match self {
            Self::DuplicateReview(_) | Self::DuplicateTaskReviewer { .. } => FaultKind::Conflict,
            Self::NotFound(_) => FaultKind::NotFound,
            Self::Persistence(_) => FaultKind::Internal,
        }
    }
}
