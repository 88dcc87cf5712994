//! Service layer for creating reviews and recomputing reviewee ratings.

use crate::fault::{Fault, FaultKind};
use crate::identity::{
    domain::{IdentityDomainError, IdentityId},
    ports::{IdentityRepository, IdentityRepositoryError},
};
use crate::review::{
    domain::{Rating, Review, ReviewDomainError, ReviewId},
    ports::{ReviewRepository, ReviewRepositoryError},
};
use crate::task::{
    domain::{TaskId, TaskState},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReviewRequest {
    task_id: TaskId,
    reviewer: IdentityId,
    reviewee: IdentityId,
    rating: u8,
    comment: Option<String>,
}

impl CreateReviewRequest {
    /// Creates a review request without a comment.
    #[must_use]
    pub const fn new(
        task_id: TaskId,
        reviewer: IdentityId,
        reviewee: IdentityId,
        rating: u8,
    ) -> Self {
        Self {
            task_id,
            reviewer,
            reviewee,
            rating,
            comment: None,
        }
    }

    /// Sets the comment text.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Service-level errors for review operations.
#[derive(Debug, Error)]
pub enum ReviewServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ReviewDomainError),
    /// Updating the reviewee's statistics failed validation.
    #[error(transparent)]
    RevieweeStatistics(#[from] IdentityDomainError),
    /// Review repository operation failed.
    #[error(transparent)]
    Repository(#[from] ReviewRepositoryError),
    /// Task repository operation failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
    /// Identity repository operation failed.
    #[error(transparent)]
    Identity(#[from] IdentityRepositoryError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// No identity exists with the given identifier.
    #[error("identity {0} not found")]
    IdentityNotFound(IdentityId),
    /// No review exists with the given identifier.
    #[error("review {0} not found")]
    ReviewNotFound(ReviewId),
    /// Reviews require a completed task.
    #[error("task {0} is not completed")]
    TaskNotCompleted(TaskId),
    /// The reviewer did not take part in the task.
    #[error("identity {reviewer} is not a participant of task {task_id}")]
    ReviewerNotParticipant {
        /// Reviewed task.
        task_id: TaskId,
        /// Reviewer outside the engagement.
        reviewer: IdentityId,
    },
    /// The reviewee did not take part in the task.
    #[error("identity {reviewee} is not a participant of task {task_id}")]
    RevieweeNotParticipant {
        /// Reviewed task.
        task_id: TaskId,
        /// Reviewee outside the engagement.
        reviewee: IdentityId,
    },
}

impl Fault for ReviewServiceError {
    fn fault_kind(&self) -> FaultKind {
        match self {
            Self::Domain(_) | Self::RevieweeStatistics(_) | Self::RevieweeNotParticipant { .. } => {
                FaultKind::Validation
            }
            Self::Repository(err) => err.fault_kind(),
            Self::Task(err) => err.fault_kind(),
            Self::Identity(err) => err.fault_kind(),
            Self::TaskNotFound(_) | Self::IdentityNotFound(_) | Self::ReviewNotFound(_) => {
                FaultKind::NotFound
            }
            Self::TaskNotCompleted(_) => FaultKind::Conflict,
            Self::ReviewerNotParticipant { .. } => FaultKind::Forbidden,
        }
    }
}

/// Result type for review service operations.
pub type ReviewServiceResult<T> = Result<T, ReviewServiceError>;

/// Review orchestration service.
#[derive(Clone)]
pub struct ReviewService<R, T, I, C>
where
    R: ReviewRepository,
    T: TaskRepository,
    I: IdentityRepository,
    C: Clock + Send + Sync,
{
    reviews: Arc<R>,
    tasks: Arc<T>,
    identities: Arc<I>,
    clock: Arc<C>,
}

impl<R, T, I, C> ReviewService<R, T, I, C>
where
    R: ReviewRepository,
    T: TaskRepository,
    I: IdentityRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new review service.
    #[must_use]
    pub const fn new(reviews: Arc<R>, tasks: Arc<T>, identities: Arc<I>, clock: Arc<C>) -> Self {
        Self {
            reviews,
            tasks,
            identities,
            clock,
        }
    }

    /// Creates a review for a completed task and folds the rating into the
    /// reviewee's statistics.
    ///
    /// Both reviewer and reviewee must be participants of the task (the
    /// posting client and the assigned provider), the task must be
    /// completed, and each participant may review a task once.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError`] when any of those invariants fails,
    /// a reference does not resolve, or persistence rejects the record.
    pub async fn create(&self, request: CreateReviewRequest) -> ReviewServiceResult<Review> {
        let task = self
            .tasks
            .find_by_id(request.task_id)
            .await?
            .ok_or(ReviewServiceError::TaskNotFound(request.task_id))?;

        if task.state() != TaskState::Completed {
            return Err(ReviewServiceError::TaskNotCompleted(task.id()));
        }

        let is_participant =
            |identity: IdentityId| identity == task.client() || task.provider() == Some(identity);
        if !is_participant(request.reviewer) {
            return Err(ReviewServiceError::ReviewerNotParticipant {
                task_id: task.id(),
                reviewer: request.reviewer,
            });
        }
        if !is_participant(request.reviewee) {
            return Err(ReviewServiceError::RevieweeNotParticipant {
                task_id: task.id(),
                reviewee: request.reviewee,
            });
        }

        let mut reviewee = self
            .identities
            .find_by_id(request.reviewee)
            .await?
            .ok_or(ReviewServiceError::IdentityNotFound(request.reviewee))?;

        let rating = Rating::new(request.rating)?;
        let review = Review::new(
            task.id(),
            request.reviewer,
            request.reviewee,
            rating,
            request.comment,
            &*self.clock,
        )?;
        self.reviews.store(&review).await?;

        reviewee.record_review(rating.value(), &*self.clock)?;
        self.identities.update(&reviewee).await?;
        Ok(review)
    }

    /// Retrieves a review by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::ReviewNotFound`] when the review does
    /// not exist.
    pub async fn get(&self, review_id: ReviewId) -> ReviewServiceResult<Review> {
        self.reviews
            .find_by_id(review_id)
            .await?
            .ok_or(ReviewServiceError::ReviewNotFound(review_id))
    }

    /// Returns the reviews left on a task.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::Repository`] when the listing fails.
    pub async fn list_for_task(&self, task_id: TaskId) -> ReviewServiceResult<Vec<Review>> {
        Ok(self.reviews.find_by_task(task_id).await?)
    }

    /// Returns the reviews received by an identity, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewServiceError::Repository`] when the listing fails.
    pub async fn list_for_reviewee(
        &self,
        reviewee: IdentityId,
    ) -> ReviewServiceResult<Vec<Review>> {
        Ok(self.reviews.find_by_reviewee(reviewee).await?)
    }
}
