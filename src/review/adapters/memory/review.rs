//! In-memory repository for review tests and local wiring.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::identity::domain::IdentityId;
use crate::review::{
    domain::{Review, ReviewId},
    ports::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory review repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewRepository {
    state: Arc<RwLock<InMemoryReviewState>>,
}

#[derive(Debug, Default)]
struct InMemoryReviewState {
    reviews: HashMap<ReviewId, Review>,
    task_reviewer_index: HashSet<(TaskId, IdentityId)>,
}

impl InMemoryReviewRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ReviewRepositoryError {
    ReviewRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn store(&self, review: &Review) -> ReviewRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.reviews.contains_key(&review.id()) {
            return Err(ReviewRepositoryError::DuplicateReview(review.id()));
        }

        let pair = (review.task(), review.reviewer());
        if state.task_reviewer_index.contains(&pair) {
            return Err(ReviewRepositoryError::DuplicateTaskReviewer {
                task_id: review.task(),
                reviewer: review.reviewer(),
            });
        }

        state.task_reviewer_index.insert(pair);
        state.reviews.insert(review.id(), review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ReviewId) -> ReviewRepositoryResult<Option<Review>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.reviews.get(&id).cloned())
    }

    async fn find_by_task(&self, task_id: TaskId) -> ReviewRepositoryResult<Vec<Review>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut reviews: Vec<Review> = state
            .reviews
            .values()
            .filter(|review| review.task() == task_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(reviews)
    }

    async fn find_by_reviewee(
        &self,
        reviewee: IdentityId,
    ) -> ReviewRepositoryResult<Vec<Review>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut reviews: Vec<Review> = state
            .reviews
            .values()
            .filter(|review| review.reviewee() == reviewee)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(reviews)
    }
}
