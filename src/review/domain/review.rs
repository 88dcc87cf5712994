//! Review aggregate root and the bounded rating value.

use super::{ReviewDomainError, ReviewId};
use crate::identity::domain::IdentityId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review rating bounded to the inclusive range 1-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Creates a validated rating.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::RatingOutOfRange`] when the value lies
    /// outside 1-5.
    pub const fn new(value: u8) -> Result<Self, ReviewDomainError> {
        if value < 1 || value > 5 {
            return Err(ReviewDomainError::RatingOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Returns the numeric rating.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post-completion review left by one task participant about the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    id: ReviewId,
    task: TaskId,
    reviewer: IdentityId,
    reviewee: IdentityId,
    rating: Rating,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReviewData {
    /// Persisted review identifier.
    pub id: ReviewId,
    /// Persisted task reference.
    pub task: TaskId,
    /// Persisted reviewer reference.
    pub reviewer: IdentityId,
    /// Persisted reviewee reference.
    pub reviewee: IdentityId,
    /// Persisted rating.
    pub rating: Rating,
    /// Persisted comment, if any.
    pub comment: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Creates a review stamped with the current clock time.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::SelfReview`] when reviewer and reviewee
    /// are the same identity and [`ReviewDomainError::EmptyComment`] when a
    /// supplied comment is empty after trimming.
    pub fn new(
        task: TaskId,
        reviewer: IdentityId,
        reviewee: IdentityId,
        rating: Rating,
        comment: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, ReviewDomainError> {
        if reviewer == reviewee {
            return Err(ReviewDomainError::SelfReview);
        }
        let comment = match comment {
            Some(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ReviewDomainError::EmptyComment);
                }
                Some(trimmed.to_owned())
            }
            None => None,
        };

        Ok(Self {
            id: ReviewId::new(),
            task,
            reviewer,
            reviewee,
            rating,
            comment,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a review from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReviewData) -> Self {
        Self {
            id: data.id,
            task: data.task,
            reviewer: data.reviewer,
            reviewee: data.reviewee,
            rating: data.rating,
            comment: data.comment,
            created_at: data.created_at,
        }
    }

    /// Returns the review identifier.
    #[must_use]
    pub const fn id(&self) -> ReviewId {
        self.id
    }

    /// Returns the task reference.
    #[must_use]
    pub const fn task(&self) -> TaskId {
        self.task
    }

    /// Returns the reviewing identity.
    #[must_use]
    pub const fn reviewer(&self) -> IdentityId {
        self.reviewer
    }

    /// Returns the reviewed identity.
    #[must_use]
    pub const fn reviewee(&self) -> IdentityId {
        self.reviewee
    }

    /// Returns the rating.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Returns the comment, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
