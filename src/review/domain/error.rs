//! Error types for review domain validation.

use thiserror::Error;

/// Errors returned while constructing domain review values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewDomainError {
    /// The rating lies outside the 1-5 range.
    #[error("rating {0} is outside the allowed range 1-5")]
    RatingOutOfRange(u8),

    /// A comment is present but empty after trimming.
    #[error("review comment must not be empty when supplied")]
    EmptyComment,

    /// Reviewer and reviewee are the same identity.
    #[error("an identity cannot review itself")]
    SelfReview,
}
