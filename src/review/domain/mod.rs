//! Domain model for post-completion reviews.

mod error;
mod ids;
mod review;

pub use error::ReviewDomainError;
pub use ids::ReviewId;
pub use review::{PersistedReviewData, Rating, Review};
