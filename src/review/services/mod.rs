//! Application services for review management.

mod review;

pub use review::{CreateReviewRequest, ReviewService, ReviewServiceError, ReviewServiceResult};
