//! Port contracts for review management.

pub mod repository;

pub use repository::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult};
