//! Diesel row models for review persistence.

use super::schema::reviews;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for review records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewRow {
    /// Review identifier.
    pub id: uuid::Uuid,
    /// Reviewed task.
    pub task_id: uuid::Uuid,
    /// Reviewing identity.
    pub reviewer_id: uuid::Uuid,
    /// Reviewed identity.
    pub reviewee_id: uuid::Uuid,
    /// Rating between 1 and 5.
    pub rating: i16,
    /// Optional comment text.
    pub comment: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for review records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub struct NewReviewRow {
    /// Review identifier.
    pub id: uuid::Uuid,
    /// Reviewed task.
    pub task_id: uuid::Uuid,
    /// Reviewing identity.
    pub reviewer_id: uuid::Uuid,
    /// Reviewed identity.
    pub reviewee_id: uuid::Uuid,
    /// Rating between 1 and 5.
    pub rating: i16,
    /// Optional comment text.
    pub comment: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
