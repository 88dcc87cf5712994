//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Short task title.
    pub title: String,
    /// Detailed description of the work.
    pub description: String,
    /// Free-text category.
    pub category: String,
    /// Free-text location or coordinate string.
    pub location: String,
    /// Posting client.
    pub client_id: uuid::Uuid,
    /// Assigned provider, if any.
    pub provider_id: Option<uuid::Uuid>,
    /// Budget in minor currency units.
    pub budget_minor: i64,
    /// Requested schedule.
    pub scheduled_at: DateTime<Utc>,
    /// Skill requirements as a JSON array.
    pub skills_required: Value,
    /// Scheduling urgency.
    pub urgency: String,
    /// Embedded bid list as a JSON array.
    pub bids: Value,
    /// Task lifecycle state.
    pub state: String,
    /// Optimistic-concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Short task title.
    pub title: String,
    /// Detailed description of the work.
    pub description: String,
    /// Free-text category.
    pub category: String,
    /// Free-text location or coordinate string.
    pub location: String,
    /// Posting client.
    pub client_id: uuid::Uuid,
    /// Assigned provider, if any.
    pub provider_id: Option<uuid::Uuid>,
    /// Budget in minor currency units.
    pub budget_minor: i64,
    /// Requested schedule.
    pub scheduled_at: DateTime<Utc>,
    /// Skill requirements as a JSON array.
    pub skills_required: Value,
    /// Scheduling urgency.
    pub urgency: String,
    /// Embedded bid list as a JSON array.
    pub bids: Value,
    /// Task lifecycle state.
    pub state: String,
    /// Optimistic-concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
