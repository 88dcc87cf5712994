//! Diesel row models for identity persistence.

use super::schema::identities;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for identity records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = identities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IdentityRow {
    /// Identity identifier.
    pub id: uuid::Uuid,
    /// Participant display name.
    pub display_name: String,
    /// Normalized email address.
    pub email: String,
    /// Password digest.
    pub password_hash: String,
    /// Marketplace role.
    pub role: String,
    /// Provider skill tags as a JSON array.
    pub skills: Value,
    /// Verification flag.
    pub verified: bool,
    /// Running average review rating.
    pub rating: f64,
    /// Number of reviews received.
    pub review_count: i32,
    /// Points balance.
    pub points: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for identity records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = identities)]
pub struct NewIdentityRow {
    /// Identity identifier.
    pub id: uuid::Uuid,
    /// Participant display name.
    pub display_name: String,
    /// Normalized email address.
    pub email: String,
    /// Password digest.
    pub password_hash: String,
    /// Marketplace role.
    pub role: String,
    /// Provider skill tags as a JSON array.
    pub skills: Value,
    /// Verification flag.
    pub verified: bool,
    /// Running average review rating.
    pub rating: f64,
    /// Number of reviews received.
    pub review_count: i32,
    /// Points balance.
    pub points: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
