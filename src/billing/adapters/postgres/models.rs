//! Diesel row models for payment-ledger persistence.

use super::schema::transactions;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for transaction records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TransactionRow {
    /// Transaction identifier.
    pub id: uuid::Uuid,
    /// Task the engagement belongs to.
    pub task_id: uuid::Uuid,
    /// Paying client.
    pub client_id: uuid::Uuid,
    /// Paid provider.
    pub provider_id: uuid::Uuid,
    /// Amount in minor currency units.
    pub amount_minor: i64,
    /// Platform fee in minor currency units.
    pub platform_fee_minor: i64,
    /// Payment status.
    pub status: String,
    /// Settlement timestamp, if settled.
    pub paid_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for transaction records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transactions)]
pub struct NewTransactionRow {
    /// Transaction identifier.
    pub id: uuid::Uuid,
    /// Task the engagement belongs to.
    pub task_id: uuid::Uuid,
    /// Paying client.
    pub client_id: uuid::Uuid,
    /// Paid provider.
    pub provider_id: uuid::Uuid,
    /// Amount in minor currency units.
    pub amount_minor: i64,
    /// Platform fee in minor currency units.
    pub platform_fee_minor: i64,
    /// Payment status.
    pub status: String,
    /// Settlement timestamp, if settled.
    pub paid_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
