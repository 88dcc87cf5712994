//! Transaction aggregate root and payment status.

use super::{Amount, BillingDomainError, ParseTransactionStatusError, TransactionId};
use crate::identity::domain::IdentityId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment status of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Recorded but not yet settled.
    Pending,
    /// Settled successfully.
    Paid,
    /// Settlement failed.
    Failed,
}

impl TransactionStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = ParseTransactionStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTransactionStatusError(value.to_owned())),
        }
    }
}

/// Payment-ledger entry for a task engagement.
///
/// The platform fee is computed once at creation and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    task: TaskId,
    client: IdentityId,
    provider: IdentityId,
    amount: Amount,
    platform_fee_minor: i64,
    status: TransactionStatus,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTransactionData {
    /// Persisted transaction identifier.
    pub id: TransactionId,
    /// Persisted task reference.
    pub task: TaskId,
    /// Persisted client reference.
    pub client: IdentityId,
    /// Persisted provider reference.
    pub provider: IdentityId,
    /// Persisted amount.
    pub amount: Amount,
    /// Persisted platform fee in minor units.
    pub platform_fee_minor: i64,
    /// Persisted payment status.
    pub status: TransactionStatus,
    /// Persisted settlement timestamp, if any.
    pub paid_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a pending ledger entry, computing the platform fee.
    #[must_use]
    pub fn new(
        task: TaskId,
        client: IdentityId,
        provider: IdentityId,
        amount: Amount,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            task,
            client,
            provider,
            amount,
            platform_fee_minor: amount.platform_fee_minor(),
            status: TransactionStatus::Pending,
            paid_at: None,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a transaction from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTransactionData) -> Self {
        Self {
            id: data.id,
            task: data.task,
            client: data.client,
            provider: data.provider,
            amount: data.amount,
            platform_fee_minor: data.platform_fee_minor,
            status: data.status,
            paid_at: data.paid_at,
            created_at: data.created_at,
        }
    }

    /// Returns the transaction identifier.
    #[must_use]
    pub const fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the task reference.
    #[must_use]
    pub const fn task(&self) -> TaskId {
        self.task
    }

    /// Returns the client reference.
    #[must_use]
    pub const fn client(&self) -> IdentityId {
        self.client
    }

    /// Returns the provider reference.
    #[must_use]
    pub const fn provider(&self) -> IdentityId {
        self.provider
    }

    /// Returns the transaction amount.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the platform fee in minor units.
    #[must_use]
    pub const fn platform_fee_minor(&self) -> i64 {
        self.platform_fee_minor
    }

    /// Returns the payment status.
    #[must_use]
    pub const fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Returns the settlement timestamp, if settled.
    #[must_use]
    pub const fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the entry as paid at the current clock time.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::AlreadyFinalized`] when the entry has
    /// already settled or failed.
    pub fn mark_paid(&mut self, clock: &impl Clock) -> Result<(), BillingDomainError> {
        self.ensure_pending()?;
        self.status = TransactionStatus::Paid;
        self.paid_at = Some(clock.utc());
        Ok(())
    }

    /// Marks the entry as failed.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::AlreadyFinalized`] when the entry has
    /// already settled or failed.
    pub fn mark_failed(&mut self) -> Result<(), BillingDomainError> {
        self.ensure_pending()?;
        self.status = TransactionStatus::Failed;
        Ok(())
    }

    const fn ensure_pending(&self) -> Result<(), BillingDomainError> {
        match self.status {
            TransactionStatus::Pending => Ok(()),
            status => Err(BillingDomainError::AlreadyFinalized {
                transaction_id: self.id,
                status,
            }),
        }
    }
}
