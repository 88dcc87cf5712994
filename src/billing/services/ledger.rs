//! Service layer for recording payment-ledger transactions.
//!
//! Transaction creation is deliberately independent of the task lifecycle:
//! completing a task awards points but does not record a ledger entry.

use crate::billing::{
    domain::{Amount, BillingDomainError, Transaction, TransactionId},
    ports::{TransactionRepository, TransactionRepositoryError},
};
use crate::fault::{Fault, FaultKind};
use crate::identity::{
    domain::IdentityId,
    ports::{IdentityRepository, IdentityRepositoryError},
};
use crate::task::{
    domain::TaskId,
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for recording a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateTransactionRequest {
    /// Task the engagement belongs to.
    pub task_id: TaskId,
    /// Provider being paid.
    pub provider: IdentityId,
    /// Amount in minor currency units.
    pub amount_minor: i64,
}

impl CreateTransactionRequest {
    /// Creates a transaction request.
    #[must_use]
    pub const fn new(task_id: TaskId, provider: IdentityId, amount_minor: i64) -> Self {
        Self {
            task_id,
            provider,
            amount_minor,
        }
    }
}

/// Service-level errors for payment-ledger operations.
#[derive(Debug, Error)]
pub enum PaymentLedgerError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BillingDomainError),
    /// Transaction repository operation failed.
    #[error(transparent)]
    Repository(#[from] TransactionRepositoryError),
    /// Task repository operation failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
    /// Identity repository operation failed.
    #[error(transparent)]
    Identity(#[from] IdentityRepositoryError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// No identity exists with the given identifier.
    #[error("identity {0} not found")]
    IdentityNotFound(IdentityId),
    /// The named provider is not assigned to the task.
    #[error("identity {provider} is not the assigned provider of task {task_id}")]
    ProviderMismatch {
        /// Task the transaction references.
        task_id: TaskId,
        /// Provider named in the request.
        provider: IdentityId,
    },
    /// No transaction exists with the given identifier.
    #[error("transaction {0} not found")]
    TransactionNotFound(TransactionId),
}

impl Fault for PaymentLedgerError {
    fn fault_kind(&self) -> FaultKind {
        match self {
            Self::Domain(_) | Self::ProviderMismatch { .. } => FaultKind::Validation,
            Self::Repository(err) => err.fault_kind(),
            Self::Task(err) => err.fault_kind(),
            Self::Identity(err) => err.fault_kind(),
            Self::TaskNotFound(_) | Self::IdentityNotFound(_) | Self::TransactionNotFound(_) => {
                FaultKind::NotFound
            }
        }
    }
}

/// Result type for payment-ledger operations.
pub type PaymentLedgerResult<T> = Result<T, PaymentLedgerError>;

/// Payment-ledger orchestration service.
#[derive(Clone)]
pub struct PaymentLedgerService<B, T, I, C>
where
    B: TransactionRepository,
    T: TaskRepository,
    I: IdentityRepository,
    C: Clock + Send + Sync,
{
    transactions: Arc<B>,
    tasks: Arc<T>,
    identities: Arc<I>,
    clock: Arc<C>,
}

impl<B, T, I, C> PaymentLedgerService<B, T, I, C>
where
    B: TransactionRepository,
    T: TaskRepository,
    I: IdentityRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new payment-ledger service.
    #[must_use]
    pub const fn new(
        transactions: Arc<B>,
        tasks: Arc<T>,
        identities: Arc<I>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            transactions,
            tasks,
            identities,
            clock,
        }
    }

    /// Records a paid ledger entry for a task engagement.
    ///
    /// The platform fee is ten percent of the amount; the entry is settled
    /// immediately with `paid_at` set to the clock's now.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentLedgerError`] when the task or provider does not
    /// resolve, the provider is not the task's assigned provider, or the
    /// amount is not positive.
    pub async fn create(
        &self,
        request: CreateTransactionRequest,
    ) -> PaymentLedgerResult<Transaction> {
        let task = self
            .tasks
            .find_by_id(request.task_id)
            .await?
            .ok_or(PaymentLedgerError::TaskNotFound(request.task_id))?;
        let provider = self
            .identities
            .find_by_id(request.provider)
            .await?
            .ok_or(PaymentLedgerError::IdentityNotFound(request.provider))?;

        if task.provider() != Some(provider.id()) {
            return Err(PaymentLedgerError::ProviderMismatch {
                task_id: task.id(),
                provider: provider.id(),
            });
        }

        let amount = Amount::from_minor_units(request.amount_minor)?;
        let mut transaction = Transaction::new(
            task.id(),
            task.client(),
            provider.id(),
            amount,
            &*self.clock,
        );
        transaction.mark_paid(&*self.clock)?;
        self.transactions.store(&transaction).await?;
        Ok(transaction)
    }

    /// Retrieves a transaction by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentLedgerError::TransactionNotFound`] when the
    /// transaction does not exist.
    pub async fn get(&self, transaction_id: TransactionId) -> PaymentLedgerResult<Transaction> {
        self.transactions
            .find_by_id(transaction_id)
            .await?
            .ok_or(PaymentLedgerError::TransactionNotFound(transaction_id))
    }

    /// Returns the ledger entries recorded against a task, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentLedgerError::Repository`] when the listing fails.
    pub async fn list_for_task(&self, task_id: TaskId) -> PaymentLedgerResult<Vec<Transaction>> {
        Ok(self.transactions.find_by_task(task_id).await?)
    }
}
