//! Repository port for transaction persistence and lookup.

use crate::billing::domain::{Transaction, TransactionId};
use crate::fault::{Fault, FaultKind};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for transaction repository operations.
pub type TransactionRepositoryResult<T> = Result<T, TransactionRepositoryError>;

/// Transaction persistence contract.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Stores a new transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionRepositoryError::DuplicateTransaction`] when
    /// the transaction ID already exists.
    async fn store(&self, transaction: &Transaction) -> TransactionRepositoryResult<()>;

    /// Finds a transaction by identifier.
    ///
    /// Returns `None` when the transaction does not exist.
    async fn find_by_id(
        &self,
        id: TransactionId,
    ) -> TransactionRepositoryResult<Option<Transaction>>;

    /// Returns all transactions recorded against the given task, newest
    /// first.
    async fn find_by_task(&self, task_id: TaskId) -> TransactionRepositoryResult<Vec<Transaction>>;
}

/// Errors returned by transaction repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TransactionRepositoryError {
    /// A transaction with the same identifier already exists.
    #[error("duplicate transaction identifier: {0}")]
    DuplicateTransaction(TransactionId),

    /// The transaction was not found.
    #[error("transaction not found: {0}")]
    NotFound(TransactionId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TransactionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Fault for TransactionRepositoryError {
    fn fault_kind(&self) -> FaultKind {
        match self {
            Self::DuplicateTransaction(_) => FaultKind::Conflict,
            Self::NotFound(_) => FaultKind::NotFound,
            Self::Persistence(_) => FaultKind::Internal,
        }
    }
}
