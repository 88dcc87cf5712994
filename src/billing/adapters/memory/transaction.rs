//! In-memory repository for payment-ledger tests and local wiring.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::billing::{
    domain::{Transaction, TransactionId},
    ports::{TransactionRepository, TransactionRepositoryError, TransactionRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory transaction repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionRepository {
    state: Arc<RwLock<InMemoryTransactionState>>,
}

#[derive(Debug, Default)]
struct InMemoryTransactionState {
    transactions: HashMap<TransactionId, Transaction>,
    task_index: HashMap<TaskId, Vec<TransactionId>>,
}

impl InMemoryTransactionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TransactionRepositoryError {
    TransactionRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn store(&self, transaction: &Transaction) -> TransactionRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.transactions.contains_key(&transaction.id()) {
            return Err(TransactionRepositoryError::DuplicateTransaction(
                transaction.id(),
            ));
        }

        state
            .task_index
            .entry(transaction.task())
            .or_default()
            .push(transaction.id());
        state
            .transactions
            .insert(transaction.id(), transaction.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: TransactionId,
    ) -> TransactionRepositoryResult<Option<Transaction>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.transactions.get(&id).cloned())
    }

    async fn find_by_task(&self, task_id: TaskId) -> TransactionRepositoryResult<Vec<Transaction>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut transactions: Vec<Transaction> = state
            .task_index
            .get(&task_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.transactions.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        transactions.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(transactions)
    }
}
