//! `PostgreSQL` repository implementation for payment-ledger storage.

use super::{
    models::{NewTransactionRow, TransactionRow},
    schema::transactions,
};
use crate::billing::{
    domain::{
        Amount, PersistedTransactionData, Transaction, TransactionId, TransactionStatus,
    },
    ports::{TransactionRepository, TransactionRepositoryError, TransactionRepositoryResult},
};
use crate::identity::domain::IdentityId;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by billing adapters.
pub type TransactionPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed transaction repository.
#[derive(Debug, Clone)]
pub struct PostgresTransactionRepository {
    pool: TransactionPgPool,
}

impl PostgresTransactionRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TransactionPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TransactionRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TransactionRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(TransactionRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TransactionRepositoryError::persistence)?
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn store(&self, transaction: &Transaction) -> TransactionRepositoryResult<()> {
        let transaction_id = transaction.id();
        let new_row = to_new_row(transaction);

        self.run_blocking(move |connection| {
            diesel::insert_into(transactions::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TransactionRepositoryError::DuplicateTransaction(transaction_id)
                    }
                    _ => TransactionRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: TransactionId,
    ) -> TransactionRepositoryResult<Option<Transaction>> {
        self.run_blocking(move |connection| {
            let row = transactions::table
                .filter(transactions::id.eq(id.into_inner()))
                .select(TransactionRow::as_select())
                .first::<TransactionRow>(connection)
                .optional()
                .map_err(TransactionRepositoryError::persistence)?;
            row.map(row_to_transaction).transpose()
        })
        .await
    }

    async fn find_by_task(
        &self,
        task_id: TaskId,
    ) -> TransactionRepositoryResult<Vec<Transaction>> {
        self.run_blocking(move |connection| {
            let rows = transactions::table
                .filter(transactions::task_id.eq(task_id.into_inner()))
                .order(transactions::created_at.desc())
                .select(TransactionRow::as_select())
                .load::<TransactionRow>(connection)
                .map_err(TransactionRepositoryError::persistence)?;
            rows.into_iter().map(row_to_transaction).collect()
        })
        .await
    }
}

fn to_new_row(transaction: &Transaction) -> NewTransactionRow {
    NewTransactionRow {
        id: transaction.id().into_inner(),
        task_id: transaction.task().into_inner(),
        client_id: transaction.client().into_inner(),
        provider_id: transaction.provider().into_inner(),
        amount_minor: transaction.amount().minor_units(),
        platform_fee_minor: transaction.platform_fee_minor(),
        status: transaction.status().as_str().to_owned(),
        paid_at: transaction.paid_at(),
        created_at: transaction.created_at(),
    }
}

fn row_to_transaction(row: TransactionRow) -> TransactionRepositoryResult<Transaction> {
    let TransactionRow {
        id,
        task_id,
        client_id,
        provider_id,
        amount_minor,
        platform_fee_minor,
        status: persisted_status,
        paid_at,
        created_at,
    } = row;

    let data = PersistedTransactionData {
        id: TransactionId::from_uuid(id),
        task: TaskId::from_uuid(task_id),
        client: IdentityId::from_uuid(client_id),
        provider: IdentityId::from_uuid(provider_id),
        amount: Amount::from_minor_units(amount_minor)
            .map_err(TransactionRepositoryError::persistence)?,
        platform_fee_minor,
        status: TransactionStatus::try_from(persisted_status.as_str())
            .map_err(TransactionRepositoryError::persistence)?,
        paid_at,
        created_at,
    };
    Ok(Transaction::from_persisted(data))
}
