//! `PostgreSQL` adapters for payment-ledger persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTransactionRepository, TransactionPgPool};
