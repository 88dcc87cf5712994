//! Port contracts for the payment ledger.

pub mod repository;

pub use repository::{
    TransactionRepository, TransactionRepositoryError, TransactionRepositoryResult,
};
