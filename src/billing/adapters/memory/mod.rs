//! In-memory adapters for transaction persistence.

mod transaction;

pub use transaction::InMemoryTransactionRepository;
