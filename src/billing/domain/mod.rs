//! Domain model for payment-ledger transactions.

mod error;
mod ids;
mod transaction;

pub use error::{BillingDomainError, ParseTransactionStatusError};
pub use ids::{Amount, TransactionId};
pub use transaction::{PersistedTransactionData, Transaction, TransactionStatus};
