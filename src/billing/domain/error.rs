//! Error types for billing domain validation and parsing.

use super::{TransactionId, TransactionStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain billing values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BillingDomainError {
    /// The transaction amount is zero or negative.
    #[error("transaction amount {0} must be a positive amount in minor units")]
    InvalidAmount(i64),

    /// The transaction has already reached a final payment status.
    #[error("transaction {transaction_id} is already {status}")]
    AlreadyFinalized {
        /// Transaction being mutated.
        transaction_id: TransactionId,
        /// Final status the transaction already holds.
        status: TransactionStatus,
    },
}

/// Error returned while parsing transaction statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown transaction status: {0}")]
pub struct ParseTransactionStatusError(pub String);
