//! Application services for the payment ledger.

mod ledger;

pub use ledger::{
    CreateTransactionRequest, PaymentLedgerError, PaymentLedgerResult, PaymentLedgerService,
};
