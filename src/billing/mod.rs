//! Payment ledger for DO IT!.
//!
//! Transactions are ledger entries capturing the amount and platform fee of
//! a task engagement. They are created explicitly — deliberately not
//! chained from task completion — and marked paid immediately. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
