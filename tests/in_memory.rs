//! In-memory repository integration tests.
//!
//! Tests are organized into modules by functionality:
//! - `marketplace_flow_tests`: End-to-end lifecycle, ledger, and review flow
//! - `concurrency_tests`: Optimistic-versioning behaviour under racing writes

mod in_memory {
    pub mod helpers;

    mod concurrency_tests;
    mod marketplace_flow_tests;
}
