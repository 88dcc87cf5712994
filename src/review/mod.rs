//! Post-completion reviews for DO IT!.
//!
//! A review is a 1-5 rating and optional comment left by one participant
//! of a completed task about the other. Creating a review folds the rating
//! into the reviewee's running average. The module follows hexagonal
//! architecture:
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
