//! Identity management for DO IT!.
//!
//! An identity is a registered marketplace participant: a client who posts
//! tasks or a provider who bids on them. This module covers registration,
//! authentication collaborator ports, profile statistics, and the points
//! ledger that rewards completed engagements. The module follows hexagonal
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
