//! Task lifecycle management for DO IT!.
//!
//! This module implements the marketplace core: clients create tasks,
//! providers submit bids, clients book providers or assign bids, providers
//! accept and progress engagements, and completion awards points to both
//! participants. Status changes are enforced by an explicit state machine
//! and writes are guarded by optimistic versioning. The module follows
//! hexagonal architecture:
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
