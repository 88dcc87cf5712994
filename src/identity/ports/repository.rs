//! Repository port for identity persistence and points-ledger writes.

use crate::fault::{Fault, FaultKind};
use crate::identity::domain::{EmailAddress, Identity, IdentityId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity repository operations.
pub type IdentityRepositoryResult<T> = Result<T, IdentityRepositoryError>;

/// A single points credit applied as part of an atomic batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsCredit {
    /// Identity receiving the credit.
    pub identity: IdentityId,
    /// Number of points to add.
    pub amount: u32,
}

impl PointsCredit {
    /// Creates a points credit entry.
    #[must_use]
    pub const fn new(identity: IdentityId, amount: u32) -> Self {
        Self { identity, amount }
    }
}

/// Identity persistence contract.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Stores a new identity.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::DuplicateIdentity`] when the ID
    /// already exists or [`IdentityRepositoryError::DuplicateEmail`] when
    /// the email address is already registered.
    async fn store(&self, identity: &Identity) -> IdentityRepositoryResult<()>;

    /// Persists changes to an existing identity (profile, statistics,
    /// points balance).
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::NotFound`] when the identity does
    /// not exist.
    async fn update(&self, identity: &Identity) -> IdentityRepositoryResult<()>;

    /// Finds an identity by identifier.
    ///
    /// Returns `None` when the identity does not exist.
    async fn find_by_id(&self, id: IdentityId) -> IdentityRepositoryResult<Option<Identity>>;

    /// Finds an identity by normalized email address.
    ///
    /// Returns `None` when no identity is registered under the address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> IdentityRepositoryResult<Option<Identity>>;

    /// Applies a batch of points credits atomically.
    ///
    /// Either every credit in the batch is applied or none are; completion
    /// awards rely on this to avoid half-credited engagements.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::NotFound`] when any credited
    /// identity does not exist. No balance changes in that case.
    async fn credit_all(
        &self,
        credits: &[PointsCredit],
        now: DateTime<Utc>,
    ) -> IdentityRepositoryResult<()>;
}

/// Errors returned by identity repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityRepositoryError {
    /// An identity with the same identifier already exists.
    #[error("duplicate identity identifier: {0}")]
    DuplicateIdentity(IdentityId),

    /// An identity with the same email address already exists.
    #[error("email address already registered: {0}")]
    DuplicateEmail(EmailAddress),

    /// The identity was not found.
    #[error("identity not found: {0}")]
    NotFound(IdentityId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Fault for IdentityRepositoryError {
    fn fault_kind(&self) -> FaultKind {
        match self {
            Self::DuplicateIdentity(_) | Self::DuplicateEmail(_) => FaultKind::Conflict,
            Self::NotFound(_) => FaultKind::NotFound,
            Self::Persistence(_) => FaultKind::Internal,
        }
    }
}
