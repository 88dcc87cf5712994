//! Service layer for the per-identity points ledger.

use crate::fault::{Fault, FaultKind};
use crate::identity::{
    domain::{Identity, IdentityId},
    ports::{IdentityRepository, IdentityRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for points ledger operations.
#[derive(Debug, Error)]
pub enum PointsLedgerError {
    /// No identity exists with the given identifier.
    #[error("identity {0} not found")]
    NotFound(IdentityId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] IdentityRepositoryError),
}

impl Fault for PointsLedgerError {
    fn fault_kind(&self) -> FaultKind {
        match self {
            Self::NotFound(_) => FaultKind::NotFound,
            Self::Repository(err) => err.fault_kind(),
        }
    }
}

/// Result type for points ledger operations.
pub type PointsLedgerResult<T> = Result<T, PointsLedgerError>;

/// Points ledger orchestration service.
#[derive(Clone)]
pub struct PointsLedgerService<R, C>
where
    R: IdentityRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> PointsLedgerService<R, C>
where
    R: IdentityRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new points ledger service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    async fn find_identity_or_error(
        &self,
        identity_id: IdentityId,
    ) -> PointsLedgerResult<Identity> {
        self.repository
            .find_by_id(identity_id)
            .await?
            .ok_or(PointsLedgerError::NotFound(identity_id))
    }

    /// Credits points to an identity.
    ///
    /// # Errors
    ///
    /// Returns [`PointsLedgerError::NotFound`] when the identity does not
    /// exist.
    pub async fn credit(
        &self,
        identity_id: IdentityId,
        amount: u32,
    ) -> PointsLedgerResult<Identity> {
        let mut identity = self.find_identity_or_error(identity_id).await?;
        identity.credit_points(amount, &*self.clock);
        self.repository.update(&identity).await?;
        Ok(identity)
    }

    /// Debits points from an identity, flooring the balance at zero.
    ///
    /// # Errors
    ///
    /// Returns [`PointsLedgerError::NotFound`] when the identity does not
    /// exist.
    pub async fn debit(
        &self,
        identity_id: IdentityId,
        amount: u32,
    ) -> PointsLedgerResult<Identity> {
        let mut identity = self.find_identity_or_error(identity_id).await?;
        identity.debit_points(amount, &*self.clock);
        self.repository.update(&identity).await?;
        Ok(identity)
    }
}
