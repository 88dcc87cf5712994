//! In-memory repository for identity tests and local wiring.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{EmailAddress, Identity, IdentityId},
    ports::{IdentityRepository, IdentityRepositoryError, IdentityRepositoryResult, PointsCredit},
};

/// Thread-safe in-memory identity repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityRepository {
    state: Arc<RwLock<InMemoryIdentityState>>,
}

#[derive(Debug, Default)]
struct InMemoryIdentityState {
    identities: HashMap<IdentityId, Identity>,
    email_index: HashMap<EmailAddress, IdentityId>,
}

impl InMemoryIdentityRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> IdentityRepositoryError {
    IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn store(&self, identity: &Identity) -> IdentityRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.identities.contains_key(&identity.id()) {
            return Err(IdentityRepositoryError::DuplicateIdentity(identity.id()));
        }
        if state.email_index.contains_key(identity.email()) {
            return Err(IdentityRepositoryError::DuplicateEmail(
                identity.email().clone(),
            ));
        }

        state
            .email_index
            .insert(identity.email().clone(), identity.id());
        state.identities.insert(identity.id(), identity.clone());
        Ok(())
    }

    async fn update(&self, identity: &Identity) -> IdentityRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        let old_email = state
            .identities
            .get(&identity.id())
            .ok_or(IdentityRepositoryError::NotFound(identity.id()))?
            .email()
            .clone();

        if old_email != *identity.email() {
            if state.email_index.contains_key(identity.email()) {
                return Err(IdentityRepositoryError::DuplicateEmail(
                    identity.email().clone(),
                ));
            }
            state.email_index.remove(&old_email);
            state
                .email_index
                .insert(identity.email().clone(), identity.id());
        }

        state.identities.insert(identity.id(), identity.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: IdentityId) -> IdentityRepositoryResult<Option<Identity>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.identities.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> IdentityRepositoryResult<Option<Identity>> {
        let state = self.state.read().map_err(lock_error)?;
        let identity = state
            .email_index
            .get(email)
            .and_then(|id| state.identities.get(id))
            .cloned();
        Ok(identity)
    }

    async fn credit_all(
        &self,
        credits: &[PointsCredit],
        now: DateTime<Utc>,
    ) -> IdentityRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        // Validate the whole batch before touching any balance so the
        // operation stays all-or-nothing.
        for credit in credits {
            if !state.identities.contains_key(&credit.identity) {
                return Err(IdentityRepositoryError::NotFound(credit.identity));
            }
        }

        for credit in credits {
            if let Some(identity) = state.identities.get_mut(&credit.identity) {
                identity.apply_credit(credit.amount, now);
            }
        }
        Ok(())
    }
}
