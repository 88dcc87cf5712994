//! Bearer-token resolution port.
//!
//! Protected operations receive an `Authorization: Bearer <token>` value
//! from the transport layer; the token collaborator resolves it to an
//! identity identifier or rejects the whole request.

use crate::fault::{Fault, FaultKind};
use crate::identity::domain::IdentityId;
use thiserror::Error;

/// Contract for resolving bearer tokens to identity identifiers.
pub trait TokenVerifier: Send + Sync {
    /// Resolves a bearer token to the identity it was issued for.
    ///
    /// Accepts either the bare token or the full header value with a
    /// `Bearer ` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`TokenVerifierError`] when the token is malformed, has an
    /// invalid signature, or has expired.
    fn resolve_identity(&self, token: &str) -> Result<IdentityId, TokenVerifierError>;
}

/// Errors returned by token verifier implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenVerifierError {
    /// The token is malformed, carries an invalid signature, or does not
    /// reference an identity.
    #[error("bearer token is invalid")]
    Invalid,

    /// The token has expired.
    #[error("bearer token has expired")]
    Expired,
}

impl Fault for TokenVerifierError {
    fn fault_kind(&self) -> FaultKind {
        FaultKind::Unauthorized
    }
}
