//! JWT adapter for the bearer-token port.
//!
//! Tokens are HS256-signed with a shared secret. The verifier resolves the
//! `sub` claim to an identity identifier; the issuer exists for the
//! transport glue and for tests.

use crate::identity::{
    domain::IdentityId,
    ports::{TokenVerifier, TokenVerifierError},
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct BearerClaims {
    sub: Uuid,
    exp: i64,
}

/// HS256 bearer-token verifier.
#[derive(Clone)]
pub struct JwtTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    /// Creates a verifier from the shared signing secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::default(),
        }
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn resolve_identity(&self, token: &str) -> Result<IdentityId, TokenVerifierError> {
        let bare = token
            .trim()
            .strip_prefix("Bearer ")
            .unwrap_or_else(|| token.trim());

        let data = decode::<BearerClaims>(bare, &self.decoding_key, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenVerifierError::Expired,
                _ => TokenVerifierError::Invalid,
            },
        )?;

        Ok(IdentityId::from_uuid(data.claims.sub))
    }
}

/// Error returned when signing a bearer token fails.
#[derive(Debug, Error)]
#[error("failed to sign bearer token")]
pub struct TokenIssueError(#[from] jsonwebtoken::errors::Error);

/// HS256 bearer-token issuer.
///
/// Counterpart to [`JwtTokenVerifier`]; used by the transport glue when a
/// login succeeds and by tests that need valid tokens.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
}

impl JwtTokenIssuer {
    /// Creates an issuer from the shared signing secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
        }
    }

    /// Signs a token for the given identity, valid until `expires_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenIssueError`] when signing fails.
    pub fn issue(
        &self,
        identity: IdentityId,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenIssueError> {
        let claims = BearerClaims {
            sub: identity.into_inner(),
            exp: expires_at.timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }
}
