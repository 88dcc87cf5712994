//! Password-hashing port.

use crate::identity::domain::PasswordHash;
use thiserror::Error;

/// Contract for deriving and verifying password digests.
pub trait PasswordHasher: Send + Sync {
    /// Derives a digest for a new password.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHasherError::EmptyPassword`] when the password is
    /// empty.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError>;

    /// Verifies a password against a stored digest.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHasherError::MalformedHash`] when the stored
    /// digest cannot be parsed.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}

/// Errors returned by password hasher implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordHasherError {
    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// The stored digest does not follow the expected encoding.
    #[error("stored password digest is malformed")]
    MalformedHash,
}
