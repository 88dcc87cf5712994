//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain identity values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyDisplayName,

    /// The email address does not follow `local@domain` form.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// A skill tag is empty after trimming.
    #[error("skill tags must not be empty")]
    EmptySkillTag,

    /// Skill tags were supplied for a client identity.
    #[error("skill tags are only valid for provider identities")]
    SkillsRequireProviderRole,

    /// The password hash value is empty.
    #[error("password hash must not be empty")]
    EmptyPasswordHash,

    /// The review rating lies outside the 1-5 range.
    #[error("review rating {0} is outside the allowed range 1-5")]
    InvalidReviewRating(u8),
}

/// Error returned while parsing identity roles from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown identity role: {0}")]
pub struct ParseRoleError(pub String);
