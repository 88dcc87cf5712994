//! Error taxonomy shared by the service layers.
//!
//! Service errors classify themselves into a small set of fault kinds so
//! that transport glue (a REST gateway, a CLI) can map failures to its own
//! status vocabulary mechanically instead of pattern-matching every service
//! error enum.

/// Classification of a service-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// The request payload failed validation.
    Validation,
    /// The caller could not be authenticated.
    Unauthorized,
    /// The caller is not the authorised actor for the operation.
    Forbidden,
    /// A referenced record does not resolve.
    NotFound,
    /// The operation lost a write race or targets conflicting state.
    Conflict,
    /// An infrastructure failure outside the caller's control.
    Internal,
}

impl FaultKind {
    /// Returns the conventional HTTP status code for this fault kind.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }
}

/// Contract for errors that classify themselves into the fault taxonomy.
pub trait Fault {
    /// Returns the fault classification of this error.
    fn fault_kind(&self) -> FaultKind;
}
