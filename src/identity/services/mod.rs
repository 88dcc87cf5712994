//! Application services for identity management.

mod account;
mod points;

pub use account::{
    IdentityAccountError, IdentityAccountResult, IdentityAccountService, RegisterIdentityRequest,
    UpdateProfileRequest,
};
pub use points::{PointsLedgerError, PointsLedgerResult, PointsLedgerService};
