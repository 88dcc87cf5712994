//! Identifier and validated scalar types for the billing domain.

use super::BillingDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Percentage of each transaction amount retained as the platform fee.
pub const PLATFORM_FEE_PERCENT: i64 = 10;

/// Unique identifier for a transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a new random transaction identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a transaction identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Positive transaction amount in minor currency units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Creates a validated transaction amount.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::InvalidAmount`] when the value is zero
    /// or negative.
    pub const fn from_minor_units(value: i64) -> Result<Self, BillingDomainError> {
        if value <= 0 {
            return Err(BillingDomainError::InvalidAmount(value));
        }
        Ok(Self(value))
    }

    /// Returns the amount in minor currency units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Returns the platform fee in minor units: ten percent of the amount,
    /// rounded half-up to the minor unit.
    #[must_use]
    #[expect(
        clippy::integer_division,
        reason = "half-up rounding of the percentage fee is intentional integer arithmetic"
    )]
    pub const fn platform_fee_minor(self) -> i64 {
        (self.0 * PLATFORM_FEE_PERCENT + 50) / 100
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
