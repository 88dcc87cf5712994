//! Bid entries embedded in a task's bidder list.

use super::{BidId, Budget, TaskDomainError};
use crate::identity::domain::IdentityId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Optional commercial terms attached to a bid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidOffer {
    amount: Option<Budget>,
    proposal: Option<String>,
    estimated_hours: Option<u32>,
}

impl BidOffer {
    /// Creates an empty offer (expression of interest only).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            amount: None,
            proposal: None,
            estimated_hours: None,
        }
    }

    /// Sets the offered price.
    #[must_use]
    pub const fn with_amount(mut self, amount: Budget) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the proposal text.
    #[must_use]
    pub fn with_proposal(mut self, proposal: impl Into<String>) -> Self {
        self.proposal = Some(proposal.into());
        self
    }

    /// Sets the estimated duration in hours.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: u32) -> Self {
        self.estimated_hours = Some(hours);
        self
    }
}

/// A provider's expression of interest in a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    id: BidId,
    bidder: IdentityId,
    placed_at: DateTime<Utc>,
    amount: Option<Budget>,
    proposal: Option<String>,
    estimated_hours: Option<u32>,
}

impl Bid {
    /// Creates a bid stamped with the current clock time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyProposal`] when the offer carries a
    /// proposal that is empty after trimming.
    pub fn new(
        bidder: IdentityId,
        offer: BidOffer,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let proposal = match offer.proposal {
            Some(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(TaskDomainError::EmptyProposal);
                }
                Some(trimmed.to_owned())
            }
            None => None,
        };

        Ok(Self {
            id: BidId::new(),
            bidder,
            placed_at: clock.utc(),
            amount: offer.amount,
            proposal,
            estimated_hours: offer.estimated_hours,
        })
    }

    /// Returns the bid identifier.
    #[must_use]
    pub const fn id(&self) -> BidId {
        self.id
    }

    /// Returns the bidding identity.
    #[must_use]
    pub const fn bidder(&self) -> IdentityId {
        self.bidder
    }

    /// Returns when the bid was placed.
    #[must_use]
    pub const fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    /// Returns the offered price, if any.
    #[must_use]
    pub const fn amount(&self) -> Option<Budget> {
        self.amount
    }

    /// Returns the proposal text, if any.
    #[must_use]
    pub fn proposal(&self) -> Option<&str> {
        self.proposal.as_deref()
    }

    /// Returns the estimated duration in hours, if any.
    #[must_use]
    pub const fn estimated_hours(&self) -> Option<u32> {
        self.estimated_hours
    }
}
