//! Identity aggregate root and participant roles.

use super::{DisplayName, EmailAddress, IdentityDomainError, IdentityId, ParseRoleError, PasswordHash, SkillTag};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marketplace role of a registered identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Posts tasks and assigns bids.
    Client,
    /// Bids on tasks and carries out the work.
    Provider,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Provider => "provider",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "client" => Ok(Self::Client),
            "provider" => Ok(Self::Provider),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Identity aggregate root.
///
/// The password hash is excluded from serialised representations; external
/// surfaces only ever see profile attributes and ledger statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    id: IdentityId,
    display_name: DisplayName,
    email: EmailAddress,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
    role: Role,
    skills: Vec<SkillTag>,
    verified: bool,
    rating: f64,
    review_count: u32,
    points: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted identity aggregate.
#[derive(Debug, Clone)]
pub struct PersistedIdentityData {
    /// Persisted identity identifier.
    pub id: IdentityId,
    /// Persisted display name.
    pub display_name: DisplayName,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted password digest.
    pub password_hash: PasswordHash,
    /// Persisted marketplace role.
    pub role: Role,
    /// Persisted skill tags.
    pub skills: Vec<SkillTag>,
    /// Persisted verification flag.
    pub verified: bool,
    /// Persisted running average rating.
    pub rating: f64,
    /// Persisted review count.
    pub review_count: u32,
    /// Persisted points balance.
    pub points: i64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Creates a new identity at registration time.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::SkillsRequireProviderRole`] when skill
    /// tags are supplied for a client identity.
    pub fn new(
        display_name: DisplayName,
        email: EmailAddress,
        password_hash: PasswordHash,
        role: Role,
        skills: Vec<SkillTag>,
        clock: &impl Clock,
    ) -> Result<Self, IdentityDomainError> {
        if role == Role::Client && !skills.is_empty() {
            return Err(IdentityDomainError::SkillsRequireProviderRole);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: IdentityId::new(),
            display_name,
            email,
            password_hash,
            role,
            skills,
            verified: false,
            rating: 0.0,
            review_count: 0,
            points: 0,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs an identity from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIdentityData) -> Self {
        Self {
            id: data.id,
            display_name: data.display_name,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            skills: data.skills,
            verified: data.verified,
            rating: data.rating,
            review_count: data.review_count,
            points: data.points,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the identity identifier.
    #[must_use]
    pub const fn id(&self) -> IdentityId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the stored password digest.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the marketplace role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the provider skill tags.
    #[must_use]
    pub fn skills(&self) -> &[SkillTag] {
        &self.skills
    }

    /// Returns whether the identity has been verified.
    #[must_use]
    pub const fn verified(&self) -> bool {
        self.verified
    }

    /// Returns the running average review rating.
    #[must_use]
    pub const fn rating(&self) -> f64 {
        self.rating
    }

    /// Returns the number of reviews received.
    #[must_use]
    pub const fn review_count(&self) -> u32 {
        self.review_count
    }

    /// Returns the points balance.
    #[must_use]
    pub const fn points(&self) -> i64 {
        self.points
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the display name.
    pub fn rename(&mut self, display_name: DisplayName, clock: &impl Clock) {
        self.display_name = display_name;
        self.touch(clock);
    }

    /// Replaces the provider skill tags.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::SkillsRequireProviderRole`] when the
    /// identity is a client and the new tag list is non-empty.
    pub fn update_skills(
        &mut self,
        skills: Vec<SkillTag>,
        clock: &impl Clock,
    ) -> Result<(), IdentityDomainError> {
        if self.role == Role::Client && !skills.is_empty() {
            return Err(IdentityDomainError::SkillsRequireProviderRole);
        }
        self.skills = skills;
        self.touch(clock);
        Ok(())
    }

    /// Marks the identity as verified.
    pub fn mark_verified(&mut self, clock: &impl Clock) {
        self.verified = true;
        self.touch(clock);
    }

    /// Folds a received review rating into the running average.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::InvalidReviewRating`] when the rating
    /// lies outside 1-5.
    #[expect(
        clippy::float_arithmetic,
        reason = "the rating is a floating-point running average"
    )]
    pub fn record_review(
        &mut self,
        rating: u8,
        clock: &impl Clock,
    ) -> Result<(), IdentityDomainError> {
        if !(1..=5).contains(&rating) {
            return Err(IdentityDomainError::InvalidReviewRating(rating));
        }

        let previous_total = self.rating * f64::from(self.review_count);
        self.review_count = self.review_count.saturating_add(1);
        self.rating = (previous_total + f64::from(rating)) / f64::from(self.review_count);
        self.touch(clock);
        Ok(())
    }

    /// Credits points to the balance.
    pub fn credit_points(&mut self, amount: u32, clock: &impl Clock) {
        self.apply_credit(amount, clock.utc());
    }

    /// Debits points from the balance, floored at zero.
    pub fn debit_points(&mut self, amount: u32, clock: &impl Clock) {
        self.points = self.points.saturating_sub(i64::from(amount)).max(0);
        self.updated_at = clock.utc();
    }

    /// Applies a points credit with an explicit timestamp.
    ///
    /// Used by repository adapters that apply several credits atomically and
    /// therefore carry the timestamp instead of a clock.
    pub(crate) fn apply_credit(&mut self, amount: u32, now: DateTime<Utc>) {
        self.points = self.points.saturating_add(i64::from(amount));
        self.updated_at = now;
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
