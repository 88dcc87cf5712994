//! Service layer for identity registration, authentication, and profiles.

use crate::fault::{Fault, FaultKind};
use crate::identity::{
    domain::{
        DisplayName, EmailAddress, Identity, IdentityDomainError, IdentityId, ParseRoleError,
        Role, SkillTag,
    },
    ports::{IdentityRepository, IdentityRepositoryError, PasswordHasher, PasswordHasherError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a new identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterIdentityRequest {
    display_name: String,
    email: String,
    password: String,
    role: String,
    skills: Vec<String>,
}

impl RegisterIdentityRequest {
    /// Creates a registration request with required fields.
    #[must_use]
    pub fn new(
        display_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
            password: password.into(),
            role: role.into(),
            skills: Vec::new(),
        }
    }

    /// Sets provider skill tags.
    #[must_use]
    pub fn with_skills(mut self, skills: impl IntoIterator<Item = String>) -> Self {
        self.skills = skills.into_iter().collect();
        self
    }
}

/// Request payload for updating an identity profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    identity: IdentityId,
    display_name: Option<String>,
    skills: Option<Vec<String>>,
}

impl UpdateProfileRequest {
    /// Creates an empty profile update for the given identity.
    #[must_use]
    pub const fn new(identity: IdentityId) -> Self {
        Self {
            identity,
            display_name: None,
            skills: None,
        }
    }

    /// Sets a new display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Replaces the provider skill tags.
    #[must_use]
    pub fn with_skills(mut self, skills: impl IntoIterator<Item = String>) -> Self {
        self.skills = Some(skills.into_iter().collect());
        self
    }
}

/// Service-level errors for identity account operations.
#[derive(Debug, Error)]
pub enum IdentityAccountError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// The role value is not a known marketplace role.
    #[error(transparent)]
    InvalidRole(#[from] ParseRoleError),
    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordHasherError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] IdentityRepositoryError),
    /// No identity exists with the given identifier.
    #[error("identity {0} not found")]
    NotFound(IdentityId),
    /// The email/password pair did not authenticate.
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl Fault for IdentityAccountError {
    fn fault_kind(&self) -> FaultKind {
        match self {
            Self::Domain(_) | Self::InvalidRole(_) => FaultKind::Validation,
            Self::Password(PasswordHasherError::EmptyPassword) => FaultKind::Validation,
            Self::Password(PasswordHasherError::MalformedHash) => FaultKind::Internal,
            Self::Repository(err) => err.fault_kind(),
            Self::NotFound(_) => FaultKind::NotFound,
            Self::InvalidCredentials => FaultKind::Unauthorized,
        }
    }
}

/// Result type for identity account operations.
pub type IdentityAccountResult<T> = Result<T, IdentityAccountError>;

/// Identity account orchestration service.
#[derive(Clone)]
pub struct IdentityAccountService<R, H, C>
where
    R: IdentityRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<C>,
}

impl<R, H, C> IdentityAccountService<R, H, C>
where
    R: IdentityRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    /// Creates a new account service.
    #[must_use]
    pub const fn new(repository: Arc<R>, hasher: Arc<H>, clock: Arc<C>) -> Self {
        Self {
            repository,
            hasher,
            clock,
        }
    }

    async fn find_identity_or_error(
        &self,
        identity_id: IdentityId,
    ) -> IdentityAccountResult<Identity> {
        self.repository
            .find_by_id(identity_id)
            .await?
            .ok_or(IdentityAccountError::NotFound(identity_id))
    }

    /// Registers a new identity.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityAccountError`] when validation fails, the password
    /// cannot be hashed, or the email address is already registered.
    pub async fn register(
        &self,
        request: RegisterIdentityRequest,
    ) -> IdentityAccountResult<Identity> {
        let display_name = DisplayName::new(request.display_name)?;
        let email = EmailAddress::new(request.email)?;
        let role = Role::try_from(request.role.as_str())?;
        let skills = request
            .skills
            .into_iter()
            .map(SkillTag::new)
            .collect::<Result<Vec<_>, _>>()?;
        let password_hash = self.hasher.hash(&request.password)?;

        let identity = Identity::new(
            display_name,
            email,
            password_hash,
            role,
            skills,
            &*self.clock,
        )?;
        self.repository.store(&identity).await?;
        Ok(identity)
    }

    /// Authenticates an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityAccountError::InvalidCredentials`] when the email
    /// is unknown or the password does not match; the two cases are not
    /// distinguished.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> IdentityAccountResult<Identity> {
        let Ok(parsed) = EmailAddress::new(email) else {
            return Err(IdentityAccountError::InvalidCredentials);
        };
        let Some(identity) = self.repository.find_by_email(&parsed).await? else {
            return Err(IdentityAccountError::InvalidCredentials);
        };

        let matches = self.hasher.verify(password, identity.password_hash())?;
        if !matches {
            return Err(IdentityAccountError::InvalidCredentials);
        }
        Ok(identity)
    }

    /// Retrieves an identity by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityAccountError::NotFound`] when the identity does
    /// not exist.
    pub async fn get(&self, identity_id: IdentityId) -> IdentityAccountResult<Identity> {
        self.find_identity_or_error(identity_id).await
    }

    /// Applies a profile update.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityAccountError`] when the identity does not exist or
    /// a supplied value fails validation.
    pub async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> IdentityAccountResult<Identity> {
        let mut identity = self.find_identity_or_error(request.identity).await?;

        if let Some(display_name) = request.display_name {
            identity.rename(DisplayName::new(display_name)?, &*self.clock);
        }
        if let Some(skills) = request.skills {
            let tags = skills
                .into_iter()
                .map(SkillTag::new)
                .collect::<Result<Vec<_>, _>>()?;
            identity.update_skills(tags, &*self.clock)?;
        }

        self.repository.update(&identity).await?;
        Ok(identity)
    }

    /// Marks an identity as verified.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityAccountError::NotFound`] when the identity does
    /// not exist.
    pub async fn mark_verified(&self, identity_id: IdentityId) -> IdentityAccountResult<Identity> {
        let mut identity = self.find_identity_or_error(identity_id).await?;
        identity.mark_verified(&*self.clock);
        self.repository.update(&identity).await?;
        Ok(identity)
    }
}
