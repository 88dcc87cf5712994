//! `PostgreSQL` repository implementation for identity storage.

use super::{
    models::{IdentityRow, NewIdentityRow},
    schema::identities,
};
use crate::identity::{
    domain::{
        DisplayName, EmailAddress, Identity, IdentityId, PasswordHash, PersistedIdentityData,
        Role, SkillTag,
    },
    ports::{IdentityRepository, IdentityRepositoryError, IdentityRepositoryResult, PointsCredit},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by identity adapters.
pub type IdentityPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed identity repository.
#[derive(Debug, Clone)]
pub struct PostgresIdentityRepository {
    pool: IdentityPgPool,
}

/// Transaction-internal error that satisfies Diesel's `From` requirement.
enum TxError {
    Repository(IdentityRepositoryError),
    Diesel(DieselError),
}

impl From<DieselError> for TxError {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

impl From<TxError> for IdentityRepositoryError {
    fn from(err: TxError) -> Self {
        match err {
            TxError::Repository(repository_err) => repository_err,
            TxError::Diesel(diesel_err) => Self::persistence(diesel_err),
        }
    }
}

impl PostgresIdentityRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: IdentityPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> IdentityRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> IdentityRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(IdentityRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(IdentityRepositoryError::persistence)?
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn store(&self, identity: &Identity) -> IdentityRepositoryResult<()> {
        let identity_id = identity.id();
        let email = identity.email().clone();
        let new_row = to_new_row(identity)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(identities::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_email_unique_violation(info.as_ref()) =>
                    {
                        IdentityRepositoryError::DuplicateEmail(email.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        IdentityRepositoryError::DuplicateIdentity(identity_id)
                    }
                    _ => IdentityRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, identity: &Identity) -> IdentityRepositoryResult<()> {
        let identity_id = identity.id();
        let email = identity.email().clone();
        let row = to_new_row(identity)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                identities::table.filter(identities::id.eq(identity_id.into_inner())),
            )
            .set((
                identities::display_name.eq(&row.display_name),
                identities::email.eq(&row.email),
                identities::password_hash.eq(&row.password_hash),
                identities::role.eq(&row.role),
                identities::skills.eq(&row.skills),
                identities::verified.eq(row.verified),
                identities::rating.eq(row.rating),
                identities::review_count.eq(row.review_count),
                identities::points.eq(row.points),
                identities::updated_at.eq(row.updated_at),
            ))
            .execute(connection)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                    if is_email_unique_violation(info.as_ref()) =>
                {
                    IdentityRepositoryError::DuplicateEmail(email.clone())
                }
                _ => IdentityRepositoryError::persistence(err),
            })?;

            if affected == 0 {
                return Err(IdentityRepositoryError::NotFound(identity_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: IdentityId) -> IdentityRepositoryResult<Option<Identity>> {
        self.run_blocking(move |connection| {
            let row = identities::table
                .filter(identities::id.eq(id.into_inner()))
                .select(IdentityRow::as_select())
                .first::<IdentityRow>(connection)
                .optional()
                .map_err(IdentityRepositoryError::persistence)?;
            row.map(row_to_identity).transpose()
        })
        .await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> IdentityRepositoryResult<Option<Identity>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = identities::table
                .filter(identities::email.eq(&lookup))
                .select(IdentityRow::as_select())
                .first::<IdentityRow>(connection)
                .optional()
                .map_err(IdentityRepositoryError::persistence)?;
            row.map(row_to_identity).transpose()
        })
        .await
    }

    async fn credit_all(
        &self,
        credits: &[PointsCredit],
        now: DateTime<Utc>,
    ) -> IdentityRepositoryResult<()> {
        let batch: Vec<PointsCredit> = credits.to_vec();
        self.run_blocking(move |connection| {
            connection
                .transaction::<(), TxError, _>(|inner| {
                    for credit in &batch {
                        let affected = diesel::update(
                            identities::table
                                .filter(identities::id.eq(credit.identity.into_inner())),
                        )
                        .set((
                            identities::points
                                .eq(identities::points + i64::from(credit.amount)),
                            identities::updated_at.eq(now),
                        ))
                        .execute(inner)?;

                        if affected == 0 {
                            return Err(TxError::Repository(IdentityRepositoryError::NotFound(
                                credit.identity,
                            )));
                        }
                    }
                    Ok(())
                })
                .map_err(IdentityRepositoryError::from)
        })
        .await
    }
}

fn to_new_row(identity: &Identity) -> IdentityRepositoryResult<NewIdentityRow> {
    let skills =
        serde_json::to_value(identity.skills()).map_err(IdentityRepositoryError::persistence)?;
    let review_count = i32::try_from(identity.review_count())
        .map_err(IdentityRepositoryError::persistence)?;

    Ok(NewIdentityRow {
        id: identity.id().into_inner(),
        display_name: identity.display_name().as_str().to_owned(),
        email: identity.email().as_str().to_owned(),
        password_hash: identity.password_hash().as_str().to_owned(),
        role: identity.role().as_str().to_owned(),
        skills,
        verified: identity.verified(),
        rating: identity.rating(),
        review_count,
        points: identity.points(),
        created_at: identity.created_at(),
        updated_at: identity.updated_at(),
    })
}

fn row_to_identity(row: IdentityRow) -> IdentityRepositoryResult<Identity> {
    let IdentityRow {
        id,
        display_name,
        email,
        password_hash,
        role: persisted_role,
        skills: persisted_skills,
        verified,
        rating,
        review_count,
        points,
        created_at,
        updated_at,
    } = row;

    let data = PersistedIdentityData {
        id: IdentityId::from_uuid(id),
        display_name: DisplayName::new(display_name)
            .map_err(IdentityRepositoryError::persistence)?,
        email: EmailAddress::new(email).map_err(IdentityRepositoryError::persistence)?,
        password_hash: PasswordHash::new(password_hash)
            .map_err(IdentityRepositoryError::persistence)?,
        role: Role::try_from(persisted_role.as_str())
            .map_err(IdentityRepositoryError::persistence)?,
        skills: serde_json::from_value::<Vec<SkillTag>>(persisted_skills)
            .map_err(IdentityRepositoryError::persistence)?,
        verified,
        rating,
        review_count: u32::try_from(review_count)
            .map_err(IdentityRepositoryError::persistence)?,
        points,
        created_at,
        updated_at,
    };
    Ok(Identity::from_persisted(data))
}

fn is_email_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "identities_email_key")
}
