//! `PostgreSQL` repository implementation for review storage.

use super::{
    models::{NewReviewRow, ReviewRow},
    schema::reviews,
};
use crate::identity::domain::IdentityId;
use crate::review::{
    domain::{PersistedReviewData, Rating, Review, ReviewId},
    ports::{ReviewRepository, ReviewRepositoryError, ReviewRepositoryResult},
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by review adapters.
pub type ReviewPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed review repository.
#[derive(Debug, Clone)]
pub struct PostgresReviewRepository {
    pool: ReviewPgPool,
}

impl PostgresReviewRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ReviewPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReviewRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReviewRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ReviewRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ReviewRepositoryError::persistence)?
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn store(&self, review: &Review) -> ReviewRepositoryResult<()> {
        let review_id = review.id();
        let task_id = review.task();
        let reviewer = review.reviewer();
        let new_row = to_new_row(review)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(reviews::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_task_reviewer_unique_violation(info.as_ref()) =>
                    {
                        ReviewRepositoryError::DuplicateTaskReviewer { task_id, reviewer }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReviewRepositoryError::DuplicateReview(review_id)
                    }
                    _ => ReviewRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ReviewId) -> ReviewRepositoryResult<Option<Review>> {
        self.run_blocking(move |connection| {
            let row = reviews::table
                .filter(reviews::id.eq(id.into_inner()))
                .select(ReviewRow::as_select())
                .first::<ReviewRow>(connection)
                .optional()
                .map_err(ReviewRepositoryError::persistence)?;
            row.map(row_to_review).transpose()
        })
        .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> ReviewRepositoryResult<Vec<Review>> {
        self.run_blocking(move |connection| {
            let rows = reviews::table
                .filter(reviews::task_id.eq(task_id.into_inner()))
                .order(reviews::created_at.desc())
                .select(ReviewRow::as_select())
                .load::<ReviewRow>(connection)
                .map_err(ReviewRepositoryError::persistence)?;
            rows.into_iter().map(row_to_review).collect()
        })
        .await
    }

    async fn find_by_reviewee(
        &self,
        reviewee: IdentityId,
    ) -> ReviewRepositoryResult<Vec<Review>> {
        self.run_blocking(move |connection| {
            let rows = reviews::table
                .filter(reviews::reviewee_id.eq(reviewee.into_inner()))
                .order(reviews::created_at.desc())
                .select(ReviewRow::as_select())
                .load::<ReviewRow>(connection)
                .map_err(ReviewRepositoryError::persistence)?;
            rows.into_iter().map(row_to_review).collect()
        })
        .await
    }
}

fn to_new_row(review: &Review) -> ReviewRepositoryResult<NewReviewRow> {
    Ok(NewReviewRow {
        id: review.id().into_inner(),
        task_id: review.task().into_inner(),
        reviewer_id: review.reviewer().into_inner(),
        reviewee_id: review.reviewee().into_inner(),
        rating: i16::from(review.rating().value()),
        comment: review.comment().map(str::to_owned),
        created_at: review.created_at(),
    })
}

fn row_to_review(row: ReviewRow) -> ReviewRepositoryResult<Review> {
    let ReviewRow {
        id,
        task_id,
        reviewer_id,
        reviewee_id,
        rating: persisted_rating,
        comment,
        created_at,
    } = row;

    let rating_value =
        u8::try_from(persisted_rating).map_err(ReviewRepositoryError::persistence)?;
    let data = PersistedReviewData {
        id: ReviewId::from_uuid(id),
        task: TaskId::from_uuid(task_id),
        reviewer: IdentityId::from_uuid(reviewer_id),
        reviewee: IdentityId::from_uuid(reviewee_id),
        rating: Rating::new(rating_value).map_err(ReviewRepositoryError::persistence)?,
        comment,
        created_at,
    };
    Ok(Review::from_persisted(data))
}

fn is_task_reviewer_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_reviews_task_reviewer_unique")
}
