//! Service orchestration tests for the points ledger.

use std::sync::Arc;

use crate::identity::{
    adapters::memory::InMemoryIdentityRepository,
    domain::{
        DisplayName, EmailAddress, Identity, IdentityId, PasswordHash, Role,
    },
    ports::{IdentityRepository, PointsCredit},
    services::{PointsLedgerError, PointsLedgerService},
};
use chrono::Utc;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = PointsLedgerService<InMemoryIdentityRepository, DefaultClock>;

#[fixture]
fn repository() -> Arc<InMemoryIdentityRepository> {
    Arc::new(InMemoryIdentityRepository::new())
}

fn build_identity(email: &str) -> Identity {
    Identity::new(
        DisplayName::new("Points Holder").expect("valid display name"),
        EmailAddress::new(email).expect("valid email"),
        PasswordHash::new("digest").expect("valid hash"),
        Role::Provider,
        Vec::new(),
        &DefaultClock,
    )
    .expect("valid identity")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn credit_and_debit_round_trip(repository: Arc<InMemoryIdentityRepository>) {
    let identity = build_identity("ledger@example.com");
    repository.store(&identity).await.expect("store should succeed");
    let service = TestService::new(Arc::clone(&repository), Arc::new(DefaultClock));

    let credited = service
        .credit(identity.id(), 25)
        .await
        .expect("credit should succeed");
    assert_eq!(credited.points(), 25);

    let debited = service
        .debit(identity.id(), 10)
        .await
        .expect("debit should succeed");
    assert_eq!(debited.points(), 15);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn debit_never_produces_a_negative_balance(repository: Arc<InMemoryIdentityRepository>) {
    let identity = build_identity("floor@example.com");
    repository.store(&identity).await.expect("store should succeed");
    let service = TestService::new(Arc::clone(&repository), Arc::new(DefaultClock));

    service
        .credit(identity.id(), 40)
        .await
        .expect("credit should succeed");
    let debited = service
        .debit(identity.id(), 140)
        .await
        .expect("debit should succeed");
    assert_eq!(debited.points(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn operations_on_unknown_identities_fail_not_found(
    repository: Arc<InMemoryIdentityRepository>,
) {
    let service = TestService::new(Arc::clone(&repository), Arc::new(DefaultClock));
    let missing = IdentityId::new();

    let credit = service.credit(missing, 5).await;
    assert!(matches!(credit, Err(PointsLedgerError::NotFound(id)) if id == missing));

    let debit = service.debit(missing, 5).await;
    assert!(matches!(debit, Err(PointsLedgerError::NotFound(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn credit_all_is_atomic_across_the_batch(repository: Arc<InMemoryIdentityRepository>) {
    let funded = build_identity("funded@example.com");
    repository.store(&funded).await.expect("store should succeed");
    let missing = IdentityId::new();

    let result = repository
        .credit_all(
            &[
                PointsCredit::new(funded.id(), 10),
                PointsCredit::new(missing, 20),
            ],
            Utc::now(),
        )
        .await;
    assert!(result.is_err());

    let reloaded = repository
        .find_by_id(funded.id())
        .await
        .expect("lookup should succeed")
        .expect("identity should exist");
    assert_eq!(reloaded.points(), 0, "no credit applies when the batch fails");
}
