//! Tests for completion, its points side effect, and award failure
//! handling.

use std::sync::Arc;

use super::fixtures::{Marketplace, create_request, marketplace, register};
use crate::identity::{
    adapters::memory::InMemoryIdentityRepository,
    domain::{EmailAddress, Identity, IdentityId, Role},
    ports::{
        IdentityRepository, IdentityRepositoryError, IdentityRepositoryResult, PointsCredit,
    },
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{TaskDomainError, TaskId, TaskState},
    ports::TaskRepository,
    services::{
        CLIENT_COMPLETION_AWARD, PROVIDER_COMPLETION_AWARD, SubmitBidRequest, TaskLifecycleError,
        TaskLifecycleService,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use rstest::rstest;

async fn points_of(identities: &InMemoryIdentityRepository, id: IdentityId) -> i64 {
    identities
        .find_by_id(id)
        .await
        .expect("lookup should succeed")
        .expect("identity should exist")
        .points()
}

/// Drives a task from creation through acceptance and returns its id.
async fn accepted_task(
    marketplace: &Marketplace,
    client: IdentityId,
    provider: IdentityId,
) -> TaskId {
    let task = marketplace
        .service
        .create(create_request(client))
        .await
        .expect("creation should succeed");
    let with_bid = marketplace
        .service
        .submit_bid(SubmitBidRequest::new(task.id(), provider).with_amount_minor(95_00))
        .await
        .expect("bid should be accepted");
    let bid_id = with_bid.bids().first().expect("bid should be stored").id();
    marketplace
        .service
        .assign_bid(task.id(), client, bid_id)
        .await
        .expect("assignment should succeed");
    marketplace
        .service
        .accept(task.id(), provider)
        .await
        .expect("acceptance should succeed");
    task.id()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_awards_points_to_both_participants() {
    let market = marketplace();
    let client = register(&market.identities, Role::Client, "client@example.com").await;
    let provider = register(&market.identities, Role::Provider, "provider@example.com").await;
    let task_id = accepted_task(&market, client, provider).await;

    let completed = market
        .service
        .complete(task_id, provider)
        .await
        .expect("completion should succeed");

    assert_eq!(completed.state(), TaskState::Completed);
    assert_eq!(
        points_of(&market.identities, client).await,
        i64::from(CLIENT_COMPLETION_AWARD)
    );
    assert_eq!(
        points_of(&market.identities, provider).await,
        i64::from(PROVIDER_COMPLETION_AWARD)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_completion_fails_and_never_double_credits() {
    let market = marketplace();
    let client = register(&market.identities, Role::Client, "client@example.com").await;
    let provider = register(&market.identities, Role::Provider, "provider@example.com").await;
    let task_id = accepted_task(&market, client, provider).await;

    market
        .service
        .complete(task_id, provider)
        .await
        .expect("first completion should succeed");
    let second = market.service.complete(task_id, client).await;

    assert!(matches!(
        second,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidStateTransition {
                from: TaskState::Completed,
                to: TaskState::Completed,
                ..
            }
        ))
    ));
    assert_eq!(
        points_of(&market.identities, client).await,
        i64::from(CLIENT_COMPLETION_AWARD)
    );
    assert_eq!(
        points_of(&market.identities, provider).await,
        i64::from(PROVIDER_COMPLETION_AWARD)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_by_an_outsider_is_forbidden() {
    let market = marketplace();
    let client = register(&market.identities, Role::Client, "client@example.com").await;
    let provider = register(&market.identities, Role::Provider, "provider@example.com").await;
    let outsider = register(&market.identities, Role::Provider, "outsider@example.com").await;
    let task_id = accepted_task(&market, client, provider).await;

    let result = market.service.complete(task_id, outsider).await;
    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::NotParticipant { actor, .. }
        )) if actor == outsider
    ));
    assert_eq!(points_of(&market.identities, client).await, 0);
}

/// Identity repository that fails every credit batch, for award-failure
/// coverage.
#[derive(Clone)]
struct FailingAwardRepository {
    inner: Arc<InMemoryIdentityRepository>,
}

#[async_trait]
impl IdentityRepository for FailingAwardRepository {
    async fn store(&self, identity: &Identity) -> IdentityRepositoryResult<()> {
        self.inner.store(identity).await
    }

    async fn update(&self, identity: &Identity) -> IdentityRepositoryResult<()> {
        self.inner.update(identity).await
    }

    async fn find_by_id(&self, id: IdentityId) -> IdentityRepositoryResult<Option<Identity>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> IdentityRepositoryResult<Option<Identity>> {
        self.inner.find_by_email(email).await
    }

    async fn credit_all(
        &self,
        _credits: &[PointsCredit],
        _now: DateTime<Utc>,
    ) -> IdentityRepositoryResult<()> {
        Err(IdentityRepositoryError::persistence(std::io::Error::other(
            "ledger unavailable",
        )))
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn award_failure_leaves_the_completion_durable_and_detectable() {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let inner = Arc::new(InMemoryIdentityRepository::new());
    let identities = Arc::new(FailingAwardRepository {
        inner: Arc::clone(&inner),
    });
    let service = TaskLifecycleService::new(
        Arc::clone(&tasks),
        Arc::clone(&identities),
        Arc::new(DefaultClock),
    );

    let client = register(&inner, Role::Client, "client@example.com").await;
    let provider = register(&inner, Role::Provider, "provider@example.com").await;
    let task = service
        .create(create_request(client))
        .await
        .expect("creation should succeed");
    service
        .book(task.id(), client, provider)
        .await
        .expect("booking should succeed");
    service
        .accept(task.id(), provider)
        .await
        .expect("acceptance should succeed");

    let result = service.complete(task.id(), provider).await;
    assert!(matches!(
        result,
        Err(TaskLifecycleError::CompletionAwardFailed { task_id, .. }) if task_id == task.id()
    ));

    let stored = tasks
        .find_by_id(task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(stored.state(), TaskState::Completed);
    assert_eq!(points_of(&inner, client).await, 0);
    assert_eq!(points_of(&inner, provider).await, 0);
}
