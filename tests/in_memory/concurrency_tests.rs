//! Optimistic-versioning behaviour under racing writes.

use super::helpers::{Marketplace, marketplace, register_client, register_provider};
use chrono::{Duration, Utc};
use doit::task::domain::{TaskDomainError, TaskState};
use doit::task::ports::{TaskRepository, TaskRepositoryError};
use doit::task::services::{CreateTaskRequest, SubmitBidRequest, TaskLifecycleError};
use mockable::DefaultClock;
use rstest::rstest;

fn create_request(client: doit::identity::domain::IdentityId) -> CreateTaskRequest {
    CreateTaskRequest::new(
        client,
        "Move a piano",
        "Upright piano, ground floor to first floor.",
        "moving",
        "3 Quay Street",
        150_00,
        Utc::now() + Duration::days(1),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_aggregates_are_rejected_with_a_version_conflict(marketplace: Marketplace) {
    let client = register_client(&marketplace, "client@example.com").await;
    let created = marketplace
        .lifecycle
        .create(create_request(client))
        .await
        .expect("task creation should succeed");

    // Two callers load the same version of the task.
    let first_copy = marketplace
        .tasks
        .find_by_id(created.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    let mut second_copy = first_copy.clone();

    // The first write wins and bumps the stored version.
    let clock = DefaultClock;
    let mut first_mutation = first_copy.clone();
    first_mutation
        .cancel(client, &clock)
        .expect("cancellation should succeed");
    marketplace
        .tasks
        .update(&first_mutation)
        .await
        .expect("first write should win");

    // The second write carries the stale version and is rejected.
    second_copy
        .cancel(client, &clock)
        .expect("cancellation on the stale copy is domain-legal");
    let stale = marketplace.tasks.update(&second_copy).await;
    assert!(matches!(
        stale,
        Err(TaskRepositoryError::VersionConflict {
            expected: 1,
            actual: 2,
            ..
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exactly_one_of_two_racing_assignments_wins(marketplace: Marketplace) {
    let client = register_client(&marketplace, "client@example.com").await;
    let first_provider = register_provider(&marketplace, "first@example.com").await;
    let second_provider = register_provider(&marketplace, "second@example.com").await;

    let task = marketplace
        .lifecycle
        .create(create_request(client))
        .await
        .expect("task creation should succeed");
    let first_bid = marketplace
        .lifecycle
        .submit_bid(SubmitBidRequest::new(task.id(), first_provider))
        .await
        .expect("first bid should be accepted");
    let with_bids = marketplace
        .lifecycle
        .submit_bid(SubmitBidRequest::new(task.id(), second_provider))
        .await
        .expect("second bid should be accepted");

    let first_bid_id = first_bid.bids().first().expect("bid should be stored").id();
    let second_bid_id = with_bids
        .bids()
        .iter()
        .find(|bid| bid.bidder() == second_provider)
        .expect("bid should be stored")
        .id();

    let (first_result, second_result) = tokio::join!(
        marketplace.lifecycle.assign_bid(task.id(), client, first_bid_id),
        marketplace.lifecycle.assign_bid(task.id(), client, second_bid_id),
    );

    let winners = [&first_result, &second_result]
        .iter()
        .filter(|result| result.is_ok())
        .count();
    assert_eq!(winners, 1, "exactly one assignment must win");

    let loser = if first_result.is_ok() {
        second_result
    } else {
        first_result
    };
    assert!(matches!(
        loser,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidStateTransition { .. }
        ) | TaskLifecycleError::Repository(
            TaskRepositoryError::VersionConflict { .. }
        ))
    ));

    let stored = marketplace
        .tasks
        .find_by_id(task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(stored.state(), TaskState::Assigned);
    assert!(stored.provider().is_some());
}
