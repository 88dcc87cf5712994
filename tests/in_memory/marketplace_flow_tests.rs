//! End-to-end marketplace flow over the in-memory adapters.

use super::helpers::{Marketplace, marketplace, points_of, register_client, register_provider};
use chrono::{Duration, Utc};
use doit::billing::domain::TransactionStatus;
use doit::billing::services::CreateTransactionRequest;
use doit::identity::adapters::jwt::{JwtTokenIssuer, JwtTokenVerifier};
use doit::identity::ports::{IdentityRepository, TokenVerifier};
use doit::review::services::CreateReviewRequest;
use doit::task::domain::{TaskDomainError, TaskState};
use doit::task::services::{
    CLIENT_COMPLETION_AWARD, CreateTaskRequest, PROVIDER_COMPLETION_AWARD, SubmitBidRequest,
    TaskLifecycleError,
};
use rstest::rstest;

fn create_request(client: doit::identity::domain::IdentityId) -> CreateTaskRequest {
    CreateTaskRequest::new(
        client,
        "Repaint the hallway",
        "Two coats, ceiling included, paint provided.",
        "painting",
        "27 Harbour Road",
        100_00,
        Utc::now() + Duration::days(5),
    )
    .with_skills(vec!["painting".to_owned()])
    .with_urgency("high")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_engagement_from_posting_to_review(marketplace: Marketplace) {
    let client = register_client(&marketplace, "client@example.com").await;
    let provider = register_provider(&marketplace, "provider@example.com").await;
    let rival = register_provider(&marketplace, "rival@example.com").await;

    // Post.
    let task = marketplace
        .lifecycle
        .create(create_request(client))
        .await
        .expect("task creation should succeed");
    assert_eq!(task.state(), TaskState::Open);

    // Bid.
    let with_bid = marketplace
        .lifecycle
        .submit_bid(
            SubmitBidRequest::new(task.id(), provider)
                .with_amount_minor(95_00)
                .with_proposal("Weekend slot available, all materials mine.")
                .with_estimated_hours(6),
        )
        .await
        .expect("bid should be accepted");
    assert_eq!(with_bid.bids().len(), 1);
    assert_eq!(with_bid.state(), TaskState::Open);

    // Assign the bid.
    let bid_id = with_bid.bids().first().expect("bid should be stored").id();
    let assigned = marketplace
        .lifecycle
        .assign_bid(task.id(), client, bid_id)
        .await
        .expect("assignment should succeed");
    assert_eq!(assigned.state(), TaskState::Assigned);
    assert_eq!(assigned.provider(), Some(provider));

    // Only the assigned provider may accept.
    let rejected = marketplace.lifecycle.accept(task.id(), rival).await;
    assert!(matches!(
        rejected,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::NotAssignedProvider { .. }
        ))
    ));
    let accepted = marketplace
        .lifecycle
        .accept(task.id(), provider)
        .await
        .expect("acceptance should succeed");
    assert_eq!(accepted.state(), TaskState::Accepted);

    // Work and complete.
    marketplace
        .lifecycle
        .update_status(task.id(), provider, "in_progress")
        .await
        .expect("progress update should succeed");
    let completed = marketplace
        .lifecycle
        .complete(task.id(), provider)
        .await
        .expect("completion should succeed");
    assert_eq!(completed.state(), TaskState::Completed);

    assert_eq!(
        points_of(&marketplace, client).await,
        i64::from(CLIENT_COMPLETION_AWARD)
    );
    assert_eq!(
        points_of(&marketplace, provider).await,
        i64::from(PROVIDER_COMPLETION_AWARD)
    );

    // Ledger entry, recorded independently of completion.
    let transaction = marketplace
        .ledger
        .create(CreateTransactionRequest::new(task.id(), provider, 95_00))
        .await
        .expect("transaction creation should succeed");
    assert_eq!(transaction.status(), TransactionStatus::Paid);
    assert_eq!(transaction.platform_fee_minor(), 9_50);
    assert!(transaction.paid_at().is_some());

    // Both participants review each other.
    marketplace
        .reviews
        .create(
            CreateReviewRequest::new(task.id(), client, provider, 5).with_comment("Spotless work."),
        )
        .await
        .expect("client review should succeed");
    marketplace
        .reviews
        .create(CreateReviewRequest::new(task.id(), provider, client, 4))
        .await
        .expect("provider review should succeed");

    let reviewed_provider = marketplace
        .identities
        .find_by_id(provider)
        .await
        .expect("lookup should succeed")
        .expect("identity should exist");
    assert_eq!(reviewed_provider.rating(), 5.0);
    assert_eq!(reviewed_provider.review_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_completion_does_not_double_credit(marketplace: Marketplace) {
    let client = register_client(&marketplace, "client@example.com").await;
    let provider = register_provider(&marketplace, "provider@example.com").await;

    let task = marketplace
        .lifecycle
        .create(create_request(client))
        .await
        .expect("task creation should succeed");
    marketplace
        .lifecycle
        .book(task.id(), client, provider)
        .await
        .expect("booking should succeed");
    marketplace
        .lifecycle
        .accept(task.id(), provider)
        .await
        .expect("acceptance should succeed");
    marketplace
        .lifecycle
        .complete(task.id(), client)
        .await
        .expect("completion should succeed");

    let second = marketplace.lifecycle.complete(task.id(), client).await;
    assert!(matches!(
        second,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidStateTransition { .. }
        ))
    ));

    assert_eq!(
        points_of(&marketplace, client).await,
        i64::from(CLIENT_COMPLETION_AWARD)
    );
    assert_eq!(
        points_of(&marketplace, provider).await,
        i64::from(PROVIDER_COMPLETION_AWARD)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bearer_tokens_resolve_to_registered_identities(marketplace: Marketplace) {
    let secret = b"integration-secret";
    let issuer = JwtTokenIssuer::new(secret);
    let verifier = JwtTokenVerifier::new(secret);

    let client = register_client(&marketplace, "client@example.com").await;
    let token = issuer
        .issue(client, Utc::now() + Duration::hours(1))
        .expect("token issuing should succeed");

    let resolved = verifier
        .resolve_identity(&format!("Bearer {token}"))
        .expect("token should verify");
    assert_eq!(resolved, client);

    let task = marketplace
        .lifecycle
        .create(create_request(resolved))
        .await
        .expect("task creation for the resolved identity should succeed");
    assert_eq!(task.client(), client);
}
