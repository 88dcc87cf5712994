//! Service orchestration tests for review creation.

use std::sync::Arc;

use crate::identity::{
    adapters::memory::InMemoryIdentityRepository,
    domain::{DisplayName, EmailAddress, Identity, IdentityId, PasswordHash, Role, SkillTag},
    ports::IdentityRepository,
};
use crate::review::{
    adapters::memory::InMemoryReviewRepository,
    ports::ReviewRepositoryError,
    services::{CreateReviewRequest, ReviewService, ReviewServiceError},
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Budget, Task, TaskDraft, TaskId, Urgency},
    ports::TaskRepository,
};
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = ReviewService<
    InMemoryReviewRepository,
    InMemoryTaskRepository,
    InMemoryIdentityRepository,
    DefaultClock,
>;

struct ReviewStand {
    tasks: Arc<InMemoryTaskRepository>,
    identities: Arc<InMemoryIdentityRepository>,
    service: TestService,
}

#[fixture]
fn stand() -> ReviewStand {
    let reviews = Arc::new(InMemoryReviewRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let identities = Arc::new(InMemoryIdentityRepository::new());
    let service = ReviewService::new(
        reviews,
        Arc::clone(&tasks),
        Arc::clone(&identities),
        Arc::new(DefaultClock),
    );
    ReviewStand {
        tasks,
        identities,
        service,
    }
}

async fn register(
    identities: &InMemoryIdentityRepository,
    role: Role,
    email: &str,
) -> IdentityId {
    let skills = match role {
        Role::Provider => vec![SkillTag::new("gardening").expect("valid skill")],
        Role::Client => Vec::new(),
    };
    let identity = Identity::new(
        DisplayName::new("Review Person").expect("valid display name"),
        EmailAddress::new(email).expect("valid email"),
        PasswordHash::new("digest").expect("valid hash"),
        role,
        skills,
        &DefaultClock,
    )
    .expect("valid identity");
    identities
        .store(&identity)
        .await
        .expect("identity store should succeed");
    identity.id()
}

/// Stores a task in the given lifecycle stage and returns its id.
async fn stored_task(
    tasks: &InMemoryTaskRepository,
    client: IdentityId,
    provider: IdentityId,
    completed: bool,
) -> TaskId {
    let clock = DefaultClock;
    let mut task = Task::new(
        TaskDraft {
            client,
            title: "Prune the hedges".to_owned(),
            description: "Front and back hedges need shaping.".to_owned(),
            category: "gardening".to_owned(),
            location: "9 Birch Lane".to_owned(),
            budget: Budget::from_minor_units(60_00).expect("valid budget"),
            scheduled_at: Utc::now() + Duration::days(2),
            skills_required: Vec::new(),
            urgency: Urgency::Low,
        },
        &clock,
    )
    .expect("valid draft");
    task.book(client, provider, &clock).expect("booking should succeed");
    task.accept(provider, &clock).expect("acceptance should succeed");
    if completed {
        task.complete(provider, &clock).expect("completion should succeed");
    }
    tasks.store(&task).await.expect("task store should succeed");
    task.id()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn review_updates_the_reviewee_statistics(stand: ReviewStand) {
    let client = register(&stand.identities, Role::Client, "client@example.com").await;
    let provider = register(&stand.identities, Role::Provider, "provider@example.com").await;
    let task_id = stored_task(&stand.tasks, client, provider, true).await;

    let review = stand
        .service
        .create(
            CreateReviewRequest::new(task_id, client, provider, 4)
                .with_comment("Quick and careful."),
        )
        .await
        .expect("review creation should succeed");

    assert_eq!(review.rating().value(), 4);
    assert_eq!(review.reviewer(), client);

    let reviewee = stand
        .identities
        .find_by_id(provider)
        .await
        .expect("lookup should succeed")
        .expect("identity should exist");
    assert_eq!(reviewee.rating(), 4.0);
    assert_eq!(reviewee.review_count(), 1);

    let listed = stand
        .service
        .list_for_reviewee(provider)
        .await
        .expect("listing should succeed");
    assert_eq!(listed, vec![review]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn both_participants_may_review_each_other_once(stand: ReviewStand) {
    let client = register(&stand.identities, Role::Client, "client@example.com").await;
    let provider = register(&stand.identities, Role::Provider, "provider@example.com").await;
    let task_id = stored_task(&stand.tasks, client, provider, true).await;

    stand
        .service
        .create(CreateReviewRequest::new(task_id, client, provider, 5))
        .await
        .expect("client review should succeed");
    stand
        .service
        .create(CreateReviewRequest::new(task_id, provider, client, 3))
        .await
        .expect("provider review should succeed");

    let duplicate = stand
        .service
        .create(CreateReviewRequest::new(task_id, client, provider, 2))
        .await;
    assert!(matches!(
        duplicate,
        Err(ReviewServiceError::Repository(
            ReviewRepositoryError::DuplicateTaskReviewer { .. }
        ))
    ));

    let listed = stand
        .service
        .list_for_task(task_id)
        .await
        .expect("listing should succeed");
    assert_eq!(listed.len(), 2);
}

#[rstest]
#[case(0)]
#[case(6)]
#[tokio::test(flavor = "multi_thread")]
async fn out_of_range_ratings_are_rejected(#[case] rating: u8, stand: ReviewStand) {
    let client = register(&stand.identities, Role::Client, "client@example.com").await;
    let provider = register(&stand.identities, Role::Provider, "provider@example.com").await;
    let task_id = stored_task(&stand.tasks, client, provider, true).await;

    let result = stand
        .service
        .create(CreateReviewRequest::new(task_id, client, provider, rating))
        .await;
    assert!(matches!(result, Err(ReviewServiceError::Domain(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reviews_require_a_completed_task(stand: ReviewStand) {
    let client = register(&stand.identities, Role::Client, "client@example.com").await;
    let provider = register(&stand.identities, Role::Provider, "provider@example.com").await;
    let task_id = stored_task(&stand.tasks, client, provider, false).await;

    let result = stand
        .service
        .create(CreateReviewRequest::new(task_id, client, provider, 4))
        .await;
    assert!(matches!(
        result,
        Err(ReviewServiceError::TaskNotCompleted(id)) if id == task_id
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn participation_is_required_on_both_sides(stand: ReviewStand) {
    let client = register(&stand.identities, Role::Client, "client@example.com").await;
    let provider = register(&stand.identities, Role::Provider, "provider@example.com").await;
    let outsider = register(&stand.identities, Role::Client, "outsider@example.com").await;
    let task_id = stored_task(&stand.tasks, client, provider, true).await;

    let foreign_reviewer = stand
        .service
        .create(CreateReviewRequest::new(task_id, outsider, provider, 4))
        .await;
    assert!(matches!(
        foreign_reviewer,
        Err(ReviewServiceError::ReviewerNotParticipant { reviewer, .. }) if reviewer == outsider
    ));

    let foreign_reviewee = stand
        .service
        .create(CreateReviewRequest::new(task_id, client, outsider, 4))
        .await;
    assert!(matches!(
        foreign_reviewee,
        Err(ReviewServiceError::RevieweeNotParticipant { reviewee, .. }) if reviewee == outsider
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unresolved_references_fail_not_found(stand: ReviewStand) {
    let client = register(&stand.identities, Role::Client, "client@example.com").await;

    let result = stand
        .service
        .create(CreateReviewRequest::new(
            TaskId::new(),
            client,
            IdentityId::new(),
            4,
        ))
        .await;
    assert!(matches!(result, Err(ReviewServiceError::TaskNotFound(_))));
}
