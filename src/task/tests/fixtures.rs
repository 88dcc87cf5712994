//! Shared fixtures for task lifecycle tests.

use std::sync::Arc;

use crate::identity::{
    adapters::memory::InMemoryIdentityRepository,
    domain::{DisplayName, EmailAddress, Identity, IdentityId, PasswordHash, Role, SkillTag},
    ports::IdentityRepository,
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Budget, TaskDraft, Urgency},
    services::{CreateTaskRequest, TaskLifecycleService},
};
use chrono::{Duration, Utc};
use mockable::DefaultClock;

pub(super) type TestService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryIdentityRepository, DefaultClock>;

/// Repositories and service wired against shared in-memory state.
pub(super) struct Marketplace {
    pub tasks: Arc<InMemoryTaskRepository>,
    pub identities: Arc<InMemoryIdentityRepository>,
    pub service: TestService,
}

pub(super) fn marketplace() -> Marketplace {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let identities = Arc::new(InMemoryIdentityRepository::new());
    let service = TaskLifecycleService::new(
        Arc::clone(&tasks),
        Arc::clone(&identities),
        Arc::new(DefaultClock),
    );
    Marketplace {
        tasks,
        identities,
        service,
    }
}

/// Registers an identity directly against the repository and returns its id.
pub(super) async fn register(
    identities: &InMemoryIdentityRepository,
    role: Role,
    email: &str,
) -> IdentityId {
    let skills = match role {
        Role::Provider => vec![SkillTag::new("plumbing").expect("valid skill")],
        Role::Client => Vec::new(),
    };
    let identity = Identity::new(
        DisplayName::new("Fixture Person").expect("valid display name"),
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

/// A well-formed creation request for the given client.
pub(super) fn create_request(client: IdentityId) -> CreateTaskRequest {
    CreateTaskRequest::new(
        client,
        "Fix the kitchen sink",
        "The sink drains slowly and the trap leaks.",
        "plumbing",
        "12 Canal Street",
        100_00,
        Utc::now() + Duration::days(3),
    )
}

/// A well-formed domain draft for the given client.
pub(super) fn draft(client: IdentityId) -> TaskDraft {
    TaskDraft {
        client,
        title: "Fix the kitchen sink".to_owned(),
        description: "The sink drains slowly and the trap leaks.".to_owned(),
        category: "plumbing".to_owned(),
        location: "12 Canal Street".to_owned(),
        budget: Budget::from_minor_units(100_00).expect("valid budget"),
        scheduled_at: Utc::now() + Duration::days(3),
        skills_required: vec!["plumbing".to_owned()],
        urgency: Urgency::Medium,
    }
}
