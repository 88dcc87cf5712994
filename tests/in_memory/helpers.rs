//! Shared test helpers for in-memory repository integration tests.

use std::sync::Arc;

use doit::billing::adapters::memory::InMemoryTransactionRepository;
use doit::billing::services::PaymentLedgerService;
use doit::identity::adapters::memory::InMemoryIdentityRepository;
use doit::identity::adapters::password::Pbkdf2PasswordHasher;
use doit::identity::domain::IdentityId;
use doit::identity::ports::IdentityRepository;
use doit::identity::services::{IdentityAccountService, RegisterIdentityRequest};
use doit::review::adapters::memory::InMemoryReviewRepository;
use doit::review::services::ReviewService;
use doit::task::adapters::memory::InMemoryTaskRepository;
use doit::task::services::TaskLifecycleService;
use mockable::DefaultClock;
use rstest::fixture;

/// Full service stack wired against shared in-memory repositories.
pub struct Marketplace {
    /// Task repository shared by all services.
    pub tasks: Arc<InMemoryTaskRepository>,
    /// Identity repository shared by all services.
    pub identities: Arc<InMemoryIdentityRepository>,
    /// Account registration and authentication service.
    pub accounts:
        IdentityAccountService<InMemoryIdentityRepository, Pbkdf2PasswordHasher, DefaultClock>,
    /// Task lifecycle service.
    pub lifecycle:
        TaskLifecycleService<InMemoryTaskRepository, InMemoryIdentityRepository, DefaultClock>,
    /// Payment-ledger service.
    pub ledger: PaymentLedgerService<
        InMemoryTransactionRepository,
        InMemoryTaskRepository,
        InMemoryIdentityRepository,
        DefaultClock,
    >,
    /// Review service.
    pub reviews: ReviewService<
        InMemoryReviewRepository,
        InMemoryTaskRepository,
        InMemoryIdentityRepository,
        DefaultClock,
    >,
}

/// Provides a freshly wired marketplace for each test.
#[fixture]
pub fn marketplace() -> Marketplace {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let identities = Arc::new(InMemoryIdentityRepository::new());
    let transactions = Arc::new(InMemoryTransactionRepository::new());
    let review_store = Arc::new(InMemoryReviewRepository::new());
    let clock = Arc::new(DefaultClock);

    let accounts = IdentityAccountService::new(
        Arc::clone(&identities),
        Arc::new(Pbkdf2PasswordHasher::with_iterations(16)),
        Arc::clone(&clock),
    );
    let lifecycle = TaskLifecycleService::new(
        Arc::clone(&tasks),
        Arc::clone(&identities),
        Arc::clone(&clock),
    );
    let ledger = PaymentLedgerService::new(
        transactions,
        Arc::clone(&tasks),
        Arc::clone(&identities),
        Arc::clone(&clock),
    );
    let reviews = ReviewService::new(
        review_store,
        Arc::clone(&tasks),
        Arc::clone(&identities),
        Arc::clone(&clock),
    );

    Marketplace {
        tasks,
        identities,
        accounts,
        lifecycle,
        ledger,
        reviews,
    }
}

/// Registers a client account and returns its identity id.
pub async fn register_client(marketplace: &Marketplace, email: &str) -> IdentityId {
    marketplace
        .accounts
        .register(RegisterIdentityRequest::new(
            "Integration Client",
            email,
            "client-password",
            "client",
        ))
        .await
        .expect("client registration should succeed")
        .id()
}

/// Registers a provider account and returns its identity id.
pub async fn register_provider(marketplace: &Marketplace, email: &str) -> IdentityId {
    marketplace
        .accounts
        .register(
            RegisterIdentityRequest::new(
                "Integration Provider",
                email,
                "provider-password",
                "provider",
            )
            .with_skills(vec!["plumbing".to_owned()]),
        )
        .await
        .expect("provider registration should succeed")
        .id()
}

/// Returns the current points balance of an identity.
pub async fn points_of(marketplace: &Marketplace, id: IdentityId) -> i64 {
    marketplace
        .identities
        .find_by_id(id)
        .await
        .expect("lookup should succeed")
        .expect("identity should exist")
        .points()
}
