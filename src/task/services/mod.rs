//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    CLIENT_COMPLETION_AWARD, CreateTaskRequest, PROVIDER_COMPLETION_AWARD, SubmitBidRequest,
    TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
