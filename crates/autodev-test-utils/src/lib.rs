//! Testing utilities for autodev workspace
//!
//! Shared fixtures and stub collaborators.

#![allow(missing_docs)]

use async_trait::async_trait;
use autodev_core::{
    AcceptanceCriterion, CompletionRequest, ModelClient, ModelError, PlanningRequest, Priority,
    TechHints,
};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn request(title: &str, description: &str, requires_auth: bool) -> PlanningRequest {
    PlanningRequest::new("US-TEST", "session-test", title, description)
        .with_hints(TechHints::new().with_auth(requires_auth))
        .with_project("demo-project")
}

/// The login story used by the orchestrator demo
pub fn user_authentication_request() -> PlanningRequest {
    PlanningRequest::new(
        "US-001",
        "session_US-001",
        "User Authentication",
        "As a user, I want to log in with email and password so that I can access my account",
    )
    .with_criteria(vec![
        AcceptanceCriterion::new(1, "User can enter email and password", Priority::MustHave),
        AcceptanceCriterion::new(2, "System validates credentials", Priority::MustHave),
        AcceptanceCriterion::new(3, "User receives JWT token on success", Priority::MustHave),
    ])
    .with_hints(TechHints::new().with_auth(true))
    .with_project("demo-project")
}

pub fn ecommerce_catalog_request() -> PlanningRequest {
    PlanningRequest::new(
        "US-002",
        "session_US-002",
        "E-commerce Product Catalog",
        "As a customer, I want to browse products by category and filter by price",
    )
    .with_criteria(vec![AcceptanceCriterion::new(
        1,
        "Products are paginated",
        Priority::ShouldHave,
    )])
    .with_hints(TechHints::new().with_auth(true))
    .with_project("demo-project")
}

/// Model stub that answers every call with the same text
#[derive(Debug)]
pub struct CannedModelClient {
    reply: String,
    calls: AtomicUsize,
}

impl CannedModelClient {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelClient for CannedModelClient {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Model stub whose every call fails at the transport level
#[derive(Debug, Default)]
pub struct UnreachableModelClient;

#[async_trait]
impl ModelClient for UnreachableModelClient {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, ModelError> {
        Err(ModelError::transport("connection refused"))
    }
}
