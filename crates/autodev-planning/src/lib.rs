//! Autodev Planning - The planning agent service
//!
//! Hosts architecture inference behind HTTP:
//! - [`PlanningService`] runs a planning request, caches and logs the result
//! - [`OpenAiChatClient`] backs model generation when a key is configured
//! - [`routes`] exposes the service with warp
//! - [`PlanningSettings`] loads layered configuration with figment

#![warn(unreachable_pub)]

pub mod error;
pub mod openai;
pub mod routes;
pub mod service;
pub mod settings;

pub use autodev_core::PlanningResponse;
pub use error::{ErrorBody, PlanningError};
pub use openai::OpenAiChatClient;
pub use routes::routes;
pub use service::{PlanningService, AGENT_NAME};
pub use settings::{
    ConfigError, ModelSettings, PlanningSettings, ServerSettings, SessionSettings,
    PLACEHOLDER_API_KEY,
};

use autodev_store::{ExecutionLog, JsonlExecutionLog, MokaSessionStore, TracingExecutionLog};
use std::sync::Arc;

/// Wire a service from settings
///
/// Uses the JSONL execution log when a path is configured (tracing events
/// otherwise) and the model client when a usable key is present.
pub fn build_service(settings: &PlanningSettings) -> Result<PlanningService, PlanningError> {
    let sessions = Arc::new(MokaSessionStore::with_ttl(
        settings.session.capacity,
        settings.session_ttl(),
    ));

    let log: Arc<dyn ExecutionLog> = match &settings.execution_log {
        Some(path) => Arc::new(JsonlExecutionLog::new(path)),
        None => Arc::new(TracingExecutionLog::new()),
    };

    let service = PlanningService::new(sessions, log).with_generation(settings.model.generation());

    match OpenAiChatClient::from_settings(&settings.model)
        .map_err(|e| PlanningError::Internal(e.to_string()))?
    {
        Some(client) => {
            tracing::info!(model = client.model(), "Using model-backed planning");
            Ok(service.with_model(Arc::new(client)))
        }
        None => {
            tracing::warn!("No model key configured, using heuristic planning");
            Ok(service)
        }
    }
}
