//! Planning handler
//!
//! Wraps architecture generation with the best-effort side effects of a
//! planning run:
//! - `started` / `completed` / `failed` rows in the execution log
//! - the serialized architecture cached under `architecture:<session_id>`
//!
//! Collaborators are injected; nothing here reaches for globals.

use crate::error::PlanningError;
use autodev_core::{
    generate_with_fallback, heuristic, Architecture, ArchitectureSource, Generation,
    GenerationSettings, ModelClient, PlanningRequest, PlanningResponse,
};
use autodev_store::{
    load_architecture, save_architecture, ExecutionLog, ExecutionLogEntry, ExecutionStatus,
    SessionStore,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

/// Name recorded in execution log rows
pub const AGENT_NAME: &str = "planning_agent";

/// Planning service with injected model, cache and log
#[derive(Clone)]
pub struct PlanningService {
    model: Option<Arc<dyn ModelClient>>,
    sessions: Arc<dyn SessionStore>,
    log: Arc<dyn ExecutionLog>,
    generation: GenerationSettings,
}

impl std::fmt::Debug for PlanningService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanningService")
            .field("model_configured", &self.model.is_some())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl PlanningService {
    /// Create service using the heuristic generator only
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionStore>, log: Arc<dyn ExecutionLog>) -> Self {
        Self {
            model: None,
            sessions,
            log,
            generation: GenerationSettings::default(),
        }
    }

    /// With language-model client; enables model-backed generation
    #[inline]
    #[must_use]
    pub fn with_model(mut self, client: Arc<dyn ModelClient>) -> Self {
        self.model = Some(client);
        self
    }

    /// With generation parameters
    #[inline]
    #[must_use]
    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    /// Whether a model client is configured
    #[inline]
    #[must_use]
    pub fn model_configured(&self) -> bool {
        self.model.is_some()
    }

    /// Plan one story
    ///
    /// Input errors are returned before anything is logged. Log and cache
    /// failures are reported through tracing and never fail the run.
    pub async fn plan(&self, request: PlanningRequest) -> Result<PlanningResponse, PlanningError> {
        let started = Instant::now();
        request.validate()?;

        tracing::info!(
            story_id = %request.story_id,
            session_id = %request.session_id,
            "Planning request received"
        );
        self.record(
            &request.story_id,
            ExecutionStatus::Started,
            json!({ "request": &request }),
        )
        .await;

        let generation = match self.generate(&request).await {
            Ok(generation) => generation,
            Err(e) => {
                self.record_failure(&request, &e).await;
                return Err(e);
            }
        };

        self.cache(&request.session_id, &generation.architecture).await;

        let execution_time_seconds = started.elapsed().as_secs_f64();
        self.record(
            &request.story_id,
            ExecutionStatus::Completed,
            json!({ "architecture": &generation.architecture }),
        )
        .await;

        tracing::info!(
            story_id = %request.story_id,
            source = generation.source.label(),
            elapsed_secs = execution_time_seconds,
            "Planning completed"
        );

        Ok(PlanningResponse::success(
            request,
            generation.architecture,
            execution_time_seconds,
        ))
    }

    /// Cached architecture for `session_id`; `None` once absent or expired
    pub async fn fetch(&self, session_id: &str) -> Result<Option<Architecture>, PlanningError> {
        load_architecture(self.sessions.as_ref(), session_id)
            .await
            .map_err(|e| PlanningError::Internal(e.to_string()))
    }

    async fn generate(&self, request: &PlanningRequest) -> Result<Generation, PlanningError> {
        let generation = match &self.model {
            Some(client) => {
                generate_with_fallback(request, client.as_ref(), &self.generation).await
            }
            None => {
                tracing::debug!(story_id = %request.story_id, "No model configured, using heuristic");
                Generation {
                    architecture: heuristic::generate(request),
                    source: ArchitectureSource::Heuristic,
                }
            }
        };

        generation.architecture.validate()?;
        Ok(generation)
    }

    async fn cache(&self, session_id: &str, architecture: &Architecture) {
        if let Err(e) = save_architecture(self.sessions.as_ref(), session_id, architecture).await {
            tracing::warn!(session_id, error = %e, "Failed to cache architecture");
        }
    }

    async fn record_failure(&self, request: &PlanningRequest, error: &PlanningError) {
        tracing::error!(story_id = %request.story_id, error = %error, "Planning failed");
        self.record(
            &request.story_id,
            ExecutionStatus::Failed,
            json!({ "error": error.to_string() }),
        )
        .await;
    }

    async fn record(&self, story_id: &str, status: ExecutionStatus, output: serde_json::Value) {
        let entry = ExecutionLogEntry::new(story_id, AGENT_NAME, status, output);
        if let Err(e) = self.log.append(entry).await {
            tracing::warn!(story_id, ?status, error = %e, "Failed to record execution");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use autodev_core::prompt::EXAMPLE_ARCHITECTURE;
    use autodev_core::InputError;
    use autodev_store::{MemoryExecutionLog, MokaSessionStore, StoreError, StoreResult};
    use autodev_test_utils::{request, CannedModelClient, UnreachableModelClient};
    use pretty_assertions::assert_eq;

    struct BrokenStore;

    #[async_trait]
    impl SessionStore for BrokenStore {
        async fn put(&self, _key: String, _value: String) -> StoreResult<()> {
            Err(StoreError::Unavailable("connection reset".into()))
        }

        async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Unavailable("connection reset".into()))
        }
    }

    struct BrokenLog;

    #[async_trait]
    impl ExecutionLog for BrokenLog {
        async fn append(&self, _entry: ExecutionLogEntry) -> StoreResult<()> {
            Err(StoreError::Unavailable("disk full".into()))
        }
    }

    fn service() -> (PlanningService, Arc<MemoryExecutionLog>) {
        let log = Arc::new(MemoryExecutionLog::new());
        let service = PlanningService::new(Arc::new(MokaSessionStore::default()), log.clone());
        (service, log)
    }

    #[tokio::test]
    async fn heuristic_plan_is_cached_and_logged() {
        let (service, log) = service();
        let story = request("Task Management", "Users manage tasks", false);

        let response = service.plan(story.clone()).await.unwrap();

        assert_eq!(response.status, "success");
        assert_eq!(response.session_id, "session-test");
        assert_eq!(response.architecture, heuristic::generate(&story));
        assert!(response.execution_time_seconds >= 0.0);

        let cached = service.fetch("session-test").await.unwrap();
        assert_eq!(cached, Some(response.architecture.clone()));

        let rows = log.entries("US-TEST");
        assert_eq!(
            rows.iter().map(|r| r.status).collect::<Vec<_>>(),
            vec![ExecutionStatus::Started, ExecutionStatus::Completed]
        );
        assert_eq!(rows[0].agent_name, AGENT_NAME);
        assert_eq!(rows[0].output["request"]["title"], "Task Management");
        assert_eq!(
            rows[1].output["architecture"]["database"]["tables"][1]["name"],
            "task_management_data"
        );
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (service, _) = service();
        assert_eq!(service.fetch("never-planned").await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalid_request_is_rejected_before_logging() {
        let (service, log) = service();
        let mut story = request("Task Management", "", false);
        story.session_id = "   ".into();

        let err = service.plan(story).await.unwrap_err();

        assert!(matches!(
            err,
            PlanningError::InvalidRequest(InputError::MissingField("session_id"))
        ));
        assert!(log.entries("US-TEST").is_empty());
    }

    #[tokio::test]
    async fn model_reply_is_returned_verbatim() {
        let client = Arc::new(CannedModelClient::new(EXAMPLE_ARCHITECTURE));
        let (service, _) = service();
        let service = service.with_model(client.clone());
        assert!(service.model_configured());

        let response = service
            .plan(request("Task Management", "Track tasks", true))
            .await
            .unwrap();

        assert_eq!(client.calls(), 1);
        assert_eq!(response.architecture.database.tables[0].name, "table_name");
    }

    #[tokio::test]
    async fn model_failure_falls_back_and_completes() {
        let (service, log) = service();
        let service = service.with_model(Arc::new(UnreachableModelClient));
        let story = request("Task Management", "Users manage tasks", true);

        let response = service.plan(story.clone()).await.unwrap();

        assert_eq!(response.architecture, heuristic::generate(&story));
        assert_eq!(
            log.statuses("US-TEST"),
            vec![ExecutionStatus::Started, ExecutionStatus::Completed]
        );
    }

    #[tokio::test]
    async fn sink_failures_do_not_fail_the_run() {
        let service = PlanningService::new(Arc::new(BrokenStore), Arc::new(BrokenLog));

        let response = service
            .plan(request("Task Management", "", false))
            .await
            .unwrap();
        assert_eq!(response.status, "success");

        assert!(matches!(
            service.fetch("session-test").await,
            Err(PlanningError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn failure_row_carries_error_text() {
        let (service, log) = service();
        let story = request("Task Management", "", false);
        let err = PlanningError::Internal("boom".into());

        service.record_failure(&story, &err).await;

        let rows = log.entries("US-TEST");
        assert_eq!(rows[0].status, ExecutionStatus::Failed);
        assert_eq!(rows[0].output, json!({ "error": "internal error: boom" }));
    }

    #[tokio::test]
    async fn concurrent_sessions_do_not_interfere() {
        let (service, _) = service();
        let service = Arc::new(service);

        let handles: Vec<_> = ["Orders", "Invoices", "Shipments"]
            .into_iter()
            .enumerate()
            .map(|(i, title)| {
                let service = service.clone();
                let mut story = request(title, "", false);
                story.session_id = format!("s{i}");
                tokio::spawn(async move { service.plan(story).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let second = service.fetch("s1").await.unwrap().unwrap();
        assert_eq!(second.database.tables[0].name, "invoices_data");
    }
}
