//! Calls to the planning and emission agents

use crate::error::AgentCallError;
use crate::settings::{AgentEndpoints, OrchestratorSettings};
use crate::wire::{
    BackendTask, DatabaseTask, EmissionResponse, FrontendTask, Stage, TestingResponse, TestingTask,
};
use async_trait::async_trait;
use autodev_core::{PlanningRequest, PlanningResponse};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Remote agents driven by the orchestrator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Plan a story
    async fn plan(&self, request: &PlanningRequest) -> Result<PlanningResponse, AgentCallError>;

    /// Emit database code
    async fn database(&self, task: &DatabaseTask) -> Result<EmissionResponse, AgentCallError>;

    /// Emit backend code
    async fn backend(&self, task: &BackendTask) -> Result<EmissionResponse, AgentCallError>;

    /// Emit frontend code
    async fn frontend(&self, task: &FrontendTask) -> Result<EmissionResponse, AgentCallError>;

    /// Generate and run tests
    async fn testing(&self, task: &TestingTask) -> Result<TestingResponse, AgentCallError>;
}

/// JSON-over-HTTP agent client
#[derive(Debug, Clone)]
pub struct HttpAgentClient {
    client: Client,
    agents: AgentEndpoints,
}

impl HttpAgentClient {
    /// Create client from settings
    pub fn new(settings: &OrchestratorSettings) -> Result<Self, AgentCallError> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| AgentCallError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            agents: settings.agents.clone(),
        })
    }

    async fn post<T, R>(&self, stage: Stage, body: &T) -> Result<R, AgentCallError>
    where
        T: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.agents.url(stage);
        tracing::debug!(%stage, %url, "Calling agent");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| AgentCallError::Transport { stage, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentCallError::Status {
                stage,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| AgentCallError::Transport { stage, source })?;

        serde_json::from_slice(&bytes).map_err(|e| AgentCallError::Decode {
            stage,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn plan(&self, request: &PlanningRequest) -> Result<PlanningResponse, AgentCallError> {
        self.post(Stage::Planning, request).await
    }

    async fn database(&self, task: &DatabaseTask) -> Result<EmissionResponse, AgentCallError> {
        self.post(Stage::Database, task).await
    }

    async fn backend(&self, task: &BackendTask) -> Result<EmissionResponse, AgentCallError> {
        self.post(Stage::Backend, task).await
    }

    async fn frontend(&self, task: &FrontendTask) -> Result<EmissionResponse, AgentCallError> {
        self.post(Stage::Frontend, task).await
    }

    async fn testing(&self, task: &TestingTask) -> Result<TestingResponse, AgentCallError> {
        self.post(Stage::Testing, task).await
    }
}
