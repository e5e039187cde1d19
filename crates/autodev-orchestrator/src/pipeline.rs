//! Sequential story pipeline
//!
//! planning -> database -> backend -> frontend -> testing, correlated by the
//! session id returned from planning. A planning failure ends the run; every
//! later stage is attempted regardless of earlier emission failures.

use crate::client::AgentClient;
use crate::error::AgentCallError;
use crate::story::{session_id, Story};
use crate::wire::{
    BackendTask, CodeLayer, DatabaseTask, EmissionResponse, FrontendTask, Stage, TestingTask,
};
use autodev_core::Architecture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Test summary reported by the testing stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    /// Whether every generated test passed
    pub tests_passed: bool,
    /// Coverage percentage
    pub coverage: f64,
    /// Number of generated tests
    pub total_tests: u32,
}

/// Result of one emission stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StageOutcome {
    /// Agent answered with generated files
    Completed {
        /// Stage that ran
        stage: Stage,
        /// Number of files the agent emitted
        generated_files: usize,
        /// Present for the testing stage only
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tests: Option<TestSummary>,
    },
    /// Agent call failed; later stages still run
    Failed {
        /// Stage that failed
        stage: Stage,
        /// Rendered call error
        error: String,
    },
}

impl StageOutcome {
    /// Stage this outcome belongs to
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Completed { stage, .. } | Self::Failed { stage, .. } => *stage,
        }
    }

    /// Whether the agent call succeeded
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    fn from_emission(stage: Stage, result: Result<EmissionResponse, AgentCallError>) -> Self {
        match result {
            Ok(reply) => {
                tracing::info!(%stage, generated_files = reply.generated_files.len(), "Stage completed");
                Self::Completed {
                    stage,
                    generated_files: reply.generated_files.len(),
                    tests: None,
                }
            }
            Err(e) => Self::failed(stage, &e),
        }
    }

    fn failed(stage: Stage, error: &AgentCallError) -> Self {
        tracing::warn!(%stage, error = %error, "Stage failed, continuing");
        Self::Failed {
            stage,
            error: error.to_string(),
        }
    }
}

/// Completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSuccess {
    /// Processed story
    pub story_id: String,
    /// Session the architecture was planned under
    pub session_id: String,
    /// Architecture returned by planning
    pub architecture: Architecture,
    /// One outcome per emission stage, in order
    pub stages: Vec<StageOutcome>,
}

/// Final report of one story run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PipelineReport {
    /// Planning succeeded and every emission stage was attempted
    Success(PipelineSuccess),
    /// Planning failed, nothing else ran
    Failed {
        /// Always [`Stage::Planning`]
        stage: Stage,
        /// Rendered call error
        error: String,
    },
}

impl PipelineReport {
    /// Whether planning succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Drives one story through all agents
#[derive(Clone)]
pub struct Orchestrator {
    client: Arc<dyn AgentClient>,
    project_id: String,
}

impl Orchestrator {
    /// Create orchestrator for `project_id`
    #[must_use]
    pub fn new(client: Arc<dyn AgentClient>, project_id: impl Into<String>) -> Self {
        Self {
            client,
            project_id: project_id.into(),
        }
    }

    /// Process a story end to end with a session id stamped now
    pub async fn process_story(&self, story: &Story) -> PipelineReport {
        let session = session_id(&story.id, chrono::Utc::now().timestamp());
        self.process_story_in_session(story, &session).await
    }

    /// Process a story end to end under `session_id`
    pub async fn process_story_in_session(&self, story: &Story, session_id: &str) -> PipelineReport {
        tracing::info!(story_id = %story.id, title = %story.title, "Processing story");

        let request = story.planning_request(session_id, &self.project_id);
        let planned = match self.client.plan(&request).await {
            Ok(planned) => planned,
            Err(e) => {
                tracing::error!(story_id = %story.id, error = %e, "Planning failed");
                return PipelineReport::Failed {
                    stage: Stage::Planning,
                    error: e.to_string(),
                };
            }
        };
        tracing::info!(
            story_id = %story.id,
            elapsed_secs = planned.execution_time_seconds,
            "Planning completed"
        );

        let architecture = planned.architecture;
        let run = Correlation {
            story_id: story.id.clone(),
            session_id: planned.session_id,
        };

        let stages = vec![
            self.database(&run, &architecture).await,
            self.backend(&run, &architecture).await,
            self.frontend(&run, &architecture).await,
            self.testing(&run).await,
        ];

        PipelineReport::Success(PipelineSuccess {
            story_id: run.story_id,
            session_id: run.session_id,
            architecture,
            stages,
        })
    }

    async fn database(&self, run: &Correlation, architecture: &Architecture) -> StageOutcome {
        let task = DatabaseTask {
            task_id: Stage::Database.task_id(&run.story_id),
            story_id: run.story_id.clone(),
            session_id: run.session_id.clone(),
            tables: architecture.database.tables.clone(),
        };
        let result = self.client.database(&task).await;
        StageOutcome::from_emission(Stage::Database, result)
    }

    async fn backend(&self, run: &Correlation, architecture: &Architecture) -> StageOutcome {
        let task = BackendTask {
            task_id: Stage::Backend.task_id(&run.story_id),
            story_id: run.story_id.clone(),
            session_id: run.session_id.clone(),
            endpoints: architecture.backend.endpoints.clone(),
        };
        let result = self.client.backend(&task).await;
        StageOutcome::from_emission(Stage::Backend, result)
    }

    async fn frontend(&self, run: &Correlation, architecture: &Architecture) -> StageOutcome {
        let task = FrontendTask {
            task_id: Stage::Frontend.task_id(&run.story_id),
            story_id: run.story_id.clone(),
            session_id: run.session_id.clone(),
            components: architecture.frontend.components.clone(),
        };
        let result = self.client.frontend(&task).await;
        StageOutcome::from_emission(Stage::Frontend, result)
    }

    async fn testing(&self, run: &Correlation) -> StageOutcome {
        let task = TestingTask {
            task_id: Stage::Testing.task_id(&run.story_id),
            story_id: run.story_id.clone(),
            session_id: run.session_id.clone(),
            code_layers: CodeLayer::ALL.to_vec(),
        };

        match self.client.testing(&task).await {
            Ok(reply) => {
                tracing::info!(
                    total_tests = reply.total_tests,
                    coverage = reply.coverage,
                    "Testing completed"
                );
                StageOutcome::Completed {
                    stage: Stage::Testing,
                    generated_files: reply.generated_files.len(),
                    tests: Some(TestSummary {
                        tests_passed: reply.tests_passed,
                        coverage: reply.coverage,
                        total_tests: reply.total_tests,
                    }),
                }
            }
            Err(e) => StageOutcome::failed(Stage::Testing, &e),
        }
    }
}

/// Ids shared by every stage of one run
struct Correlation {
    story_id: String,
    session_id: String,
}
