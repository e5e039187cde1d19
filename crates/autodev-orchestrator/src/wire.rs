//! Payloads exchanged with the emission agents
//!
//! Each agent receives one slice of an [`Architecture`](autodev_core::Architecture)
//! plus correlation ids and answers with generated-file records.

use autodev_core::{ApiEndpoint, DatabaseTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Architecture planning
    Planning,
    /// Schema and migrations
    Database,
    /// API server
    Backend,
    /// User interface
    Frontend,
    /// Test generation
    Testing,
}

impl Stage {
    /// Emission stages run after planning
    pub const EMISSION: [Stage; 4] = [
        Stage::Database,
        Stage::Backend,
        Stage::Frontend,
        Stage::Testing,
    ];

    /// Lower-case stage name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Database => "database",
            Self::Backend => "backend",
            Self::Frontend => "frontend",
            Self::Testing => "testing",
        }
    }

    /// Task id for this stage and story (`db_US-1`, `backend_US-1`, ...)
    #[must_use]
    pub fn task_id(&self, story_id: &str) -> String {
        let prefix = match self {
            Self::Database => "db",
            other => other.as_str(),
        };
        format!("{prefix}_{story_id}")
    }

    /// Path on the agent's service
    #[must_use]
    pub fn path(&self) -> String {
        format!("agents/{}", self.as_str())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layer of generated code handed to the testing agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLayer {
    /// Database migrations
    Database,
    /// Backend sources
    Backend,
    /// Frontend sources
    Frontend,
}

impl CodeLayer {
    /// Every layer, in emission order
    pub const ALL: [CodeLayer; 3] = [CodeLayer::Database, CodeLayer::Backend, CodeLayer::Frontend];
}

/// Database agent request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseTask {
    /// Stage-prefixed task id
    pub task_id: String,
    /// Story being processed
    pub story_id: String,
    /// Session returned by planning
    pub session_id: String,
    /// Tables to migrate
    pub tables: Vec<DatabaseTable>,
}

/// Backend agent request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendTask {
    /// Stage-prefixed task id
    pub task_id: String,
    /// Story being processed
    pub story_id: String,
    /// Session returned by planning
    pub session_id: String,
    /// Endpoints to implement
    pub endpoints: Vec<ApiEndpoint>,
}

/// Frontend agent request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendTask {
    /// Stage-prefixed task id
    pub task_id: String,
    /// Story being processed
    pub story_id: String,
    /// Session returned by planning
    pub session_id: String,
    /// Components to build
    pub components: Vec<String>,
}

/// Testing agent request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestingTask {
    /// Stage-prefixed task id
    pub task_id: String,
    /// Story being processed
    pub story_id: String,
    /// Session returned by planning
    pub session_id: String,
    /// Layers to cover with tests
    pub code_layers: Vec<CodeLayer>,
}

/// One emitted source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Path relative to the project root
    pub file_path: String,
    /// File body
    pub content: String,
    /// Source language tag
    pub language: String,
}

/// Reply from the database, backend and frontend agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionResponse {
    /// Agent-reported status
    pub status: String,
    /// Echoed task id
    pub task_id: String,
    /// Emitted files
    #[serde(default)]
    pub generated_files: Vec<GeneratedFile>,
}

/// Reply from the testing agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestingResponse {
    /// Agent-reported status
    pub status: String,
    /// Echoed task id
    pub task_id: String,
    /// Emitted test files
    #[serde(default)]
    pub generated_files: Vec<GeneratedFile>,
    /// Whether the generated suite passed
    pub tests_passed: bool,
    /// Percentage in `0..=100`
    pub coverage: f64,
    /// Number of generated tests
    pub total_tests: u32,
}
