//! Orchestrator configuration
//!
//! Defaults point every agent at localhost; a TOML file and `AUTODEV_*`
//! variables (`AUTODEV_AGENTS__BACKEND=http://...`) override them.

use crate::wire::Stage;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Base URL of each agent service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentEndpoints {
    /// Planning agent
    pub planning: String,
    /// Frontend agent
    pub frontend: String,
    /// Backend agent
    pub backend: String,
    /// Database agent
    pub database: String,
    /// Testing agent
    pub testing: String,
}

impl Default for AgentEndpoints {
    fn default() -> Self {
        Self {
            planning: "http://localhost:8000".to_string(),
            frontend: "http://localhost:8001".to_string(),
            backend: "http://localhost:8002".to_string(),
            database: "http://localhost:8003".to_string(),
            testing: "http://localhost:8004".to_string(),
        }
    }
}

impl AgentEndpoints {
    /// Every agent served from one base URL
    #[must_use]
    pub fn uniform(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            planning: base_url.clone(),
            frontend: base_url.clone(),
            backend: base_url.clone(),
            database: base_url.clone(),
            testing: base_url,
        }
    }

    /// Base URL for `stage`
    #[must_use]
    pub fn base_url(&self, stage: Stage) -> &str {
        match stage {
            Stage::Planning => &self.planning,
            Stage::Database => &self.database,
            Stage::Backend => &self.backend,
            Stage::Frontend => &self.frontend,
            Stage::Testing => &self.testing,
        }
    }

    /// Full URL of `stage`'s agent route
    #[must_use]
    pub fn url(&self, stage: Stage) -> String {
        format!(
            "{}/{}",
            self.base_url(stage).trim_end_matches('/'),
            stage.path()
        )
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorSettings {
    /// Agent base URLs
    pub agents: AgentEndpoints,
    /// Per-call HTTP deadline
    pub timeout_secs: u64,
    /// Project id sent with planning requests
    pub project_id: String,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            agents: AgentEndpoints::default(),
            timeout_secs: 30,
            project_id: "demo-project".to_string(),
        }
    }
}

impl OrchestratorSettings {
    /// Load from defaults, `config_file` (if given) and the environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(config_file).extract()
    }

    /// Build the provider chain
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("AUTODEV_").split("__"))
    }

    /// With agent endpoints
    #[inline]
    #[must_use]
    pub fn with_agents(mut self, agents: AgentEndpoints) -> Self {
        self.agents = agents;
        self
    }

    /// Per-call deadline
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
