//! Model-backed planning with validation and fallback
//!
//! A single attempt is made against the configured [`ModelClient`]:
//! - the reply has an optional code fence stripped
//! - the remainder is parsed as JSON and strictly decoded into an [`Architecture`]
//! - any transport, timeout, parse or schema failure is replaced by the
//!   heuristic result for the same request
//!
//! [`try_generate_via_model`] exposes the raw outcome per failure kind;
//! [`generate_with_fallback`] makes the substitution an explicit branch.

use crate::architecture::Architecture;
use crate::error::{ModelError, ModelFailureKind};
use crate::heuristic;
use crate::prompt;
use crate::types::PlanningRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction
    System,
    /// End-user content
    User,
    /// Model reply
    Assistant,
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Author role
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl Message {
    /// System message
    #[inline]
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// User message
    #[inline]
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Chat completion request handed to a [`ModelClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Ordered messages
    pub messages: Vec<Message>,
    /// Sampling temperature
    pub temperature: f32,
    /// Output size bound
    pub max_tokens: u32,
}

/// Fixed generation parameters for planning calls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Sampling temperature
    pub temperature: f32,
    /// Output size bound
    pub max_tokens: u32,
    /// Deadline for the model call, in milliseconds
    pub timeout_ms: u64,
}

impl GenerationSettings {
    /// Create default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With call deadline
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Call deadline as a duration
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 4096,
            timeout_ms: 30_000,
        }
    }
}

/// Chat-style language model collaborator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Run one completion and return the raw reply text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError>;
}

/// Where an architecture came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchitectureSource {
    /// Validated model output
    Model,
    /// Heuristic generator, no model configured
    Heuristic,
    /// Heuristic generator after a model failure
    Fallback(ModelFailureKind),
}

impl ArchitectureSource {
    /// Stable label for logs
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Heuristic => "heuristic",
            Self::Fallback(_) => "fallback",
        }
    }
}

/// Architecture plus its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// The architecture
    pub architecture: Architecture,
    /// How it was produced
    pub source: ArchitectureSource,
}

/// Remove a surrounding triple-backtick fence, optionally tagged `json`
#[must_use]
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let inner = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };

    inner
        .strip_prefix("json")
        .or_else(|| inner.strip_prefix("JSON"))
        .unwrap_or(inner)
        .trim()
}

/// Parse and strictly validate a model reply
pub fn decode_architecture(content: &str) -> Result<Architecture, ModelError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(content))?;
    Ok(Architecture::from_json_value(value)?)
}

/// One model attempt, bounded by the settings' deadline, without fallback
pub async fn try_generate_via_model(
    request: &PlanningRequest,
    client: &dyn ModelClient,
    settings: &GenerationSettings,
) -> Result<Architecture, ModelError> {
    let chat = prompt::completion_request(request, settings);

    let reply = tokio::time::timeout(settings.timeout(), client.complete(&chat))
        .await
        .map_err(|_| ModelError::Timeout {
            duration_ms: settings.timeout_ms,
        })??;

    let architecture = decode_architecture(&reply)?;
    tracing::info!(
        story_id = %request.story_id,
        tables = architecture.database.tables.len(),
        endpoints = architecture.backend.endpoints.len(),
        "Model architecture accepted"
    );
    Ok(architecture)
}

/// Model attempt with heuristic substitution on any failure
pub async fn generate_with_fallback(
    request: &PlanningRequest,
    client: &dyn ModelClient,
    settings: &GenerationSettings,
) -> Generation {
    match try_generate_via_model(request, client, settings).await {
        Ok(architecture) => Generation {
            architecture,
            source: ArchitectureSource::Model,
        },
        Err(e) => {
            tracing::warn!(
                story_id = %request.story_id,
                kind = e.kind().as_str(),
                error = %e,
                "Model generation failed, falling back to heuristic architecture"
            );
            Generation {
                architecture: heuristic::generate(request),
                source: ArchitectureSource::Fallback(e.kind()),
            }
        }
    }
}

/// Model-backed generation whose contract matches [`heuristic::generate`]
pub async fn generate_via_model(
    request: &PlanningRequest,
    client: &dyn ModelClient,
    settings: &GenerationSettings,
) -> Architecture {
    generate_with_fallback(request, client, settings)
        .await
        .architecture
}
