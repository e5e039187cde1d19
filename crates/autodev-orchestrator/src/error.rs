//! Remote agent call failures

use crate::wire::Stage;

/// A call to one agent failed
#[derive(Debug, thiserror::Error)]
pub enum AgentCallError {
    /// Request never produced a response (connect, timeout)
    #[error("{stage} agent unreachable: {source}")]
    Transport {
        /// Stage being called
        stage: Stage,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// Agent answered with a non-success status
    #[error("{stage} agent returned {status}: {body}")]
    Status {
        /// Stage being called
        stage: Stage,
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// Reply body did not match the expected payload
    #[error("{stage} agent reply unreadable: {reason}")]
    Decode {
        /// Stage being called
        stage: Stage,
        /// Deserialization failure
        reason: String,
    },

    /// HTTP client could not be built
    #[error("agent client setup failed: {0}")]
    Setup(String),
}

impl AgentCallError {
    /// Stage the failure belongs to, if any
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Transport { stage, .. }
            | Self::Status { stage, .. }
            | Self::Decode { stage, .. } => Some(*stage),
            Self::Setup(_) => None,
        }
    }
}
