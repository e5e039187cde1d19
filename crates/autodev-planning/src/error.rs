//! Planning service errors and their HTTP mapping

use autodev_core::{InputError, SchemaError};
use serde::Serialize;
use warp::http::StatusCode;

/// Planning request failed
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    /// Request rejected before generation
    #[error("invalid planning request: {0}")]
    InvalidRequest(#[from] InputError),

    /// Produced architecture broke its own invariants
    #[error("generated architecture is invalid: {0}")]
    InvalidArchitecture(#[from] SchemaError),

    /// Unexpected failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl PlanningError {
    /// Status code reported to HTTP callers
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidArchitecture(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure is the caller's fault
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl warp::reject::Reject for PlanningError {}

/// JSON error body, `{"detail": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Human-readable reason
    pub detail: String,
}

impl ErrorBody {
    /// Body carrying `detail`
    #[inline]
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
