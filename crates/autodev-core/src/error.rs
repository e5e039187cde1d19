//! Error types for autodev core
//!
//! Provides error handling for:
//! - Malformed planning requests (rejected, never repaired)
//! - Architecture schema violations
//! - Dependency graph violations
//! - Language-model failures (recovered by the heuristic generator)

/// Planning request rejected at the boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Required field empty or blank
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Architecture failed strict schema validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// JSON shape does not match the schema (missing field, wrong type)
    #[error("schema mismatch: {0}")]
    Shape(String),

    /// Table declares no columns
    #[error("table '{0}' has no columns")]
    EmptyTable(String),

    /// Table name used twice
    #[error("duplicate table name: {0}")]
    DuplicateTable(String),

    /// Column name used twice within one table
    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn {
        /// Owning table
        table: String,
        /// Repeated column
        column: String,
    },

    /// Frontend component listed twice
    #[error("duplicate component: {0}")]
    DuplicateComponent(String),

    /// Blank identifier where a name is required
    #[error("blank {0}")]
    BlankName(&'static str),

    /// Dependency graph invariant broken
    #[error("dependency graph: {0}")]
    Graph(#[from] GraphError),
}

impl SchemaError {
    /// Create shape error from a serde failure
    #[inline]
    pub fn shape(err: impl std::fmt::Display) -> Self {
        Self::Shape(err.to_string())
    }
}

/// Dependency graph violations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Edge references a node that is not declared
    #[error("edge {from} -> {to} references undeclared node '{missing}'")]
    DanglingEdge {
        /// Edge source
        from: String,
        /// Edge target
        to: String,
        /// Endpoint absent from the node list
        missing: String,
    },

    /// Edge from a node to itself
    #[error("self loop on '{0}'")]
    SelfLoop(String),

    /// Edges form a cycle
    #[error("cycle detected involving '{0}'")]
    CycleDetected(String),
}

/// Why a model-backed generation attempt was abandoned
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Request could not be delivered or the provider answered with an error
    #[error("model transport failed: {0}")]
    Transport(String),

    /// No answer within the configured deadline
    #[error("model call timed out after {duration_ms}ms")]
    Timeout {
        /// Deadline that elapsed
        duration_ms: u64,
    },

    /// Answer is not a JSON document
    #[error("model output is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Answer is JSON but not a valid architecture
    #[error("model output failed validation: {0}")]
    Schema(#[from] SchemaError),
}

/// Coarse classification of [`ModelError`] for logging and metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFailureKind {
    /// Transport or timeout
    Transport,
    /// JSON syntax
    Parse,
    /// Schema mismatch
    Schema,
}

impl ModelFailureKind {
    /// Stable label
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Parse => "parse",
            Self::Schema => "schema",
        }
    }
}

impl ModelError {
    /// Classify the failure
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ModelFailureKind {
        match self {
            Self::Transport(_) | Self::Timeout { .. } => ModelFailureKind::Transport,
            Self::Parse(_) => ModelFailureKind::Parse,
            Self::Schema(_) => ModelFailureKind::Schema,
        }
    }

    /// Create transport error
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_display() {
        let err = InputError::MissingField("title");
        assert_eq!(err.to_string(), "missing required field: title");
    }

    #[test]
    fn model_error_kinds() {
        assert_eq!(
            ModelError::transport("connection refused").kind(),
            ModelFailureKind::Transport
        );
        assert_eq!(
            ModelError::Timeout { duration_ms: 30_000 }.kind(),
            ModelFailureKind::Transport
        );

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ModelError::from(parse).kind(), ModelFailureKind::Parse);

        let schema = SchemaError::EmptyTable("users".to_string());
        assert_eq!(ModelError::from(schema).kind(), ModelFailureKind::Schema);
    }

    #[test]
    fn graph_error_converts_to_schema_error() {
        let err: SchemaError = GraphError::SelfLoop("database".to_string()).into();
        assert!(matches!(err, SchemaError::Graph(_)));
        assert!(err.to_string().contains("self loop"));
    }
}
