//! Autodev Core - Architecture inference and validation
//!
//! Turns a user story into a strictly-typed [`Architecture`]:
//! - Rule-based generation from description keywords and tech hints
//! - Model-backed generation with strict schema validation
//! - Deterministic fallback to the rule-based result on any model failure
//! - Dependency graph checks for externally supplied graphs
//!
//! # Example
//!
//! ```rust
//! use autodev_core::{heuristic, PlanningRequest, TechHints};
//!
//! let request = PlanningRequest::new("US-1", "s1", "Task Management", "Track tasks")
//!     .with_hints(TechHints::new().with_auth(true));
//!
//! let architecture = heuristic::generate(&request);
//! assert_eq!(architecture.database.tables[0].name, "task_management_data");
//! assert!(architecture.backend.middleware.contains(&"auth".to_string()));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod architecture;
pub mod error;
pub mod graph;
pub mod heuristic;
pub mod model;
pub mod prompt;
pub mod slug;
pub mod types;

// Re-exports for convenience
pub use architecture::{
    ApiEndpoint, Architecture, BackendArchitecture, ColumnConstraints, DatabaseSchema,
    DatabaseTable, FrontendArchitecture, HttpMethod, SqlType, TableColumn,
};
pub use error::{GraphError, InputError, ModelError, ModelFailureKind, SchemaError};
pub use graph::{DependencyEdge, DependencyGraph, DEFAULT_STAGES};
pub use model::{
    generate_via_model, generate_with_fallback, try_generate_via_model, ArchitectureSource,
    CompletionRequest, Generation, GenerationSettings, Message, MessageRole, ModelClient,
};
pub use types::{
    AcceptanceCriterion, Complexity, PlanningRequest, PlanningResponse, Priority, TechHints,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with autodev core
    pub use crate::{
        heuristic, Architecture, ArchitectureSource, GenerationSettings, ModelClient,
        ModelError, PlanningRequest, TechHints,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn heuristic_output_round_trips_through_strict_decoding() {
        let request = PlanningRequest::new("US-1", "s1", "User Profile", "user settings page");
        let architecture = heuristic::generate(&request);

        let json = serde_json::to_value(&architecture).unwrap();
        let decoded = Architecture::from_json_value(json).unwrap();

        assert_eq!(decoded, architecture);
    }

    #[test]
    fn column_constructor_rejects_blank_type() {
        assert!(TableColumn::new("id", "SERIAL", Some("PRIMARY KEY")).is_ok());
        assert!(matches!(
            TableColumn::new("id", " ", None),
            Err(SchemaError::Shape(_))
        ));
    }
}
