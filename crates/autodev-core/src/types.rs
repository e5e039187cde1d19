//! Planning request types
//!
//! Defines the inbound unit of work for the planner:
//! - Acceptance criteria and their priorities
//! - Technology hints supplied by the caller
//! - The planning request itself, with boundary validation
//! - The success reply returned for a planned request

use crate::architecture::Architecture;
use crate::error::InputError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of an acceptance criterion (MoSCoW style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    /// Required for the story to be accepted
    #[default]
    MustHave,
    /// Expected but negotiable
    ShouldHave,
    /// Nice to have
    CouldHave,
}

impl Priority {
    /// Wire representation (`must-have`, ...)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::MustHave => "must-have",
            Priority::ShouldHave => "should-have",
            Priority::CouldHave => "could-have",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single acceptance criterion of a story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceCriterion {
    /// Caller-assigned identifier
    pub id: i64,
    /// Criterion text
    pub text: String,
    /// Priority
    #[serde(default)]
    pub priority: Priority,
}

impl AcceptanceCriterion {
    /// Create new criterion
    #[inline]
    #[must_use]
    pub fn new(id: i64, text: impl Into<String>, priority: Priority) -> Self {
        Self {
            id,
            text: text.into(),
            priority,
        }
    }
}

/// Expected complexity of a story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Small change
    Low,
    /// Typical feature
    #[default]
    Medium,
    /// Cross-cutting feature
    High,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        })
    }
}

/// Capability hints supplied alongside a story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechHints {
    /// Authentication is required
    pub requires_auth: bool,
    /// A database layer is required
    pub requires_database: bool,
    /// An HTTP API is required
    pub requires_api: bool,
    /// A user interface is required
    pub requires_ui: bool,
    /// Expected complexity
    pub complexity: Complexity,
}

impl TechHints {
    /// Create default hints
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With authentication requirement
    #[inline]
    #[must_use]
    pub fn with_auth(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }

    /// With complexity
    #[inline]
    #[must_use]
    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }
}

impl Default for TechHints {
    fn default() -> Self {
        Self {
            requires_auth: false,
            requires_database: true,
            requires_api: true,
            requires_ui: true,
            complexity: Complexity::Medium,
        }
    }
}

/// The unit of work consumed by the planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningRequest {
    /// Story identifier, keys the execution log
    pub story_id: String,
    /// Session identifier, keys the architecture cache
    pub session_id: String,
    /// Story title
    pub title: String,
    /// Free-text story description
    pub description: String,
    /// Ordered acceptance criteria (may be empty, never absent)
    pub acceptance_criteria: Vec<AcceptanceCriterion>,
    /// Capability hints
    pub tech_hints: TechHints,
    /// Owning project
    pub project_id: String,
}

impl PlanningRequest {
    /// Create new request with default hints and no criteria
    #[must_use]
    pub fn new(
        story_id: impl Into<String>,
        session_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            story_id: story_id.into(),
            session_id: session_id.into(),
            title: title.into(),
            description: description.into(),
            acceptance_criteria: Vec::new(),
            tech_hints: TechHints::default(),
            project_id: "default".to_string(),
        }
    }

    /// With acceptance criteria
    #[inline]
    #[must_use]
    pub fn with_criteria(mut self, criteria: Vec<AcceptanceCriterion>) -> Self {
        self.acceptance_criteria = criteria;
        self
    }

    /// With tech hints
    #[inline]
    #[must_use]
    pub fn with_hints(mut self, hints: TechHints) -> Self {
        self.tech_hints = hints;
        self
    }

    /// With project id
    #[inline]
    #[must_use]
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    /// Reject malformed requests before any generation happens
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in [
            ("story_id", &self.story_id),
            ("session_id", &self.session_id),
            ("title", &self.title),
            ("project_id", &self.project_id),
        ] {
            if value.trim().is_empty() {
                return Err(InputError::MissingField(field));
            }
        }

        Ok(())
    }
}

/// Reply for a successfully planned request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningResponse {
    /// Always `"success"`
    pub status: String,
    /// Story the architecture was planned for
    pub story_id: String,
    /// Session the architecture is cached under
    pub session_id: String,
    /// Planned architecture
    pub architecture: Architecture,
    /// Wall-clock duration of the run
    pub execution_time_seconds: f64,
}

impl PlanningResponse {
    /// Success reply for `request`
    #[must_use]
    pub fn success(
        request: PlanningRequest,
        architecture: Architecture,
        execution_time_seconds: f64,
    ) -> Self {
        Self {
            status: "success".to_string(),
            story_id: request.story_id,
            session_id: request.session_id,
            architecture,
            execution_time_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_default_matches_wire_defaults() {
        let hints: TechHints = serde_json::from_str("{}").unwrap();
        assert_eq!(hints, TechHints::default());
        assert!(!hints.requires_auth);
        assert!(hints.requires_ui);
        assert_eq!(hints.complexity, Complexity::Medium);
    }

    #[test]
    fn priority_uses_kebab_case() {
        let c: AcceptanceCriterion =
            serde_json::from_str(r#"{"id": 1, "text": "x", "priority": "could-have"}"#).unwrap();
        assert_eq!(c.priority, Priority::CouldHave);

        let err = serde_json::from_str::<AcceptanceCriterion>(
            r#"{"id": 1, "text": "x", "priority": "someday"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn request_rejects_blank_fields() {
        let request = PlanningRequest::new("", "s1", "Title", "desc");
        assert!(matches!(
            request.validate(),
            Err(InputError::MissingField("story_id"))
        ));

        let request = PlanningRequest::new("US-1", "s1", "   ", "desc");
        assert!(matches!(
            request.validate(),
            Err(InputError::MissingField("title"))
        ));
    }

    #[test]
    fn request_accepts_title_without_ascii_letters() {
        let request = PlanningRequest::new("US-1", "s1", "任务管理", "desc");
        assert!(request.validate().is_ok());

        let request = PlanningRequest::new("US-1", "s1", "!!!", "desc");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn request_requires_hints_and_criteria_on_the_wire() {
        let full = serde_json::json!({
            "story_id": "US-1",
            "session_id": "s1",
            "title": "Task Management",
            "description": "",
            "acceptance_criteria": [],
            "tech_hints": {},
            "project_id": "p1",
        });
        assert!(serde_json::from_value::<PlanningRequest>(full.clone()).is_ok());

        for field in ["tech_hints", "acceptance_criteria"] {
            let mut body = full.clone();
            body.as_object_mut().unwrap().remove(field);
            assert!(
                serde_json::from_value::<PlanningRequest>(body).is_err(),
                "{field} must be present"
            );
        }
    }

    #[test]
    fn request_accepts_empty_criteria() {
        let request = PlanningRequest::new("US-1", "s1", "Task Management", "");
        assert!(request.validate().is_ok());
        assert!(request.acceptance_criteria.is_empty());
    }
}
