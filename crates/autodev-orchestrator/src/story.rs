//! User stories fed to the pipeline

use autodev_core::{AcceptanceCriterion, PlanningRequest, Priority, TechHints};
use serde::{Deserialize, Serialize};

/// A user story as supplied to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Story identifier (`US-001`)
    pub id: String,
    /// Short title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Acceptance criteria; story files may omit them
    #[serde(default)]
    pub acceptance_criteria: Vec<AcceptanceCriterion>,
    /// Capability hints; story files may omit them
    #[serde(default)]
    pub tech_hints: TechHints,
}

impl Story {
    /// The login story used when no story file is given
    #[must_use]
    pub fn sample() -> Self {
        Self {
            id: "US-001".to_string(),
            title: "User Authentication".to_string(),
            description: "As a user, I want to log in with email and password so that I can access my account".to_string(),
            acceptance_criteria: vec![
                AcceptanceCriterion::new(1, "User can enter email and password", Priority::MustHave),
                AcceptanceCriterion::new(2, "System validates credentials", Priority::MustHave),
                AcceptanceCriterion::new(3, "User receives JWT token on success", Priority::MustHave),
            ],
            tech_hints: TechHints::new().with_auth(true),
        }
    }

    /// Planning request for this story within `session_id`
    #[must_use]
    pub fn planning_request(&self, session_id: &str, project_id: &str) -> PlanningRequest {
        PlanningRequest::new(&self.id, session_id, &self.title, &self.description)
            .with_criteria(self.acceptance_criteria.clone())
            .with_hints(self.tech_hints)
            .with_project(project_id)
    }
}

/// Session id for a run started at `unix_secs`
#[must_use]
pub fn session_id(story_id: &str, unix_secs: i64) -> String {
    format!("session_{story_id}_{unix_secs}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_story_requires_auth() {
        let story = Story::sample();
        assert!(story.tech_hints.requires_auth);
        assert_eq!(story.acceptance_criteria.len(), 3);
    }

    #[test]
    fn story_file_without_hints_uses_defaults() {
        let story: Story = serde_json::from_str(
            r#"{"id": "US-9", "title": "Reports", "description": "Export reports"}"#,
        )
        .unwrap();
        assert_eq!(story.tech_hints, TechHints::default());
        assert!(story.acceptance_criteria.is_empty());
    }

    #[test]
    fn planning_request_carries_story_fields() {
        let request = Story::sample().planning_request("session_US-001_1700000000", "demo-project");
        assert_eq!(request.story_id, "US-001");
        assert_eq!(request.project_id, "demo-project");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn session_id_embeds_story_and_time() {
        assert_eq!(session_id("US-001", 1_700_000_000), "session_US-001_1700000000");
    }
}
