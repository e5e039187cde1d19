//! Prompt rendering for model-backed planning
//!
//! The prompt text is configuration, not logic: a fixed system instruction and
//! a user instruction that embeds the story and an example of the expected
//! JSON shape.

use crate::model::{CompletionRequest, GenerationSettings, Message};
use crate::types::PlanningRequest;
use std::fmt::Write;

/// Fixed system instruction
pub const SYSTEM_PROMPT: &str = "\
You are an expert software architect. Analyze user stories and generate comprehensive technical architecture blueprints.

**Output Requirements:**
- Database schema with proper normalization
- RESTful API design with proper HTTP methods
- React component hierarchy
- Dependency graph for execution order

**Quality Standards:**
- Security-first design (JWT, input validation)
- Scalable database design
- Modern React patterns (hooks, composition)
- WCAG 2.1 AA accessibility

**CRITICAL: Output ONLY valid JSON. No markdown, no explanations.**";

/// Example document embedded in the user instruction
pub const EXAMPLE_ARCHITECTURE: &str = r#"{
  "database": {
    "tables": [
      {
        "name": "table_name",
        "columns": [
          {"name": "id", "type": "SERIAL", "constraints": "PRIMARY KEY"},
          {"name": "email", "type": "VARCHAR(255)", "constraints": "UNIQUE NOT NULL"}
        ]
      }
    ],
    "relationships": ["users.id -> sessions.user_id"]
  },
  "backend": {
    "endpoints": [
      {
        "path": "/api/users",
        "method": "POST",
        "auth_required": true,
        "description": "Create new user"
      }
    ],
    "middleware": ["auth", "validation", "logging"]
  },
  "frontend": {
    "components": ["LoginForm", "Dashboard"],
    "state_management": "zustand",
    "routing": "react-router"
  },
  "dependency_graph": {
    "nodes": ["database", "backend", "frontend", "testing"],
    "edges": [
      {"from_node": "database", "to": "backend"},
      {"from_node": "backend", "to": "frontend"},
      {"from_node": "frontend", "to": "testing"}
    ]
  }
}"#;

/// Numbered criteria as `N. [PRIORITY] text`, one per line
#[must_use]
pub fn render_criteria(request: &PlanningRequest) -> String {
    request
        .acceptance_criteria
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{}. [{}] {}",
                i + 1,
                c.priority.as_str().to_uppercase(),
                c.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-request user instruction
#[must_use]
pub fn render_user_prompt(request: &PlanningRequest) -> String {
    let hints = &request.tech_hints;
    let mut prompt = String::new();

    // Writing to a String cannot fail.
    let _ = write!(
        prompt,
        "**User Story:**\nTitle: {}\nDescription: {}\n\n**Acceptance Criteria:**\n{}\n\n",
        request.title,
        request.description,
        render_criteria(request)
    );
    let _ = write!(
        prompt,
        "**Technical Context:**\n\
         - Authentication Required: {}\n\
         - Database Required: {}\n\
         - API Required: {}\n\
         - UI Required: {}\n\
         - Complexity: {}\n\n",
        hints.requires_auth,
        hints.requires_database,
        hints.requires_api,
        hints.requires_ui,
        hints.complexity
    );
    let _ = write!(
        prompt,
        "Generate a complete architecture blueprint as JSON with this exact structure:\n{}",
        EXAMPLE_ARCHITECTURE
    );

    prompt
}

/// Full chat request for a planning call
#[must_use]
pub fn completion_request(
    request: &PlanningRequest,
    settings: &GenerationSettings,
) -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(render_user_prompt(request)),
        ],
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
    }
}
