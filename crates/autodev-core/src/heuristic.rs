//! Rule-based architecture generation
//!
//! Derives a complete [`Architecture`] from keyword signals in the story
//! description and the caller's tech hints. Performs no I/O and never fails,
//! which makes it the fallback for every model failure.

use crate::architecture::{
    ApiEndpoint, Architecture, BackendArchitecture, DatabaseSchema, DatabaseTable,
    FrontendArchitecture, HttpMethod, TableColumn, DEFAULT_ROUTING, DEFAULT_STATE_MANAGEMENT,
};
use crate::graph::DependencyGraph;
use crate::slug::{pascal_case, slugify};
use crate::types::PlanningRequest;

/// Keyword signals extracted from a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signals {
    /// A `users` table is needed
    pub needs_users: bool,
    /// Authentication endpoints, middleware and components are needed
    pub needs_auth: bool,
}

impl Signals {
    /// Scan the description (case-insensitive) and hints
    #[must_use]
    pub fn extract(request: &PlanningRequest) -> Self {
        let desc = request.description.to_lowercase();

        let needs_users = desc.contains("user") || desc.contains("login");
        let needs_auth = request.tech_hints.requires_auth || desc.contains("auth");

        Self {
            needs_users,
            needs_auth,
        }
    }
}

/// Generate an architecture from heuristics alone
///
/// Acceptance criteria are not consulted; they only feed the model prompt.
#[must_use]
pub fn generate(request: &PlanningRequest) -> Architecture {
    let signals = Signals::extract(request);
    let feature = slugify(&request.title);

    tracing::debug!(
        story_id = %request.story_id,
        feature = %feature,
        needs_users = signals.needs_users,
        needs_auth = signals.needs_auth,
        "Generating heuristic architecture"
    );

    Architecture {
        database: database_schema(&feature, signals),
        backend: backend_architecture(&feature, signals),
        frontend: frontend_architecture(&request.title, signals),
        dependency_graph: DependencyGraph::default_chain(),
    }
}

fn database_schema(feature: &str, signals: Signals) -> DatabaseSchema {
    let mut tables = Vec::new();

    if signals.needs_users {
        tables.push(DatabaseTable {
            name: "users".to_string(),
            columns: vec![
                TableColumn::literal("id", "SERIAL", Some("PRIMARY KEY")),
                TableColumn::literal("email", "VARCHAR(255)", Some("UNIQUE NOT NULL")),
                TableColumn::literal("password_hash", "VARCHAR(255)", Some("NOT NULL")),
                TableColumn::literal("created_at", "TIMESTAMP", Some("DEFAULT NOW()")),
            ],
        });
    }

    let data_table = format!("{}_data", feature);
    let mut columns = vec![TableColumn::literal("id", "SERIAL", Some("PRIMARY KEY"))];
    if signals.needs_users {
        columns.push(TableColumn::literal(
            "user_id",
            "INTEGER",
            Some("REFERENCES users(id)"),
        ));
    }
    columns.push(TableColumn::literal("data", "JSONB", None));
    columns.push(TableColumn::literal(
        "created_at",
        "TIMESTAMP",
        Some("DEFAULT NOW()"),
    ));

    let relationships = if signals.needs_users {
        vec![format!("users.id -> {}.user_id", data_table)]
    } else {
        Vec::new()
    };

    tables.push(DatabaseTable {
        name: data_table,
        columns,
    });

    DatabaseSchema {
        tables,
        relationships,
    }
}

fn backend_architecture(feature: &str, signals: Signals) -> BackendArchitecture {
    let mut endpoints = Vec::new();

    if signals.needs_auth {
        endpoints.push(
            ApiEndpoint::new("/api/auth/login", HttpMethod::Post, false)
                .with_description("User login"),
        );
        endpoints.push(
            ApiEndpoint::new("/api/auth/register", HttpMethod::Post, false)
                .with_description("User registration"),
        );
    }

    let collection = format!("/api/{}", feature);
    let item = format!("{}/{{id}}", collection);
    let auth = signals.needs_auth;

    endpoints.extend([
        ApiEndpoint::new(&collection, HttpMethod::Get, auth)
            .with_description(format!("List {}", feature)),
        ApiEndpoint::new(&collection, HttpMethod::Post, auth)
            .with_description(format!("Create {}", feature)),
        ApiEndpoint::new(&item, HttpMethod::Get, auth)
            .with_description(format!("Get {}", feature)),
        ApiEndpoint::new(&item, HttpMethod::Put, auth)
            .with_description(format!("Update {}", feature)),
        ApiEndpoint::new(&item, HttpMethod::Delete, auth)
            .with_description(format!("Delete {}", feature)),
    ]);

    let mut middleware = Vec::with_capacity(4);
    if signals.needs_auth {
        middleware.push("auth".to_string());
    }
    middleware.extend(["validation", "logging", "cors"].map(String::from));

    BackendArchitecture {
        endpoints,
        middleware,
    }
}

fn frontend_architecture(title: &str, signals: Signals) -> FrontendArchitecture {
    let mut components = Vec::new();

    if signals.needs_auth {
        components.extend(["LoginForm", "RegisterForm", "AuthGuard"].map(String::from));
    }

    let main_component = format!("{}Component", pascal_case(title));
    let list = format!("{}List", main_component);
    let form = format!("{}Form", main_component);
    components.extend([main_component, list, form]);
    components.extend(["Navigation", "ErrorBoundary"].map(String::from));

    FrontendArchitecture {
        components,
        state_management: DEFAULT_STATE_MANAGEMENT.to_string(),
        routing: DEFAULT_ROUTING.to_string(),
    }
}
