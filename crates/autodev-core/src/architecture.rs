//! Architecture model
//!
//! The sole output of the planner: database schema, backend endpoints,
//! frontend components and the stage dependency graph. Values are decoded
//! strictly from JSON (unknown fields ignored, missing required fields and
//! type mismatches rejected) and then checked by [`Architecture::validate`].

use crate::error::SchemaError;
use crate::graph::DependencyGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Default frontend state management library
pub const DEFAULT_STATE_MANAGEMENT: &str = "zustand";

/// Default frontend router
pub const DEFAULT_ROUTING: &str = "react-router";

/// SQL column type, kept as an opaque non-blank string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SqlType(String);

impl SqlType {
    pub(crate) fn literal(text: &'static str) -> Self {
        Self(text.to_string())
    }

    /// Get the type text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SqlType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("column type must not be blank".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<SqlType> for String {
    fn from(value: SqlType) -> Self {
        value.0
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Column constraint clause (`PRIMARY KEY`, `DEFAULT NOW()`, ...), opaque
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnConstraints(String);

impl ColumnConstraints {
    pub(crate) fn literal(text: &'static str) -> Self {
        Self(text.to_string())
    }

    /// Get the constraint text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ColumnConstraints {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("column constraints must not be blank".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<ColumnConstraints> for String {
    fn from(value: ColumnConstraints) -> Self {
        value.0
    }
}

/// Table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Column name
    pub name: String,
    /// SQL type
    #[serde(rename = "type")]
    pub sql_type: SqlType,
    /// Optional constraint clause
    #[serde(default)]
    pub constraints: Option<ColumnConstraints>,
}

impl TableColumn {
    /// Create column from literal parts
    ///
    /// Blank `sql_type` or `constraints` are rejected the same way decoding
    /// rejects them.
    pub fn new(
        name: impl Into<String>,
        sql_type: impl Into<String>,
        constraints: Option<&str>,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            name: name.into(),
            sql_type: SqlType::try_from(sql_type.into()).map_err(SchemaError::Shape)?,
            constraints: constraints
                .map(|c| ColumnConstraints::try_from(c.to_string()))
                .transpose()
                .map_err(SchemaError::Shape)?,
        })
    }

    pub(crate) fn literal(
        name: &str,
        sql_type: &'static str,
        constraints: Option<&'static str>,
    ) -> Self {
        Self {
            name: name.to_string(),
            sql_type: SqlType::literal(sql_type),
            constraints: constraints.map(ColumnConstraints::literal),
        }
    }
}

/// Database table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseTable {
    /// Table name, unique within an architecture
    pub name: String,
    /// Ordered, non-empty column list
    pub columns: Vec<TableColumn>,
}

/// Database schema
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatabaseSchema {
    /// Ordered tables
    pub tables: Vec<DatabaseTable>,
    /// Descriptive `A.col -> B.col` relationships, not enforced
    #[serde(default)]
    pub relationships: Vec<String>,
}

/// HTTP method of an endpoint, matched exactly against the upper-case names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
}

impl HttpMethod {
    /// Upper-case wire form
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            other => Err(format!("unsupported HTTP method: {}", other)),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(value: HttpMethod) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const fn default_auth_required() -> bool {
    true
}

/// Backend API endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    /// URL path, may contain `{id}` placeholders
    pub path: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Whether the endpoint requires an authenticated caller
    #[serde(default = "default_auth_required")]
    pub auth_required: bool,
    /// Human-readable purpose
    #[serde(default)]
    pub description: Option<String>,
}

impl ApiEndpoint {
    /// Create new endpoint
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>, method: HttpMethod, auth_required: bool) -> Self {
        Self {
            path: path.into(),
            method,
            auth_required,
            description: None,
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn default_middleware() -> Vec<String> {
    ["auth", "validation", "logging"]
        .iter()
        .map(|m| (*m).to_string())
        .collect()
}

/// Backend architecture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendArchitecture {
    /// Ordered endpoints
    pub endpoints: Vec<ApiEndpoint>,
    /// Ordered middleware names
    #[serde(default = "default_middleware")]
    pub middleware: Vec<String>,
}

fn default_state_management() -> String {
    DEFAULT_STATE_MANAGEMENT.to_string()
}

fn default_routing() -> String {
    DEFAULT_ROUTING.to_string()
}

/// Frontend architecture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendArchitecture {
    /// Ordered, unique component names
    pub components: Vec<String>,
    /// State management library
    #[serde(default = "default_state_management")]
    pub state_management: String,
    /// Routing library
    #[serde(default = "default_routing")]
    pub routing: String,
}

/// Generated architecture blueprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    /// Database layer
    pub database: DatabaseSchema,
    /// Backend layer
    pub backend: BackendArchitecture,
    /// Frontend layer
    pub frontend: FrontendArchitecture,
    /// Stage ordering
    pub dependency_graph: DependencyGraph,
}

impl Architecture {
    /// Decode and validate an architecture from a parsed JSON document
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, SchemaError> {
        let architecture: Architecture =
            serde_json::from_value(value).map_err(SchemaError::shape)?;
        architecture.validate()?;
        Ok(architecture)
    }

    /// Check structural invariants not expressible in the type system
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut table_names = HashSet::new();
        for table in &self.database.tables {
            if table.name.trim().is_empty() {
                return Err(SchemaError::BlankName("table name"));
            }
            if !table_names.insert(table.name.as_str()) {
                return Err(SchemaError::DuplicateTable(table.name.clone()));
            }
            if table.columns.is_empty() {
                return Err(SchemaError::EmptyTable(table.name.clone()));
            }

            let mut column_names = HashSet::new();
            for column in &table.columns {
                if column.name.trim().is_empty() {
                    return Err(SchemaError::BlankName("column name"));
                }
                if !column_names.insert(column.name.as_str()) {
                    return Err(SchemaError::DuplicateColumn {
                        table: table.name.clone(),
                        column: column.name.clone(),
                    });
                }
            }
        }

        if self
            .backend
            .endpoints
            .iter()
            .any(|endpoint| endpoint.path.trim().is_empty())
        {
            return Err(SchemaError::BlankName("endpoint path"));
        }

        let mut components = HashSet::new();
        for component in &self.frontend.components {
            if component.trim().is_empty() {
                return Err(SchemaError::BlankName("component name"));
            }
            if !components.insert(component.as_str()) {
                return Err(SchemaError::DuplicateComponent(component.clone()));
            }
        }

        self.dependency_graph.validate()?;
        Ok(())
    }

    /// Table by name
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&DatabaseTable> {
        self.database.tables.iter().find(|t| t.name == name)
    }
}
