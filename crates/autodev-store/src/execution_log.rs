//! Append-only execution log
//!
//! Records each agent's status transitions for a story. Rows are never
//! updated or removed by the planner.

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Status of an agent run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// Run began
    Started,
    /// Run produced its output
    Completed,
    /// Run hit a fatal error
    Failed,
}

impl ExecutionStatus {
    /// Wire representation
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// One log row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLogEntry {
    /// Story the run belongs to
    pub story_id: String,
    /// Agent that produced the row
    pub agent_name: String,
    /// Status transition
    pub status: ExecutionStatus,
    /// Arbitrary JSON payload
    pub output: serde_json::Value,
    /// When the row was recorded
    pub timestamp: DateTime<Utc>,
}

impl ExecutionLogEntry {
    /// Create row stamped with the current time
    #[must_use]
    pub fn new(
        story_id: impl Into<String>,
        agent_name: impl Into<String>,
        status: ExecutionStatus,
        output: serde_json::Value,
    ) -> Self {
        Self {
            story_id: story_id.into(),
            agent_name: agent_name.into(),
            status,
            output,
            timestamp: Utc::now(),
        }
    }
}

/// Record sink for execution rows
#[async_trait]
pub trait ExecutionLog: Send + Sync {
    /// Append one row
    async fn append(&self, entry: ExecutionLogEntry) -> StoreResult<()>;
}

/// Log that emits each row as a structured tracing event and keeps nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingExecutionLog;

impl TracingExecutionLog {
    /// Create log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExecutionLog for TracingExecutionLog {
    async fn append(&self, entry: ExecutionLogEntry) -> StoreResult<()> {
        tracing::info!(
            target: "autodev::execution",
            story_id = %entry.story_id,
            agent = %entry.agent_name,
            status = entry.status.as_str(),
            timestamp = %entry.timestamp.to_rfc3339(),
            output = %entry.output,
            "Execution row"
        );
        Ok(())
    }
}

/// In-memory log keyed by story id, unbounded; meant for tests and demos
#[derive(Debug, Default)]
pub struct MemoryExecutionLog {
    rows: DashMap<String, Vec<ExecutionLogEntry>>,
}

impl MemoryExecutionLog {
    /// Create empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows recorded for `story_id`, in append order
    #[must_use]
    pub fn entries(&self, story_id: &str) -> Vec<ExecutionLogEntry> {
        self.rows
            .get(story_id)
            .map(|rows| rows.value().clone())
            .unwrap_or_default()
    }

    /// Statuses recorded for `story_id`, in append order
    #[must_use]
    pub fn statuses(&self, story_id: &str) -> Vec<ExecutionStatus> {
        self.entries(story_id).iter().map(|e| e.status).collect()
    }
}

#[async_trait]
impl ExecutionLog for MemoryExecutionLog {
    async fn append(&self, entry: ExecutionLogEntry) -> StoreResult<()> {
        self.rows
            .entry(entry.story_id.clone())
            .or_default()
            .push(entry);
        Ok(())
    }
}

/// Log appending one JSON object per line to a file
#[derive(Debug)]
pub struct JsonlExecutionLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlExecutionLog {
    /// Create log writing to `path` (created on first append)
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Target file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ExecutionLog for JsonlExecutionLog {
    async fn append(&self, entry: ExecutionLogEntry) -> StoreResult<()> {
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');

        // One writer at a time so lines never interleave.
        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StoreError::io_error(&self.path, e))?;

        file.write_all(&line)
            .await
            .map_err(|e| StoreError::io_error(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| StoreError::io_error(&self.path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex as StdMutex};

    #[tokio::test]
    async fn memory_log_keeps_rows_per_story() {
        let log = MemoryExecutionLog::new();

        log.append(ExecutionLogEntry::new(
            "US-1",
            "planning_agent",
            ExecutionStatus::Started,
            json!({}),
        ))
        .await
        .unwrap();
        log.append(ExecutionLogEntry::new(
            "US-2",
            "planning_agent",
            ExecutionStatus::Started,
            json!({}),
        ))
        .await
        .unwrap();
        log.append(ExecutionLogEntry::new(
            "US-1",
            "planning_agent",
            ExecutionStatus::Completed,
            json!({"architecture": {}}),
        ))
        .await
        .unwrap();

        assert_eq!(
            log.statuses("US-1"),
            vec![ExecutionStatus::Started, ExecutionStatus::Completed]
        );
        assert_eq!(log.entries("US-2").len(), 1);
        assert!(log.entries("US-3").is_empty());
    }

    #[tokio::test]
    async fn jsonl_log_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonlExecutionLog::new(dir.path().join("executions.jsonl"));

        for status in [ExecutionStatus::Started, ExecutionStatus::Failed] {
            log.append(ExecutionLogEntry::new(
                "US-9",
                "planning_agent",
                status,
                json!({"error": "boom"}),
            ))
            .await
            .unwrap();
        }

        let text = tokio::fs::read_to_string(log.path()).await.unwrap();
        let rows: Vec<ExecutionLogEntry> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].status, ExecutionStatus::Failed);
        assert_eq!(rows[1].output["error"], "boom");
    }

    #[tokio::test]
    async fn jsonl_log_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonlExecutionLog::new(dir.path().join("missing").join("log.jsonl"));

        let err = log
            .append(ExecutionLogEntry::new(
                "US-9",
                "planning_agent",
                ExecutionStatus::Started,
                json!({}),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[derive(Clone, Default)]
    struct CapturedOutput(Arc<StdMutex<Vec<u8>>>);

    impl std::io::Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn tracing_log_emits_rows_as_events() {
        let output = CapturedOutput::default();
        let writer = output.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let log = TracingExecutionLog::new();
        log.append(ExecutionLogEntry::new(
            "US-5",
            "planning_agent",
            ExecutionStatus::Completed,
            json!({"tables": 2}),
        ))
        .await
        .unwrap();

        let text = String::from_utf8(output.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("Execution row"));
        assert!(text.contains("story_id=US-5"));
        assert!(text.contains("status=\"completed\""));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ExecutionStatus::Completed).unwrap(),
            json!("completed")
        );
    }
}
