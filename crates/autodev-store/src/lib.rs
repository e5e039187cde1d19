//! Session cache and execution log for the planner
//!
//! Passthrough sinks behind traits so the planning service can be wired to
//! in-process implementations or to external backends:
//! - [`SessionStore`]: TTL'd key-value cache of serialized architectures
//! - [`ExecutionLog`]: append-only status rows per story

#![warn(unreachable_pub)]

mod error;
mod execution_log;
mod session;

pub use error::{StoreError, StoreResult};
pub use execution_log::{
    ExecutionLog, ExecutionLogEntry, ExecutionStatus, JsonlExecutionLog, MemoryExecutionLog,
    TracingExecutionLog,
};
pub use session::{
    architecture_key, load_architecture, save_architecture, MokaSessionStore, SessionStore,
    DEFAULT_SESSION_TTL,
};
