//! Autodev Orchestrator - Sequential story pipeline over the agent services
//!
//! Sends a story to the planning agent, then hands each slice of the returned
//! architecture to the database, backend, frontend and testing agents.

#![warn(unreachable_pub)]

pub mod client;
pub mod error;
pub mod pipeline;
pub mod settings;
pub mod story;
pub mod wire;

pub use client::{AgentClient, HttpAgentClient};
pub use error::AgentCallError;
pub use pipeline::{Orchestrator, PipelineReport, PipelineSuccess, StageOutcome, TestSummary};
pub use settings::{AgentEndpoints, OrchestratorSettings};
pub use story::Story;
pub use wire::{
    BackendTask, CodeLayer, DatabaseTask, EmissionResponse, FrontendTask, GeneratedFile, Stage,
    TestingResponse, TestingTask,
};
