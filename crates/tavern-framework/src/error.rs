//! # Framework Errors
//!
//! This module defines the common error types used throughout the framework.
//! By centralizing error definitions, we ensure consistent error handling across
//! the resource actors, the signal channel and the workflow host.

/// Errors that can occur within the framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
    #[error("Signal channel closed")]
    SignalClosed,
    #[error("Workflow failed: {0}")]
    WorkflowFailed(Box<dyn std::error::Error + Send + Sync>),
    #[error("Task failed: {0}")]
    TaskFailed(String),
}
