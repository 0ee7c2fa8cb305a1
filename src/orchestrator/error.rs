//! Error types for order processing.
//!
//! Three tiers, by blast radius:
//! - [`OrderError`]: one order failed; the orchestrator logs it and moves on.
//! - [`DispatchError`]: a signal never became an order; it is dead-lettered.
//! - [`OrchestratorError`]: the generation itself is broken and must not continue.

use std::time::Duration;
use thiserror::Error;

/// Why a single order failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("no such customer: {0}")]
    CustomerUnknown(String),

    #[error("customer is not old enough: {name} is {age}")]
    IneligibleCustomer { name: String, age: u32 },

    #[error("{stage} exceeded its {budget:?} budget")]
    SubTaskTimeout { stage: String, budget: Duration },

    #[error("order sub-task panicked: {0}")]
    SubTaskPanicked(String),

    /// The directory could not be reached.
    #[error("customer directory unavailable: {0}")]
    Directory(String),
}

/// Why a signal could not be turned into an order sub-task.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("payload is not an order: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("order rejected: {0}")]
    Invalid(&'static str),
}

/// Faults in the orchestrator's own bookkeeping. Fatal to the generation.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A sub-task was cancelled underneath the orchestrator, so its outcome is unknown.
    #[error("lost track of an order sub-task: {0}")]
    LostSubTask(String),
}
