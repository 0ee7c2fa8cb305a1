//! Error types for the customer directory.

use thiserror::Error;

/// Errors that can occur during directory operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    /// No record is stored under the requested name.
    #[error("no such customer: {0}")]
    NotFound(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

