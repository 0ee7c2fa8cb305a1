//! # Child Tasks
//!
//! A [`ChildSet`] launches isolated, time-bounded sub-tasks and lets exactly one owner
//! observe their completion. Children never touch the owner's state: each one reports a
//! single `Result` and nothing else.
//!
//! Every child runs under its own wall-clock budget. A child that exceeds it is cut off
//! and reports [`ChildError::TimedOut`]; siblings are unaffected.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Why a child did not produce a value.
#[derive(Debug, thiserror::Error)]
pub enum ChildError<E> {
    /// The child ran to completion and returned an error.
    #[error("{0}")]
    Failed(E),
    /// The child exceeded its budget and was cancelled.
    #[error("{label} exceeded its {budget:?} budget")]
    TimedOut { label: String, budget: Duration },
    /// The child panicked.
    #[error("sub-task panicked: {0}")]
    Panicked(String),
    /// The child was cancelled from outside; its outcome is unknown.
    #[error("sub-task lost: {0}")]
    Lost(String),
}

/// The set of children a single owner is waiting on.
pub struct ChildSet<R, E> {
    tasks: JoinSet<Result<R, ChildError<E>>>,
}

impl<R, E> Default for ChildSet<R, E>
where
    R: Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, E> ChildSet<R, E>
where
    R: Send + 'static,
    E: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
        }
    }

    /// Launches `work` as a child bounded by `budget`, inside the caller's current span.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(&mut self, label: impl Into<String>, budget: Duration, work: F)
    where
        F: Future<Output = Result<R, E>> + Send + 'static,
    {
        let label = label.into();
        self.tasks.spawn(async move {
            match tokio::time::timeout(budget, work).await {
                Ok(result) => result.map_err(ChildError::Failed),
                Err(_) => Err(ChildError::TimedOut { label, budget }),
            }
        }
        .in_current_span());
    }

    /// Waits for the next child to finish, in completion order.
    ///
    /// Returns `None` when no children are outstanding. Cancel safe.
    pub async fn join_next(&mut self) -> Option<Result<R, ChildError<E>>> {
        let joined = self.tasks.join_next().await?;
        Some(match joined {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => Err(ChildError::Panicked(e.to_string())),
            Err(e) => Err(ChildError::Lost(e.to_string())),
        })
    }

    /// Number of children that have not been observed yet.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
