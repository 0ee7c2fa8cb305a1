//! The order orchestrator: a self-restarting workflow that turns order signals into
//! time-bounded sub-tasks.
//!
//! Each generation dispatches at most `restart_threshold` orders, drains them, and hands
//! over to a fresh generation through the [`WorkflowHost`]. See [`workflow`] for the state
//! machine.

pub mod error;
pub mod state;
pub mod workflow;

pub use error::*;
pub use state::*;
pub use workflow::OrderWorkflow;

use crate::config::TavernConfig;
use crate::model::{OrderEvent, OrderReceipt};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tavern_framework::{
    DeadLetter, FrameworkError, HostReport, SignalReceiver, WorkflowHandle, WorkflowHost,
};
use tokio::sync::watch;

/// The work done for one order inside its sub-task.
///
/// Implementations must not touch orchestrator state; they only see the order.
#[async_trait]
pub trait OrderProcessor: Send + Sync + 'static {
    async fn process(&self, order: OrderEvent) -> Result<OrderReceipt, OrderError>;
}

/// Handle to a running orchestrator.
pub struct OrchestratorHandle {
    status: watch::Receiver<OrchestratorStatus>,
    host: WorkflowHandle<Value, OrchestratorError>,
}

impl OrchestratorHandle {
    /// A receiver of the latest [`OrchestratorStatus`].
    pub fn status(&self) -> watch::Receiver<OrchestratorStatus> {
        self.status.clone()
    }

    /// Signals that could not be dispatched so far.
    pub fn drain_dead_letters(&mut self) -> Vec<DeadLetter<Value>> {
        self.host.drain_dead_letters()
    }

    pub async fn next_dead_letter(&mut self) -> Option<DeadLetter<Value>> {
        self.host.next_dead_letter().await
    }

    pub fn is_finished(&self) -> bool {
        self.host.is_finished()
    }

    /// Waits for the orchestrator to complete. It only completes once its signal channel
    /// is closed and the last generation has drained.
    pub async fn join(self) -> Result<HostReport, FrameworkError> {
        self.host.join().await
    }
}

/// Starts the orchestrator host, consuming `signals`.
pub fn spawn_orchestrator<P: OrderProcessor>(
    config: &TavernConfig,
    processor: Arc<P>,
    signals: SignalReceiver<Value>,
) -> OrchestratorHandle {
    let (status_tx, status) = watch::channel(OrchestratorStatus::new(0));
    let status_tx = Arc::new(status_tx);
    let restart_threshold = config.restart_threshold;
    let order_timeout = config.order_timeout;

    let host = WorkflowHost::spawn("order-orchestrator", signals, move |_generation| {
        OrderWorkflow::new(
            processor.clone(),
            restart_threshold,
            order_timeout,
            status_tx.clone(),
        )
    });

    OrchestratorHandle { status, host }
}
