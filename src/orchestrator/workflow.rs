//! One generation of the order orchestrator.
//!
//! ```text
//!            signal ──► dispatch ──► child (order_timeout)
//!   Running ◄──────────────────────────┘ outcome
//!      │ processed >= threshold            │ signals closed
//!      ▼                                   ▼
//!   Draining (no more signals read; wait for every child)
//!      │                                   │
//!      ▼                                   ▼
//!   Restarting ──► ContinueAsNew        Completed
//! ```
//!
//! The generation never reads a signal once it starts draining, so a signal submitted at
//! the boundary stays in the host-owned queue and is the first one the next generation
//! receives.

use super::error::{OrchestratorError, OrderError};
use super::state::{OrchestratorStatus, Phase};
use super::OrderProcessor;
use crate::model::{OrderEvent, OrderReceipt};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tavern_framework::{ChildError, ChildSet, Workflow, WorkflowContext, WorkflowExit};
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub(crate) type OrderOutcome = Result<OrderReceipt, ChildError<OrderError>>;

/// A single generation. Built fresh by the host for every generation; nothing in it
/// outlives [`Workflow::run`] except the shared processor and status channel.
pub struct OrderWorkflow<P> {
    processor: Arc<P>,
    restart_threshold: u32,
    order_timeout: Duration,
    status_tx: Arc<watch::Sender<OrchestratorStatus>>,
}

impl<P: OrderProcessor> OrderWorkflow<P> {
    pub fn new(
        processor: Arc<P>,
        restart_threshold: u32,
        order_timeout: Duration,
        status_tx: Arc<watch::Sender<OrchestratorStatus>>,
    ) -> Self {
        Self {
            processor,
            restart_threshold,
            order_timeout,
            status_tx,
        }
    }

    fn publish(&self, status: &OrchestratorStatus) {
        self.status_tx.send_replace(status.clone());
    }

    fn dispatch(
        &self,
        ctx: &WorkflowContext<Value>,
        children: &mut ChildSet<OrderReceipt, OrderError>,
        status: &mut OrchestratorStatus,
        payload: Value,
    ) {
        match OrderEvent::from_payload(&payload) {
            Ok(order) => {
                status.processed += 1;
                info!(
                    item = %order.item,
                    by = %order.by,
                    processed = status.processed,
                    "Order received"
                );
                let processor = self.processor.clone();
                children.spawn("order", self.order_timeout, async move {
                    processor.process(order).await
                });
                status.in_flight = children.len();
            }
            Err(e) => {
                warn!(error = %e, "Order could not be dispatched");
                status.rejected += 1;
                ctx.dead_letter(payload, e.to_string());
            }
        }
    }

    fn settle(
        &self,
        outcome: OrderOutcome,
        children: &ChildSet<OrderReceipt, OrderError>,
        status: &mut OrchestratorStatus,
    ) -> Result<(), OrchestratorError> {
        status.in_flight = children.len();
        match classify(outcome)? {
            Ok(receipt) => {
                status.succeeded += 1;
                info!(
                    item = %receipt.item,
                    price = receipt.price,
                    customer = %receipt.customer,
                    "Order completed"
                );
            }
            Err(e) => {
                status.failed += 1;
                warn!(error = %e, "Order failed");
            }
        }
        Ok(())
    }
}

/// Splits a child outcome into the order's own result and faults that end the generation.
pub(crate) fn classify(
    outcome: OrderOutcome,
) -> Result<Result<OrderReceipt, OrderError>, OrchestratorError> {
    match outcome {
        Ok(receipt) => Ok(Ok(receipt)),
        Err(ChildError::Failed(e)) => Ok(Err(e)),
        Err(ChildError::TimedOut { label, budget }) => Ok(Err(OrderError::SubTaskTimeout {
            stage: label,
            budget,
        })),
        Err(ChildError::Panicked(reason)) => Ok(Err(OrderError::SubTaskPanicked(reason))),
        Err(ChildError::Lost(reason)) => Err(OrchestratorError::LostSubTask(reason)),
    }
}

#[async_trait]
impl<P: OrderProcessor> Workflow for OrderWorkflow<P> {
    type Signal = Value;
    type Error = OrchestratorError;

    async fn run(self, ctx: &mut WorkflowContext<Value>) -> Result<WorkflowExit, OrchestratorError> {
        let mut status = OrchestratorStatus::new(ctx.generation());
        let mut children = ChildSet::new();
        let mut input_closed = false;
        self.publish(&status);
        info!(threshold = self.restart_threshold, pending = ctx.pending(), "Generation running");

        while status.processed < self.restart_threshold && !input_closed {
            tokio::select! {
                signal = ctx.recv() => match signal {
                    Some(payload) => self.dispatch(ctx, &mut children, &mut status, payload),
                    None => {
                        debug!("Signal channel closed");
                        input_closed = true;
                    }
                },
                Some(outcome) = children.join_next(), if !children.is_empty() => {
                    self.settle(outcome, &children, &mut status)?;
                }
            }
            self.publish(&status);
        }

        status.phase = Phase::Draining;
        self.publish(&status);
        info!(in_flight = children.len(), processed = status.processed, "Draining");

        while let Some(outcome) = children.join_next().await {
            self.settle(outcome, &children, &mut status)?;
            self.publish(&status);
        }
        debug_assert!(status.is_settled());

        if input_closed {
            status.phase = Phase::Completed;
            self.publish(&status);
            info!(succeeded = status.succeeded, failed = status.failed, "Orchestrator stopped");
            Ok(WorkflowExit::Completed)
        } else {
            status.phase = Phase::Restarting;
            self.publish(&status);
            info!(succeeded = status.succeeded, failed = status.failed, "Restarting");
            Ok(WorkflowExit::ContinueAsNew)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_keeps_order_failures_local() {
        let timed_out: OrderOutcome = Err(ChildError::TimedOut {
            label: "order".to_string(),
            budget: Duration::from_secs(120),
        });
        assert_eq!(
            classify(timed_out).unwrap(),
            Err(OrderError::SubTaskTimeout {
                stage: "order".to_string(),
                budget: Duration::from_secs(120),
            })
        );

        let panicked: OrderOutcome = Err(ChildError::Panicked("boom".to_string()));
        assert!(matches!(
            classify(panicked).unwrap(),
            Err(OrderError::SubTaskPanicked(_))
        ));
    }

    #[test]
    fn test_classify_lost_child_is_fatal() {
        let lost: OrderOutcome = Err(ChildError::Lost("task 7 was cancelled".to_string()));
        assert!(matches!(
            classify(lost),
            Err(OrchestratorError::LostSubTask(_))
        ));
    }
}
