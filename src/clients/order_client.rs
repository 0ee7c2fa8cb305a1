use crate::model::OrderEvent;
use serde_json::Value;
use tavern_framework::SignalSender;
use thiserror::Error;
use tracing::{debug, instrument};

/// Why an order could not be handed to the orchestrator.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The orchestrator has shut down and no longer accepts signals.
    #[error("orchestrator is not accepting orders")]
    Closed,

    #[error("order could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Submits orders to the orchestrator as signals.
///
/// Fire-and-forget: a successful return only means the order was queued. The outcome of
/// processing it is visible through the orchestrator's status and logs.
#[derive(Clone)]
pub struct OrderClient {
    signals: SignalSender<Value>,
}

impl OrderClient {
    pub fn new(signals: SignalSender<Value>) -> Self {
        Self { signals }
    }

    #[instrument(skip(self, order), fields(item = %order.item, by = %order.by))]
    pub async fn submit_order(&self, order: &OrderEvent) -> Result<(), SubmitError> {
        let payload = serde_json::to_value(order)?;
        self.submit_payload(payload).await
    }

    /// Submits a raw payload. Payloads that are not valid orders are dead-lettered by the
    /// orchestrator, not rejected here.
    pub async fn submit_payload(&self, payload: Value) -> Result<(), SubmitError> {
        debug!("Sending signal");
        self.signals
            .signal(payload)
            .await
            .map_err(|_| SubmitError::Closed)
    }
}
