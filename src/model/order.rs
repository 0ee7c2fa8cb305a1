use crate::orchestrator::DispatchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An order as submitted to the orchestrator: `{ "item": .., "price": .., "by": .. }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub item: String,
    pub price: f64,
    /// Name of the ordering customer.
    pub by: String,
}

impl OrderEvent {
    pub fn new(item: impl Into<String>, price: f64, by: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            price,
            by: by.into(),
        }
    }

    /// Decodes and validates a signal payload.
    pub fn from_payload(payload: &Value) -> Result<Self, DispatchError> {
        let event = Self::deserialize(payload)?;
        event.validate()?;
        Ok(event)
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.item.trim().is_empty() {
            return Err(DispatchError::Invalid("item is empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DispatchError::Invalid("price must be a non-negative number"));
        }
        if self.by.trim().is_empty() {
            return Err(DispatchError::Invalid("customer name is empty"));
        }
        Ok(())
    }
}

/// A successfully validated order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub item: String,
    pub price: f64,
    pub customer: String,
}
