//! Greeting a visitor: compute their updated record, then store it.
//!
//! The first step never writes, so any failure before the second step leaves the
//! directory as it was. A greeter runs one greeting at a time, so two visits that overlap
//! are both counted.

use crate::clients::CustomerClient;
use crate::customer_actor::CustomerError;
use crate::model::{CustomerInput, CustomerRecord};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GreetingError {
    #[error("visitor must give a name")]
    InvalidVisitor,

    #[error(transparent)]
    Directory(#[from] CustomerError),
}

/// Greets visitors against one directory.
pub struct Greeter {
    customers: CustomerClient,
    /// Visitors greeted through this greeter.
    visitors_greeted: AtomicU64,
    /// Held from the read in step 1 to the write in step 2.
    visit_lock: Mutex<()>,
}

impl Greeter {
    pub fn new(customers: CustomerClient) -> Self {
        Self {
            customers,
            visitors_greeted: AtomicU64::new(0),
            visit_lock: Mutex::new(()),
        }
    }

    pub fn visitors_greeted(&self) -> u64 {
        self.visitors_greeted.load(Ordering::Relaxed)
    }

    /// Records a visit and returns the stored record.
    #[instrument(skip(self, visitor), fields(customer = %visitor.name))]
    pub async fn greet_visitor(
        &self,
        visitor: CustomerInput,
    ) -> Result<CustomerRecord, GreetingError> {
        if visitor.name.trim().is_empty() {
            return Err(GreetingError::InvalidVisitor);
        }
        let count = self.visitors_greeted.fetch_add(1, Ordering::Relaxed) + 1;
        info!(visitor_count = count, "New visitor");

        let _visit = self.visit_lock.lock().await;
        let updated = self.prepare_visit(&visitor, Utc::now()).await?;
        self.store_customer(updated).await
    }

    /// Step 1: the visitor's record after this visit. Nothing is written.
    ///
    /// The visitor's own details win; only the visit count is carried over from the
    /// stored record, if there is one.
    pub async fn prepare_visit(
        &self,
        visitor: &CustomerInput,
        now: DateTime<Utc>,
    ) -> Result<CustomerRecord, GreetingError> {
        let times_visited = match self.customers.get_customer(&visitor.name).await {
            Ok(existing) => existing.times_visited,
            Err(CustomerError::NotFound(_)) => 0,
            Err(e) => return Err(e.into()),
        };
        let current = CustomerRecord {
            times_visited,
            ..CustomerRecord::new(visitor.name.clone(), visitor.age)
        };
        Ok(current.visited_at(now))
    }

    /// Step 2: persist the record.
    pub async fn store_customer(
        &self,
        record: CustomerRecord,
    ) -> Result<CustomerRecord, GreetingError> {
        info!(
            last_visit = ?record.last_visit,
            times_visited = record.times_visited,
            "Updating customer"
        );
        Ok(self.customers.update_customer(record).await?)
    }
}
