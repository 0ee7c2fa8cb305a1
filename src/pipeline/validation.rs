//! Order validation: find the customer, then check they may be served.
//!
//! Both steps only read the directory. Each runs under its own step budget.

use crate::clients::CustomerClient;
use crate::customer_actor::CustomerError;
use crate::model::{CustomerRecord, OrderEvent, OrderReceipt};
use crate::orchestrator::{OrderError, OrderProcessor};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{info, instrument};

/// Customers younger than this are refused.
pub const MINIMUM_AGE: u32 = 18;

/// Fetches the ordering customer's record.
#[instrument(skip(directory))]
pub async fn lookup_customer(
    directory: &CustomerClient,
    name: &str,
) -> Result<CustomerRecord, OrderError> {
    directory.get_customer(name).await.map_err(|e| match e {
        CustomerError::NotFound(name) => OrderError::CustomerUnknown(name),
        other => OrderError::Directory(other.to_string()),
    })
}

/// `true` for customers of at least [`MINIMUM_AGE`]; younger ones are an error.
pub fn check_eligibility(record: &CustomerRecord) -> Result<bool, OrderError> {
    if record.age < MINIMUM_AGE {
        return Err(OrderError::IneligibleCustomer {
            name: record.name.clone(),
            age: record.age,
        });
    }
    Ok(true)
}

/// Runs one step, failing it with [`OrderError::SubTaskTimeout`] once `budget` elapses.
pub async fn within_budget<T, F>(stage: &str, budget: Duration, step: F) -> Result<T, OrderError>
where
    F: Future<Output = Result<T, OrderError>>,
{
    tokio::time::timeout(budget, step)
        .await
        .map_err(|_| OrderError::SubTaskTimeout {
            stage: stage.to_string(),
            budget,
        })?
}

/// The per-order work of the orchestrator: lookup, then eligibility.
#[derive(Clone)]
pub struct ValidationPipeline {
    customers: CustomerClient,
    step_timeout: Duration,
}

impl ValidationPipeline {
    pub fn new(customers: CustomerClient, step_timeout: Duration) -> Self {
        Self {
            customers,
            step_timeout,
        }
    }
}

#[async_trait]
impl OrderProcessor for ValidationPipeline {
    #[instrument(skip(self, order), fields(item = %order.item, by = %order.by))]
    async fn process(&self, order: OrderEvent) -> Result<OrderReceipt, OrderError> {
        let record = within_budget(
            "lookup_customer",
            self.step_timeout,
            lookup_customer(&self.customers, &order.by),
        )
        .await?;
        within_budget("check_eligibility", self.step_timeout, async {
            check_eligibility(&record)
        })
        .await?;

        info!(item = %order.item, price = order.price, "Order made");
        Ok(OrderReceipt {
            item: order.item,
            price: order.price,
            customer: record.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_age_boundary() {
        assert_eq!(check_eligibility(&CustomerRecord::new("Ann", 18)), Ok(true));
        assert_eq!(
            check_eligibility(&CustomerRecord::new("Tim", 17)),
            Err(OrderError::IneligibleCustomer {
                name: "Tim".to_string(),
                age: 17,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_step_times_out() {
        let result: Result<(), OrderError> =
            within_budget("lookup_customer", Duration::from_secs(60), async {
                tokio::time::sleep(Duration::from_secs(61)).await;
                Ok(())
            })
            .await;

        assert_eq!(
            result,
            Err(OrderError::SubTaskTimeout {
                stage: "lookup_customer".to_string(),
                budget: Duration::from_secs(60),
            })
        );
    }
}
