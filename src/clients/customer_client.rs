use crate::customer_actor::CustomerError;
use crate::model::CustomerRecord;
use async_trait::async_trait;
use tavern_framework::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for the customer directory.
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<CustomerRecord>,
}

impl CustomerClient {
    pub fn new(inner: ResourceClient<CustomerRecord>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<CustomerRecord> for CustomerClient {
    type Error = CustomerError;

    fn inner(&self) -> &ResourceClient<CustomerRecord> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        CustomerError::ActorCommunicationError(e.to_string())
    }
}

impl CustomerClient {
    /// Looks a customer up by name. A missing record is [`CustomerError::NotFound`].
    #[instrument(skip(self))]
    pub async fn get_customer(&self, name: &str) -> Result<CustomerRecord, CustomerError> {
        debug!("Sending request");
        self.get(name.to_string())
            .await?
            .ok_or_else(|| CustomerError::NotFound(name.to_string()))
    }

    /// Inserts or replaces the record stored under `record.name`.
    #[instrument(skip(self, record), fields(customer = %record.name))]
    pub async fn update_customer(
        &self,
        record: CustomerRecord,
    ) -> Result<CustomerRecord, CustomerError> {
        debug!("Sending request");
        self.upsert(record).await
    }
}
