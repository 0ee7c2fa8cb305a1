use crate::clients::{CustomerClient, OrderClient, SubmitError};
use crate::config::TavernConfig;
use crate::customer_actor::{self, DirectoryNotifier};
use crate::model::{CustomerInput, CustomerRecord, DirectoryUpdate, OrderEvent};
use crate::orchestrator::{spawn_orchestrator, OrchestratorHandle, OrchestratorStatus};
use crate::pipeline::{Greeter, GreetingError, ValidationPipeline};
use serde_json::Value;
use std::sync::Arc;
use tavern_framework::{signal, DeadLetter, FrameworkError, HostReport};
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Why [`Tavern::shutdown`] did not finish cleanly.
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("orchestrator failed: {0}")]
    Orchestrator(#[from] FrameworkError),

    #[error("customer directory task failed: {0}")]
    Directory(#[from] tokio::task::JoinError),
}

/// The running tavern: a customer directory plus the order orchestrator.
///
/// # Architecture
///
/// - **Directory actor**: owns every [`CustomerRecord`]
/// - **Orchestrator host**: consumes order signals, validating each order against the
///   directory in its own sub-task
/// - **Greeter**: the two-step greeting pipeline, called directly by visitors
///
/// # Example
///
/// ```no_run
/// # async fn demo() -> anyhow::Result<()> {
/// use tavern::{CustomerInput, OrderEvent, Tavern, TavernConfig};
///
/// let tavern = Tavern::new(TavernConfig::default())?;
/// tavern.greet_visitor(CustomerInput::new("Alice", 30)).await?;
/// tavern.submit_order(&OrderEvent::new("ale", 4.5, "Alice")).await?;
///
/// let report = tavern.shutdown().await?;
/// println!("{} generation(s)", report.generations);
/// # Ok(())
/// # }
/// ```
pub struct Tavern {
    /// Client for the customer directory.
    pub customers: CustomerClient,

    order_client: OrderClient,
    greeter: Greeter,
    notifier: DirectoryNotifier,
    orchestrator: OrchestratorHandle,
    directory: JoinHandle<()>,
}

impl Tavern {
    /// Starts the directory and the orchestrator.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: TavernConfig) -> Result<Self, crate::config::ConfigError> {
        config.validate()?;

        // 1. Directory, with notifications
        let notifier = DirectoryNotifier::new(config.directory_buffer);
        let (directory_actor, customers) = customer_actor::new(config.directory_buffer);
        let directory = tokio::spawn(directory_actor.run(notifier.clone()));

        // 2. Orchestrator, validating against the directory
        let (signals_tx, signals_rx) = signal::channel(config.signal_buffer);
        let pipeline = ValidationPipeline::new(customers.clone(), config.step_timeout);
        let orchestrator = spawn_orchestrator(&config, Arc::new(pipeline), signals_rx);

        info!(
            restart_threshold = config.restart_threshold,
            order_timeout = ?config.order_timeout,
            "Tavern open"
        );

        Ok(Self {
            greeter: Greeter::new(customers.clone()),
            customers,
            order_client: OrderClient::new(signals_tx),
            notifier,
            orchestrator,
            directory,
        })
    }

    /// A cloneable handle for submitting orders from other tasks.
    pub fn order_client(&self) -> OrderClient {
        self.order_client.clone()
    }

    /// Queues an order. Returns once it is queued, not once it is processed.
    pub async fn submit_order(&self, order: &OrderEvent) -> Result<(), SubmitError> {
        self.order_client.submit_order(order).await
    }

    pub async fn submit_payload(&self, payload: Value) -> Result<(), SubmitError> {
        self.order_client.submit_payload(payload).await
    }

    /// Greets a visitor and waits for their updated record.
    pub async fn greet_visitor(
        &self,
        visitor: CustomerInput,
    ) -> Result<CustomerRecord, GreetingError> {
        self.greeter.greet_visitor(visitor).await
    }

    pub fn status(&self) -> watch::Receiver<OrchestratorStatus> {
        self.orchestrator.status()
    }

    pub fn subscribe_directory(&self) -> broadcast::Receiver<DirectoryUpdate> {
        self.notifier.subscribe()
    }

    pub fn drain_dead_letters(&mut self) -> Vec<DeadLetter<Value>> {
        self.orchestrator.drain_dead_letters()
    }

    /// Waits for the next undeliverable signal.
    pub async fn next_dead_letter(&mut self) -> Option<DeadLetter<Value>> {
        self.orchestrator.next_dead_letter().await
    }

    /// Gracefully shuts the tavern down.
    ///
    /// 1. Stops taking orders; the orchestrator drains what it has and completes
    /// 2. Closes the directory once nothing can reach it any more
    ///
    /// Clones handed out by [`Tavern::order_client`] keep the orchestrator open until they
    /// are dropped too.
    pub async fn shutdown(self) -> Result<HostReport, ShutdownError> {
        info!("Closing the tavern...");

        drop(self.order_client);
        let report = self.orchestrator.join().await.map_err(|e| {
            error!(error = %e, "Orchestrator failed");
            ShutdownError::from(e)
        })?;

        // The pipeline's client went with the orchestrator; these are the last ones.
        drop(self.greeter);
        drop(self.customers);
        self.directory.await?;

        info!(generations = report.generations, "Tavern closed");
        Ok(report)
    }
}
