//! # Tavern
//!
//! > **A long-lived order orchestrator that restarts itself on a budget.**
//!
//! Customers are greeted at the door and kept in a directory. Orders arrive as signals; each
//! one is validated in its own time-bounded sub-task. After a fixed number of orders the
//! orchestrator drains and continues as a fresh generation, so no state grows without bound
//! and no order is lost or handled twice across the restart.
//!
//! ## Core Concepts
//!
//! ### One owner per piece of state
//! - The **customer directory** is a single actor owning a map of records. Every `get` and
//!   `update` goes through its mailbox, one at a time.
//! - The **orchestrator's counters** belong to the running generation's loop. Sub-tasks only
//!   report a result; they never touch them.
//! - The **signal queue** belongs to the workflow host and outlives every generation.
//!
//! ### Failure tiers
//! - A bad order (unknown or under-age customer, a timeout) fails that order only.
//! - A signal that is not an order is dead-lettered and not counted.
//! - Losing track of a sub-task ends the orchestrator with an error.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`tavern_framework`])
//! The keyed resource actor, signal channel, child-task set and workflow host.
//!
//! ### 2. The Records ([`model`], [`customer_actor`])
//! [`CustomerRecord`], [`OrderEvent`], and the directory actor built from them.
//!
//! ### 3. The Interface ([`clients`])
//! [`CustomerClient`] for the directory and [`OrderClient`] for submitting orders.
//!
//! ### 4. The Work ([`pipeline`], [`orchestrator`])
//! - [`ValidationPipeline`](pipeline::ValidationPipeline): lookup, then the age check
//! - [`Greeter`](pipeline::Greeter): prepare the visit, then store it
//! - [`OrderWorkflow`](orchestrator::OrderWorkflow): the Running / Draining / Restarting loop
//!
//! ### 5. Wiring ([`lifecycle`], [`config`])
//! [`Tavern`] starts everything from a [`TavernConfig`] and shuts it down in order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tavern::{CustomerInput, OrderEvent, Tavern, TavernConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     tavern_framework::tracing::setup_tracing();
//!
//!     let tavern = Tavern::new(TavernConfig::from_env()?)?;
//!     tavern.greet_visitor(CustomerInput::new("Alice", 30)).await?;
//!     tavern.submit_order(&OrderEvent::new("ale", 4.5, "Alice")).await?;
//!
//!     tavern.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod clients;
pub mod config;
pub mod customer_actor;
pub mod lifecycle;
pub mod model;
pub mod orchestrator;
pub mod pipeline;

pub use clients::{CustomerClient, OrderClient, SubmitError};
pub use config::{ConfigError, TavernConfig};
pub use lifecycle::{ShutdownError, Tavern};
pub use model::{CustomerInput, CustomerRecord, DirectoryUpdate, OrderEvent, OrderReceipt};
pub use orchestrator::{OrchestratorStatus, OrderError, Phase};
