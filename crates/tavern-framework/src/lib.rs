//! # Tavern Framework
//!
//! The generic plumbing under the tavern: a keyed resource actor for shared records, and
//! the host-side primitives a long-lived, self-restarting order workflow is built on.
//!
//! ## Two halves
//!
//! ### Resource actors
//!
//! - **Entity Layer** ([`ActorEntity`]) - a record that carries its own key
//! - **Runtime Layer** ([`ResourceActor`]) - one task owning a `HashMap`, processing
//!   `Get` / `Upsert` requests strictly one at a time
//! - **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - cloneable, type-safe handles
//!
//! Because the actor processes its mailbox sequentially, every operation behaves as if it
//! held a single lock over the whole store, and readers only ever see whole records.
//!
//! ### Workflow substrate
//!
//! - [`signal`] - ordered delivery of signal payloads to one consumer
//! - [`child`] - isolated, time-bounded sub-tasks with observable completion
//! - [`workflow`] - hosting a [`Workflow`] generation after generation ("continue as new"),
//!   plus a dead-letter queue for signals a generation could not act on
//!
//! ```rust
//! use tavern_framework::{signal, Workflow, WorkflowContext, WorkflowExit, WorkflowHost};
//! use async_trait::async_trait;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("never")]
//! struct Never;
//!
//! /// Counts three signals per generation.
//! struct Counter;
//!
//! #[async_trait]
//! impl Workflow for Counter {
//!     type Signal = u32;
//!     type Error = Never;
//!
//!     async fn run(self, ctx: &mut WorkflowContext<u32>) -> Result<WorkflowExit, Never> {
//!         for _ in 0..3 {
//!             if ctx.recv().await.is_none() {
//!                 return Ok(WorkflowExit::Completed);
//!             }
//!         }
//!         Ok(WorkflowExit::ContinueAsNew)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (sender, receiver) = signal::channel(8);
//!     let handle = WorkflowHost::spawn("counter", receiver, |_generation| Counter);
//!     for n in 0..4 {
//!         sender.signal(n).await.unwrap();
//!     }
//!     drop(sender);
//!     assert_eq!(handle.join().await.unwrap().generations, 2);
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real [`ResourceClient`] from scripted expectations, so code
//! that reads and writes a store can be tested without a running actor.

pub mod actor;
pub mod child;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod signal;
pub mod tracing;
pub mod workflow;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use child::{ChildError, ChildSet};
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use signal::{DeadLetter, SignalReceiver, SignalSender};
pub use workflow::{HostReport, Workflow, WorkflowContext, WorkflowExit, WorkflowHandle, WorkflowHost};
