//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the component that owns a keyed store of
//! records. It implements the "Server" side of the Actor Model, processing messages
//! sequentially and ensuring exclusive access to the store.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a keyed collection of records.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the state (`store`) and
/// the receiver end of the channel.
///
/// **Concurrency Model**:
/// Any number of tasks may hold a [`ResourceClient`] and call it concurrently, but the
/// actor processes its mailbox *sequentially*. Every operation therefore behaves as if it
/// held a single lock over the whole map, without a `Mutex` anywhere: the loop task has
/// exclusive ownership of `store`.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass dependencies into `actor.run(context)`.
/// 3.  **Run**: Spawn the actor's run loop in a background task.
///
/// ```rust
/// use tavern_framework::{ActorEntity, ResourceActor};
///
/// #[derive(Clone, Debug)]
/// struct Tab { owner: String, total: u32 }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("tab error")]
/// struct TabError;
///
/// impl ActorEntity for Tab {
///     type Id = String;
///     type Context = ();
///     type Error = TabError;
///     fn id(&self) -> String { self.owner.clone() }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Tab>::new(10);
///     tokio::spawn(actor.run(()));
///
///     client.upsert(Tab { owner: "alice".into(), total: 3 }).await.unwrap();
///     let tab = client.get("alice".to_string()).await.unwrap().unwrap();
///     assert_eq!(tab.total, 3);
/// }
/// ```
///
/// # Operations
///
/// * **Get**: Looks up the record by key and returns a clone of it, or `None`.
/// * **Upsert**:
///     1. Calls the `on_upsert` hook with the record currently under the same key.
///     2. Replaces the stored record with the new one as a whole.
///     3. Returns the stored record.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// # Context Injection
    /// The `context` argument is injected into every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "CustomerRecord" instead of the full path)
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Upsert {
                    mut entity,
                    respond_to,
                } => {
                    let id = entity.id();
                    debug!(entity_type, %id, ?entity, "Upsert");

                    let previous = self.store.get(&id);
                    if let Err(e) = entity.on_upsert(previous, &context).await {
                        warn!(entity_type, %id, error = %e, "on_upsert failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }

                    let replaced = self.store.insert(id.clone(), entity.clone()).is_some();
                    info!(entity_type, %id, replaced, size = self.store.len(), "Upserted");
                    let _ = respond_to.send(Ok(entity));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
