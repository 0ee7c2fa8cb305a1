//! # ActorClient Trait
//!
//! Provides a common interface for record-specific clients, adding default `get` and
//! `upsert` methods built on top of a generic `ResourceClient`.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for record-specific clients to inherit the standard store operations.
///
/// # Example
///
/// ```rust
/// use tavern_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
///
/// #[derive(Clone, Debug)]
/// struct Tab { owner: String }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("{0}")]
/// struct TabError(String);
///
/// impl ActorEntity for Tab {
///     type Id = String;
///     type Context = ();
///     type Error = TabError;
///     fn id(&self) -> String { self.owner.clone() }
/// }
///
/// struct TabClient {
///     inner: ResourceClient<Tab>,
/// }
///
/// impl ActorClient<Tab> for TabClient {
///     type Error = TabError;
///
///     fn inner(&self) -> &ResourceClient<Tab> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         TabError(e.to_string())
///     }
/// }
///
/// async fn usage(client: TabClient) {
///     // get() and upsert() are provided automatically!
///     let _ = client.get("alice".to_string()).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The record-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific record error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a record by key.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Insert or replace a record under its own key.
    #[tracing::instrument(skip(self, entity))]
    async fn upsert(&self, entity: T) -> Result<T, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().upsert(entity).await.map_err(Self::map_error)
    }
}
