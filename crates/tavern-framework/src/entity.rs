//! # ActorEntity Trait
//!
//! The `ActorEntity` trait defines the contract that every keyed record (a customer, a
//! visitor, ...) must implement to be stored by the generic `ResourceActor`. It specifies
//! associated types for the key, the injected context and the error, and provides the
//! `on_upsert` lifecycle hook.
//!
//! # Architecture Note
//! Records carry their own key. The actor never generates IDs: whoever writes a record
//! decides its identity, and writing under an existing key replaces the whole record.
//! This gives "insert-or-replace" semantics with no partial updates ever visible.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_upsert`]
//!
//! You do **not** need to implement the hook unless you want to customize behavior.
//! The default implementation does nothing (`Ok(())`).

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any keyed record must implement to be managed by ResourceActor.
///
/// # Async & Context
/// This trait is `#[async_trait]` to allow asynchronous operations in hooks.
/// It also defines a `Context` type, which is injected into every hook. This allows "Late Binding"
/// of dependencies (passing them to `run()` instead of `new()`).
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + Debug + 'static {
    /// The unique key for this record (e.g., a customer name).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The key this record is stored under.
    fn id(&self) -> Self::Id;

    /// Called before the record replaces (or first occupies) its slot in the store.
    ///
    /// `previous` is the record currently stored under the same key, if any.
    /// Returning an error rejects the write and leaves the store untouched.
    async fn on_upsert(
        &mut self,
        _previous: Option<&Self>,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}
