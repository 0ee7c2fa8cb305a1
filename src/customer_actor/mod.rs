//! The customer directory: a keyed store of [`CustomerRecord`]s behind one actor.
//!
//! The actor owns the map and handles one request at a time, so a `get` never observes a
//! half-applied `update` and concurrent writers to different names cannot interfere.

pub mod entity;
pub mod error;

pub use entity::DirectoryNotifier;
pub use error::*;

use crate::clients::CustomerClient;
use crate::model::CustomerRecord;
use tavern_framework::ResourceActor;

/// Creates a new directory actor and its client.
///
/// The actor does nothing until [`ResourceActor::run`] is spawned with a
/// [`DirectoryNotifier`].
pub fn new(buffer_size: usize) -> (ResourceActor<CustomerRecord>, CustomerClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    let client = CustomerClient::new(generic_client);

    (actor, client)
}
