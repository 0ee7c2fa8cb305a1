//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the `ResourceClient` and `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// # Keyed Store Operations
/// - **Get**: Fetches the current full record stored under a key.
/// - **Upsert**: Inserts the record under its own key, replacing whatever was there.
///
/// This type is generic over `T: ActorEntity`, so you can't send a customer record to an
/// actor that stores something else.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Upsert {
        entity: T,
        respond_to: Response<T>,
    },
}
