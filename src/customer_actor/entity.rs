//! [`ActorEntity`] implementation for [`CustomerRecord`], and the notifier injected into it.

use super::CustomerError;
use crate::model::{CustomerRecord, DirectoryUpdate};
use async_trait::async_trait;
use tavern_framework::ActorEntity;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Fans out a [`DirectoryUpdate`] after each write.
///
/// Best effort: a write with nobody subscribed, or with a subscriber that lags behind,
/// still succeeds.
#[derive(Debug, Clone)]
pub struct DirectoryNotifier {
    sender: broadcast::Sender<DirectoryUpdate>,
}

impl DirectoryNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DirectoryUpdate> {
        self.sender.subscribe()
    }

    pub fn publish(&self, update: DirectoryUpdate) {
        if self.sender.send(update).is_err() {
            debug!("No directory subscribers");
        }
    }
}

#[async_trait]
impl ActorEntity for CustomerRecord {
    type Id = String;
    type Context = DirectoryNotifier;
    type Error = CustomerError;

    fn id(&self) -> String {
        self.name.clone()
    }

    /// Records are accepted as given; the hook only announces the write.
    async fn on_upsert(
        &mut self,
        previous: Option<&Self>,
        notifier: &DirectoryNotifier,
    ) -> Result<(), CustomerError> {
        let previous_visits = previous.map(|p| p.times_visited);
        info!(
            customer = %self.name,
            times_visited = self.times_visited,
            ?previous_visits,
            "Customer updated"
        );
        notifier.publish(DirectoryUpdate {
            name: self.name.clone(),
            times_visited: self.times_visited,
            previous_visits,
        });
        Ok(())
    }
}
