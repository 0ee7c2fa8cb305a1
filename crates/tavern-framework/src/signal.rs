//! # Signal Channel
//!
//! Signals are asynchronous, externally submitted payloads addressed to a long-running
//! workflow. Producers hold a cloneable [`SignalSender`]; the single consumer is the
//! [`SignalReceiver`], which is owned by the workflow host rather than by any one
//! generation of the workflow. Whatever a generation does not consume stays queued for
//! the next one.

use crate::error::FrameworkError;
use tokio::sync::mpsc;
use tracing::debug;

/// Creates a bounded signal channel.
///
/// When `buffer` signals are queued, [`SignalSender::signal`] waits for space.
pub fn channel<T: Send + 'static>(buffer: usize) -> (SignalSender<T>, SignalReceiver<T>) {
    let (sender, receiver) = mpsc::channel(buffer);
    (SignalSender { sender }, SignalReceiver { receiver })
}

/// Producer half of a signal channel. Cheap to clone.
pub struct SignalSender<T> {
    sender: mpsc::Sender<T>,
}

impl<T> Clone for SignalSender<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Send + 'static> SignalSender<T> {
    /// Enqueues a signal.
    ///
    /// `Ok(())` is the delivery acknowledgment: the signal is queued and will be handed to
    /// the workflow. It says nothing about how the workflow will process it.
    pub async fn signal(&self, payload: T) -> Result<(), FrameworkError> {
        self.sender
            .send(payload)
            .await
            .map_err(|_| FrameworkError::SignalClosed)?;
        debug!(queued = self.sender.max_capacity() - self.sender.capacity(), "Signal delivered");
        Ok(())
    }

    /// True once the receiving workflow host is gone.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Consumer half of a signal channel.
pub struct SignalReceiver<T> {
    receiver: mpsc::Receiver<T>,
}

impl<T> SignalReceiver<T> {
    /// Waits for the next signal. `None` once every sender is dropped and the queue is empty.
    ///
    /// Cancel safe: a signal is never lost if this future is dropped before completing,
    /// so it can sit in a `tokio::select!` branch.
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Number of signals queued and not yet received.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

/// A signal the workflow could not act on, handed back to the host with the reason.
#[derive(Debug, Clone)]
pub struct DeadLetter<T> {
    pub payload: T,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signals_arrive_in_order() {
        let (sender, mut receiver) = channel::<u32>(8);
        for n in 1..=3 {
            sender.signal(n).await.unwrap();
        }
        assert_eq!(receiver.pending(), 3);
        assert_eq!(receiver.recv().await, Some(1));
        assert_eq!(receiver.recv().await, Some(2));
        assert_eq!(receiver.recv().await, Some(3));
    }

    #[tokio::test]
    async fn test_queued_signals_survive_sender_drop() {
        let (sender, mut receiver) = channel::<&'static str>(8);
        sender.signal("last call").await.unwrap();
        drop(sender);

        assert_eq!(receiver.recv().await, Some("last call"));
        assert_eq!(receiver.recv().await, None);
    }

    #[tokio::test]
    async fn test_signal_fails_when_receiver_gone() {
        let (sender, receiver) = channel::<u32>(1);
        drop(receiver);

        assert!(sender.is_closed());
        assert!(matches!(
            sender.signal(7).await,
            Err(FrameworkError::SignalClosed)
        ));
    }
}
