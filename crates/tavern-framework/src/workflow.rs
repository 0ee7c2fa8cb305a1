//! # Workflow Host
//!
//! A workflow is a long-lived consumer of signals that periodically replaces itself with
//! a fresh instance of the same entry point ("continue as new"). Each lifetime between
//! restarts is a *generation*.
//!
//! The host owns everything that must outlive a generation and threads it explicitly into
//! the next one through the [`WorkflowContext`]:
//!
//! - the generation number,
//! - the [`SignalReceiver`] (signals not consumed by one generation go to the next),
//! - the dead-letter sink.
//!
//! A generation is built by a factory closure and consumed by [`Workflow::run`], so no
//! field of one generation can leak into the next.
//!
//! ```text
//! WorkflowHost
//!     │
//!     ├─► factory(1).run(&mut ctx) ──► ContinueAsNew
//!     ├─► factory(2).run(&mut ctx) ──► ContinueAsNew
//!     ├─► factory(3).run(&mut ctx) ──► Completed ──► HostReport { generations: 3 }
//!     └─► (or) Err(e) ──► host ends, error surfaces from WorkflowHandle::join
//! ```

use crate::error::FrameworkError;
use crate::signal::{DeadLetter, SignalReceiver};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};

/// How a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowExit {
    /// Start a fresh generation of the same workflow.
    ContinueAsNew,
    /// The signal stream is finished; stop hosting.
    Completed,
}

/// Summary returned once a workflow completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostReport {
    /// Number of generations that ran, including the last one.
    pub generations: u64,
}

/// State threaded from one generation to the next.
pub struct WorkflowContext<S> {
    generation: u64,
    signals: SignalReceiver<S>,
    dead_letters: mpsc::UnboundedSender<DeadLetter<S>>,
}

impl<S: Send + 'static> WorkflowContext<S> {
    /// The current generation, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Waits for the next signal. See [`SignalReceiver::recv`].
    pub async fn recv(&mut self) -> Option<S> {
        self.signals.recv().await
    }

    /// Signals queued and not yet received.
    pub fn pending(&self) -> usize {
        self.signals.pending()
    }

    /// Hands a signal back to the host because it could not be acted on.
    pub fn dead_letter(&self, payload: S, reason: impl Into<String>) {
        let letter = DeadLetter {
            payload,
            reason: reason.into(),
        };
        if self.dead_letters.send(letter).is_err() {
            warn!(generation = self.generation, "Dead letter dropped, nobody is listening");
        }
    }
}

/// A long-lived signal consumer that can continue as new.
#[async_trait]
pub trait Workflow: Send + Sized + 'static {
    type Signal: Send + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs one generation to its end.
    async fn run(
        self,
        ctx: &mut WorkflowContext<Self::Signal>,
    ) -> Result<WorkflowExit, Self::Error>;
}

/// Handle to a hosted workflow.
pub struct WorkflowHandle<S, E> {
    task: JoinHandle<Result<HostReport, E>>,
    dead_letters: mpsc::UnboundedReceiver<DeadLetter<S>>,
}

impl<S, E> WorkflowHandle<S, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Dead letters handed back so far, without waiting.
    pub fn drain_dead_letters(&mut self) -> Vec<DeadLetter<S>> {
        let mut letters = Vec::new();
        while let Ok(letter) = self.dead_letters.try_recv() {
            letters.push(letter);
        }
        letters
    }

    /// Waits for the next dead letter. `None` once the host has ended and all were taken.
    pub async fn next_dead_letter(&mut self) -> Option<DeadLetter<S>> {
        self.dead_letters.recv().await
    }

    /// True once the host task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the workflow to complete.
    pub async fn join(self) -> Result<HostReport, FrameworkError> {
        match self.task.await {
            Ok(Ok(report)) => Ok(report),
            Ok(Err(e)) => Err(FrameworkError::WorkflowFailed(Box::new(e))),
            Err(e) => Err(FrameworkError::TaskFailed(e.to_string())),
        }
    }
}

/// Runs workflows generation after generation.
pub struct WorkflowHost;

impl WorkflowHost {
    /// Spawns the host task for a workflow.
    ///
    /// `factory` builds generation `n` of the workflow. It is the only way state reaches a
    /// generation, so whatever it captures is, by construction, everything that is shared
    /// across restarts.
    pub fn spawn<W, F>(
        name: &'static str,
        signals: SignalReceiver<W::Signal>,
        mut factory: F,
    ) -> WorkflowHandle<W::Signal, W::Error>
    where
        W: Workflow,
        F: FnMut(u64) -> W + Send + 'static,
    {
        let (dead_letter_tx, dead_letter_rx) = mpsc::unbounded_channel();
        let mut ctx = WorkflowContext {
            generation: 0,
            signals,
            dead_letters: dead_letter_tx,
        };

        let task = tokio::spawn(async move {
            info!(workflow = name, "Workflow started");
            loop {
                ctx.generation += 1;
                let generation = ctx.generation;
                let instance = factory(generation);
                let span = info_span!("generation", workflow = name, generation);

                match instance.run(&mut ctx).instrument(span).await {
                    Ok(WorkflowExit::ContinueAsNew) => {
                        info!(
                            workflow = name,
                            generation,
                            pending = ctx.pending(),
                            "Continuing as new"
                        );
                    }
                    Ok(WorkflowExit::Completed) => {
                        info!(workflow = name, generation, "Workflow completed");
                        return Ok(HostReport {
                            generations: generation,
                        });
                    }
                    Err(e) => {
                        error!(workflow = name, generation, error = %e, "Generation failed");
                        return Err(e);
                    }
                }
            }
        });

        WorkflowHandle {
            task,
            dead_letters: dead_letter_rx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal;
    use std::sync::{Arc, Mutex};

    /// Takes up to `batch` signals per generation, remembering which generation saw what.
    struct Batcher {
        batch: usize,
        seen: Arc<Mutex<Vec<(u64, u32)>>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("poisoned signal {0}")]
    struct Poisoned(u32);

    #[async_trait]
    impl Workflow for Batcher {
        type Signal = u32;
        type Error = Poisoned;

        async fn run(self, ctx: &mut WorkflowContext<u32>) -> Result<WorkflowExit, Poisoned> {
            let mut taken = 0;
            while taken < self.batch {
                match ctx.recv().await {
                    Some(0) => return Err(Poisoned(0)),
                    Some(n) if n % 2 == 0 => ctx.dead_letter(n, "even"),
                    Some(n) => {
                        self.seen.lock().unwrap().push((ctx.generation(), n));
                        taken += 1;
                    }
                    None => return Ok(WorkflowExit::Completed),
                }
            }
            Ok(WorkflowExit::ContinueAsNew)
        }
    }

    #[tokio::test]
    async fn test_generations_share_only_the_signal_queue() {
        let (sender, receiver) = signal::channel(16);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let factory_seen = seen.clone();
        let mut handle = WorkflowHost::spawn("batcher", receiver, move |_generation| Batcher {
            batch: 2,
            seen: factory_seen.clone(),
        });

        for n in [1, 3, 4, 5, 7, 9] {
            sender.signal(n).await.unwrap();
        }
        drop(sender);

        let letter = handle.next_dead_letter().await.unwrap();
        assert_eq!(letter.payload, 4);
        assert_eq!(letter.reason, "even");

        let report = handle.join().await.unwrap();
        assert_eq!(report.generations, 3);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(1, 1), (1, 3), (2, 5), (2, 7), (3, 9)]
        );
    }

    #[tokio::test]
    async fn test_generation_error_ends_the_host() {
        let (sender, receiver) = signal::channel(4);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handle = WorkflowHost::spawn("batcher", receiver, move |_| Batcher {
            batch: 10,
            seen: seen.clone(),
        });

        sender.signal(0).await.unwrap();

        let result = handle.join().await;
        assert!(matches!(result, Err(FrameworkError::WorkflowFailed(_))));
    }
}
