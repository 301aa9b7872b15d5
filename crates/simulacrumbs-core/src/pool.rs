//! Bounded worker pool for model calls.
//!
//! The tick never awaits the network. [`DecisionPool::submit`] spawns the
//! request onto the runtime and hands back a [`PendingDecision`] that the
//! agent polls once per tick. A semaphore caps how many requests are in
//! flight at once; extra submissions queue on the semaphore.

use std::sync::Arc;

use simulacrumbs_runner::{CompletionSource, RunnerError};
use tokio::runtime::Handle;
use tokio::sync::{Semaphore, oneshot};
use tokio::sync::oneshot::error::TryRecvError;
use tracing::debug;

/// Runs completion requests on a fixed number of concurrent workers.
#[derive(Debug, Clone)]
pub struct DecisionPool {
    handle: Handle,
    permits: Arc<Semaphore>,
    workers: usize,
}

impl DecisionPool {
    /// Create a pool on `handle` with `workers` concurrent requests.
    ///
    /// A worker count of zero is raised to one.
    pub fn new(handle: Handle, workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            handle,
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    /// Create a pool on the runtime the caller is running in.
    ///
    /// Returns `None` outside a tokio runtime.
    pub fn from_current(workers: usize) -> Option<Self> {
        Handle::try_current()
            .ok()
            .map(|handle| Self::new(handle, workers))
    }

    /// Maximum number of requests in flight.
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Queue `prompt` on `source` and return a handle to poll.
    pub fn submit(&self, source: Arc<dyn CompletionSource>, prompt: String) -> PendingDecision {
        let (tx, rx) = oneshot::channel();
        let permits = Arc::clone(&self.permits);

        debug!(source = source.name(), prompt_len = prompt.len(), "Submitting decision request");

        self.handle.spawn(async move {
            let result = match permits.acquire_owned().await {
                Ok(_permit) => source.request(prompt).await,
                Err(_) => Err(RunnerError::WorkerLost),
            };
            // The receiver is gone if the agent was dropped; nothing to do.
            let _ = tx.send(result);
        });

        PendingDecision { rx }
    }
}

/// A completion request that may or may not have finished.
#[derive(Debug)]
pub struct PendingDecision {
    rx: oneshot::Receiver<Result<String, RunnerError>>,
}

impl PendingDecision {
    /// Take the result if the request has finished.
    ///
    /// Returns `None` while the request is still running. A worker that died
    /// without answering yields [`RunnerError::WorkerLost`].
    pub fn try_take(&mut self) -> Option<Result<String, RunnerError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(RunnerError::WorkerLost)),
        }
    }
}
