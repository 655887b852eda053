//! Debounced write-back scheduling.
//!
//! The scheduler coalesces bursts of mutations into one durable write. A
//! mutation nudges the scheduler via [`WriteBackScheduler::notify`]; the
//! write happens only once the store has been quiet for a full debounce
//! window. Every notification pushes the pending write out again, so the
//! snapshot that lands is always taken after the burst has settled.
//!
//! All actual work happens on a single worker task. Commands reach it
//! through an unbounded channel, which keeps `notify` non-blocking and
//! safe to call from a mutation-event handler.

use crate::error::{PersistError, PersistResult};
use crate::kv::KeyValueStore;
use crate::snapshot::Snapshot;
use larder_store::RecordStore;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

/// How long a store must stay quiet before its state is written back.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(10);

/// Result of one flush.
///
/// The error is shared: the same [`PersistError`] handed to the caller is
/// retained by the scheduler and readable via
/// [`WriteBackScheduler::last_flush_error`] until a later flush succeeds.
pub type FlushResult = Result<(), Arc<PersistError>>;

enum Command {
    Notify,
    Flush(oneshot::Sender<FlushResult>),
    Shutdown(oneshot::Sender<FlushResult>),
}

/// Handle to the write-back worker for one store.
///
/// Cheap to clone; all clones drive the same worker. The worker keeps
/// running until [`shutdown`](WriteBackScheduler::shutdown) is called or
/// every clone (including the store subscription holding one) is gone.
#[derive(Clone, Debug)]
pub struct WriteBackScheduler {
    commands: mpsc::UnboundedSender<Command>,
    last_error: Arc<Mutex<Option<Arc<PersistError>>>>,
}

impl WriteBackScheduler {
    /// Spawns the write-back worker for `store`, writing snapshots to
    /// `durable_key` in `kv`.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn start(
        store: Arc<dyn RecordStore>,
        kv: Arc<dyn KeyValueStore>,
        durable_key: String,
        window: Duration,
    ) -> Self {
        let (commands, inbox) = mpsc::unbounded_channel();
        let last_error = Arc::new(Mutex::new(None));
        let worker = Worker {
            store,
            kv,
            durable_key,
            window,
            inbox,
            last_error: Arc::clone(&last_error),
        };
        tokio::spawn(worker.run());
        Self {
            commands,
            last_error,
        }
    }

    /// Signals that the store changed.
    ///
    /// Starts the debounce window, or pushes it out if one is already
    /// running. Returns immediately and never blocks; after shutdown it is
    /// a no-op.
    pub fn notify(&self) {
        let _ = self.commands.send(Command::Notify);
    }

    /// Flushes the current store state right now, skipping any pending
    /// debounce window.
    pub async fn flush_now(&self) -> FlushResult {
        self.command_and_wait(Command::Flush).await
    }

    /// Stops the worker. A still-pending window is flushed first; the
    /// result of that final flush is returned.
    ///
    /// Notifications sent after shutdown are dropped.
    pub async fn shutdown(&self) -> FlushResult {
        self.command_and_wait(Command::Shutdown).await
    }

    /// The error from the most recent flush, or `None` if it succeeded
    /// (or no flush has happened yet).
    #[must_use]
    pub fn last_flush_error(&self) -> Option<Arc<PersistError>> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn command_and_wait(
        &self,
        make: impl FnOnce(oneshot::Sender<FlushResult>) -> Command,
    ) -> FlushResult {
        let (ack, done) = oneshot::channel();
        self.commands
            .send(make(ack))
            .map_err(|_| Arc::new(PersistError::SchedulerStopped))?;
        done.await
            .map_err(|_| Arc::new(PersistError::SchedulerStopped))?
    }
}

struct Worker {
    store: Arc<dyn RecordStore>,
    kv: Arc<dyn KeyValueStore>,
    durable_key: String,
    window: Duration,
    inbox: mpsc::UnboundedReceiver<Command>,
    last_error: Arc<Mutex<Option<Arc<PersistError>>>>,
}

impl Worker {
    async fn run(mut self) {
        // Trailing-edge debounce: `deadline` is set while a write is
        // pending and moves forward on every notification.
        let mut deadline: Option<Instant> = None;
        loop {
            let command = if let Some(at) = deadline {
                tokio::select! {
                    command = self.inbox.recv() => command,
                    () = sleep_until(at) => {
                        deadline = None;
                        let _ = self.flush();
                        continue;
                    }
                }
            } else {
                self.inbox.recv().await
            };

            match command {
                Some(Command::Notify) => {
                    deadline = Some(Instant::now() + self.window);
                }
                Some(Command::Flush(ack)) => {
                    deadline = None;
                    let _ = ack.send(self.flush());
                }
                Some(Command::Shutdown(ack)) => {
                    let result = if deadline.take().is_some() {
                        self.flush()
                    } else {
                        Ok(())
                    };
                    let _ = ack.send(result);
                    return;
                }
                // Every handle is gone. Settle a pending window, then stop.
                None => {
                    if deadline.take().is_some() {
                        let _ = self.flush();
                    }
                    return;
                }
            }
        }
    }

    /// Captures the store, writes the snapshot, and records the outcome in
    /// the shared error slot.
    fn flush(&self) -> FlushResult {
        match self.write_snapshot() {
            Ok(bytes) => {
                self.record_outcome(None);
                debug!(
                    "Persisted snapshot to {} ({} bytes)",
                    self.durable_key, bytes
                );
                Ok(())
            }
            Err(err) => {
                warn!("Snapshot write to {} failed: {}", self.durable_key, err);
                let shared = Arc::new(err);
                self.record_outcome(Some(Arc::clone(&shared)));
                Err(shared)
            }
        }
    }

    fn write_snapshot(&self) -> PersistResult<usize> {
        let snapshot = Snapshot::capture(self.store.as_ref());
        let text = snapshot.to_json()?;
        self.kv
            .set(&self.durable_key, &text)
            .map_err(PersistError::Backend)?;
        Ok(text.len())
    }

    fn record_outcome(&self, error: Option<Arc<PersistError>>) {
        *self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = error;
    }
}
