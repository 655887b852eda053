//! Hydration and the persistence entry point.
//!
//! [`persist`] wires one store to one durable key in three steps, in this
//! order:
//!
//! 1. Read the store's durable key and, if a snapshot is there, replay its
//!    records into the store as plain creates.
//! 2. Start the write-back scheduler.
//! 3. Subscribe the scheduler to the store's mutation events.
//!
//! Subscribing only after replay is what keeps hydration from writing:
//! replayed creates have no listener yet, so the first durable write can
//! only come from a real post-startup mutation.

use crate::codec;
use crate::error::{PersistError, PersistResult};
use crate::kv::KeyValueStore;
use crate::scheduler::{DEFAULT_DEBOUNCE_WINDOW, FlushResult, WriteBackScheduler};
use crate::snapshot::Snapshot;
use larder_model::{MutationEvent, StoreId};
use larder_store::{RecordStore, SubscriptionHandle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default namespace prefix for durable keys.
pub const DEFAULT_KEY_PREFIX: &str = "larder";

/// Configuration for [`persist`].
#[derive(Debug, Clone)]
pub struct PersistConfig {
    /// Namespace prefix of the durable key. Two deployments sharing one
    /// key-value store stay out of each other's way by using different
    /// prefixes.
    pub key_prefix: String,
    /// How long the store must stay quiet before a write-back.
    pub debounce_window: Duration,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
        }
    }
}

impl PersistConfig {
    /// The durable key for a store: `<key_prefix>/<store id>`.
    #[must_use]
    pub fn durable_key(&self, store_id: &StoreId) -> String {
        format!("{}/{}", self.key_prefix, store_id)
    }
}

/// Hydrates `store` from `kv`, then keeps it persisted.
///
/// Returns once hydration is complete and the write-back worker is
/// subscribed; from that point every mutation schedules a snapshot write.
/// The store should be freshly constructed: replayed records are ordinary
/// creates and collide with any pre-existing keys.
///
/// Call this once per store lifetime. Calling it twice for the same store
/// registers two write-back subscriptions.
///
/// # Errors
///
/// Fails when the durable read fails, when an existing snapshot is
/// malformed, or when the store rejects a replayed record. On error the
/// store may be partially hydrated, and no subscription is registered.
pub async fn persist(
    store: Arc<dyn RecordStore>,
    kv: Arc<dyn KeyValueStore>,
    config: PersistConfig,
) -> PersistResult<PersistHandle> {
    let durable_key = config.durable_key(store.store_id());
    hydrate(&store, &kv, &durable_key).await?;

    let scheduler = WriteBackScheduler::start(
        Arc::clone(&store),
        Arc::clone(&kv),
        durable_key,
        config.debounce_window,
    );
    let notifier = scheduler.clone();
    let subscription = store.subscribe(Arc::new(move |_: &MutationEvent| notifier.notify()));

    Ok(PersistHandle {
        scheduler,
        subscription,
    })
}

/// Reads the durable key and replays a found snapshot into the store.
async fn hydrate(
    store: &Arc<dyn RecordStore>,
    kv: &Arc<dyn KeyValueStore>,
    durable_key: &str,
) -> PersistResult<()> {
    let document = {
        let kv = Arc::clone(kv);
        let key = durable_key.to_owned();
        tokio::task::spawn_blocking(move || kv.get_string(&key))
            .await
            .map_err(PersistError::backend)?
            .map_err(PersistError::Backend)?
    };

    let Some(text) = document else {
        debug!("No snapshot under {}; starting empty", durable_key);
        return Ok(());
    };

    let snapshot = Snapshot::from_json(&text)?;
    let hydrating = Arc::clone(store);
    let replayed = tokio::task::spawn_blocking(move || replay(hydrating.as_ref(), snapshot))
        .await
        .map_err(PersistError::backend)??;
    info!("Hydrated store from {}: {} records", durable_key, replayed);
    Ok(())
}

/// Replays snapshot records into the store, table by table, preserving
/// snapshot order. Stops at the first record the store rejects.
fn replay(store: &dyn RecordStore, snapshot: Snapshot) -> PersistResult<usize> {
    let mut replayed = 0;
    for (table, records) in snapshot {
        for serialized in records {
            let record = codec::decode(serialized)?;
            store.create(&table, record)?;
            replayed += 1;
        }
    }
    Ok(replayed)
}

/// Handle to a persisted store.
///
/// Dropping the handle detaches it without stopping persistence: the
/// store's own subscription keeps the worker alive. Stopping is always
/// explicit via [`shutdown`](PersistHandle::shutdown).
#[derive(Debug)]
pub struct PersistHandle {
    scheduler: WriteBackScheduler,
    subscription: SubscriptionHandle,
}

impl PersistHandle {
    /// Writes the current store state immediately, skipping any pending
    /// debounce window.
    pub async fn flush_now(&self) -> FlushResult {
        self.scheduler.flush_now().await
    }

    /// The error from the most recent snapshot write, or `None` if it
    /// succeeded. Failed writes are not retried until the next mutation
    /// schedules a new one.
    #[must_use]
    pub fn last_flush_error(&self) -> Option<Arc<PersistError>> {
        self.scheduler.last_flush_error()
    }

    /// Unsubscribes from the store, settles any pending write, and stops
    /// the worker. Mutations made after this stay in memory only.
    pub async fn shutdown(self) -> FlushResult {
        self.subscription.revoke();
        self.scheduler.shutdown().await
    }
}
