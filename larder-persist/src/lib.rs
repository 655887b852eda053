//! Write-back persistence for Larder stores.
//!
//! Keeps an in-memory [`RecordStore`](larder_store::RecordStore) durable
//! across restarts without putting a write on the hot path of any
//! mutation. The store stays the single source of truth; this layer
//! shadows it into one key of a durable key-value backend.
//!
//! # Lifecycle
//!
//! 1. **Hydration**: at startup, [`persist`] reads the store's durable key
//!    and replays the snapshot found there (if any) into the store as
//!    ordinary creates.
//! 2. **Write-back**: from then on, every mutation nudges the
//!    [`WriteBackScheduler`]. A burst of mutations becomes a single
//!    full-state snapshot write, taken once the store has been quiet for
//!    the debounce window (10ms by default).
//!
//! Snapshots are self-describing: each record carries its entity type and
//! primary-key field name in a reserved `__meta__` property, so hydration
//! needs nothing but the document itself.
//!
//! A crash can lose at most the mutations of the last unexpired window;
//! [`PersistHandle::shutdown`] settles the pending window for clean exits.
//!
//! # Example
//!
//! ```no_run
//! use larder_model::Record;
//! use larder_persist::{MemoryKv, PersistConfig, persist};
//! use larder_store::{MemoryStore, RecordStore, TableDef};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store: Arc<dyn RecordStore> =
//!     Arc::new(MemoryStore::new("abc", [TableDef::new("user", "id")])?);
//! let kv = Arc::new(MemoryKv::new());
//!
//! // Replays any earlier snapshot, then persists every change.
//! let handle = persist(Arc::clone(&store), kv, PersistConfig::default()).await?;
//!
//! let fields = json!({"id": 1, "name": "Ann"}).as_object().cloned().unwrap();
//! store.create("user", Record::new("user", "id", fields)?)?;
//!
//! // Written back automatically after 10ms of quiet; force it for shutdown.
//! handle.shutdown().await.map_err(|e| e.to_string())?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
mod error;
mod hydrate;
mod kv;
mod scheduler;
mod snapshot;

pub use error::{PersistError, PersistResult};
pub use hydrate::{DEFAULT_KEY_PREFIX, PersistConfig, PersistHandle, persist};
pub use kv::{FileKv, KeyValueStore, MemoryKv};
pub use scheduler::{DEFAULT_DEBOUNCE_WINDOW, FlushResult, WriteBackScheduler};
pub use snapshot::Snapshot;
