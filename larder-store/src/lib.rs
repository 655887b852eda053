//! In-memory, table-oriented record store for Larder.
//!
//! The store holds records grouped by table, preserves declaration order
//! for tables and insertion order for records, and emits a mutation event
//! for every create, update, and delete. The persistence layer in
//! `larder-persist` consumes the narrow [`RecordStore`] trait; application
//! code uses [`MemoryStore`] directly for the full mutation API.

mod error;
mod memory;
mod store;
mod subscription;
mod table;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::RecordStore;
pub use subscription::{EventHandler, SubscriptionHandle, SubscriptionId, Subscriptions};
pub use table::TableDef;
