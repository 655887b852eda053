//! Mutation-event subscription registry.
//!
//! Handlers run synchronously on the mutating thread, in mutation order,
//! after the mutation has been applied and its lock released. Handlers
//! that need to do real work should hand off to a channel or task.

use larder_model::MutationEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// A mutation-event callback.
///
/// Handlers must not block: they run inline with the mutation.
pub type EventHandler = Arc<dyn Fn(&MutationEvent) + Send + Sync>;

/// Identifier for one registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The set of handlers registered on one store.
pub struct Subscriptions {
    handlers: Mutex<Vec<(SubscriptionId, EventHandler)>>,
    next_id: AtomicU64,
}

impl Subscriptions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers a handler and returns a handle that can revoke it.
    ///
    /// The registry is passed by `Arc` so the handle can outlive the store
    /// without keeping it alive.
    #[must_use]
    pub fn add(registry: &Arc<Self>, handler: EventHandler) -> SubscriptionHandle {
        let id = SubscriptionId(registry.next_id.fetch_add(1, Ordering::Relaxed));
        registry.lock_handlers().push((id, handler));
        SubscriptionHandle {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    /// Invokes every registered handler with the event, in registration
    /// order.
    ///
    /// The handler list is snapshotted first, so a handler that subscribes
    /// or revokes re-entrantly does not deadlock; such changes take effect
    /// from the next event on.
    pub fn dispatch(&self, event: &MutationEvent) {
        let snapshot: Vec<EventHandler> = self
            .lock_handlers()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in snapshot {
            handler(event);
        }
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_handlers().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: SubscriptionId) {
        self.lock_handlers().retain(|(handler_id, _)| *handler_id != id);
    }

    fn lock_handlers(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, EventHandler)>> {
        // A poisoned registry is still structurally sound; keep dispatching.
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Subscriptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to one registered handler.
///
/// Dropping the handle does *not* revoke the subscription; revocation is
/// always explicit via [`SubscriptionHandle::revoke`]. This lets callers
/// register fire-and-forget handlers without holding the handle.
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    id: SubscriptionId,
    registry: Weak<Subscriptions>,
}

impl SubscriptionHandle {
    /// Removes the handler from the registry. Idempotent; a no-op when the
    /// store is already gone.
    pub fn revoke(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }

    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}
