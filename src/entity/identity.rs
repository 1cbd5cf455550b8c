use std::cell::{Cell, RefCell};

use crate::listener::{ListenerId, Listeners};

/// Opaque unique entity handle, assigned at construction from the
/// [`Services`](crate::services::Services) counter. Immutable, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    pub(crate) fn new(raw: u32) -> EntityId {
        EntityId(raw)
    }

    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Two-phase destruction state.
///
/// `destroy()` flags the entity for removal; actual listener notification is
/// deferred to `notify_destroyed()`, invoked by the `Handler` once removal is
/// finalized at its flush point.
pub(crate) struct Lifecycle {
    id: EntityId,
    pending_removal: Cell<bool>,
    destroyed: Cell<bool>,
    listeners: RefCell<Listeners<EntityId>>,
}

impl Lifecycle {
    pub(crate) fn new(id: EntityId) -> Lifecycle {
        Lifecycle {
            id,
            pending_removal: Cell::new(false),
            destroyed: Cell::new(false),
            listeners: RefCell::new(Listeners::new()),
        }
    }

    pub(crate) fn id(&self) -> EntityId {
        self.id
    }

    /// Idempotent: flagging twice is a no-op.
    pub(crate) fn destroy(&self) {
        self.pending_removal.set(true);
    }

    pub(crate) fn is_pending_removal(&self) -> bool {
        self.pending_removal.get()
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Fires destruction listeners. Notifies at most once, even if removal
    /// is finalized twice.
    pub(crate) fn notify_destroyed(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.pending_removal.set(true);
        self.listeners.borrow_mut().notify(&self.id);
    }

    pub(crate) fn add_listener(&self, listener: impl FnMut(&EntityId) + 'static) -> ListenerId {
        self.listeners.borrow_mut().add(listener)
    }

    pub(crate) fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(id)
    }
}
