//! Ordered listener registries.
//!
//! Every notification surface in the crate (`TileCollidableModel`,
//! `ProducerModel`, `ExtractorModel`, entity destruction) hands out a
//! [`ListenerId`] on registration. Listeners are plain closures, invoked in
//! registration order, and can be removed again by id. There is no hidden
//! auto-subscription: a listener exists only because someone called
//! `add_listener`.

/// A unique identifier for a listener added to a [`Listeners<E>`] registry.
///
/// Ids are scoped to the registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// An ordered set of listeners for events of type `E`.
pub struct Listeners<E> {
    entries: Vec<(ListenerId, Box<dyn FnMut(&E)>)>,
    next_id: u64,
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<E> Listeners<E> {
    #[must_use]
    pub fn new() -> Listeners<E> {
        Listeners {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers a listener and returns its id. Listeners are notified in
    /// registration order.
    pub fn add(&mut self, listener: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Removes a previously registered listener. Returns `false` if the id
    /// is unknown (already removed, or issued by another registry).
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Notifies every registered listener, in registration order.
    pub fn notify(&mut self, event: &E) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}
