//! Shared service locator.
//!
//! [`Services`] is the explicit context object handed to every feature at
//! preparation time. It replaces ambient global state: anything a feature
//! needs beyond its own entity — the collision map, the spawner, a camera —
//! is registered here by the scene setup and looked up by type.
//!
//! The entity-id counter also lives here. All mutation happens on the single
//! simulation thread, so plain `Cell`/`RefCell` interior mutability is
//! enough by design.

use std::any::{type_name, Any, TypeId};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::entity::EntityId;
use crate::error::TickworkError;

/// Type-keyed registry of shared services, plus the entity-id allocator.
pub struct Services {
    registry: RefCell<FxHashMap<TypeId, Rc<dyn Any>>>,
    next_entity_id: Cell<u32>,
}

impl Services {
    #[must_use]
    pub fn new() -> Services {
        Services {
            registry: RefCell::new(FxHashMap::default()),
            next_entity_id: Cell::new(0),
        }
    }

    /// Registers a shared service, keyed by its concrete type. Registering a
    /// second service of the same type replaces the first.
    pub fn add<S: Any>(&self, service: Rc<S>) {
        self.registry
            .borrow_mut()
            .insert(TypeId::of::<S>(), service);
    }

    /// Returns the service of type `S`, or fails if none was registered.
    pub fn get<S: Any>(&self) -> Result<Rc<S>, TickworkError> {
        self.try_get::<S>()
            .ok_or(TickworkError::MissingService(type_name::<S>()))
    }

    /// Non-failing variant of [`Services::get`].
    #[must_use]
    pub fn try_get<S: Any>(&self) -> Option<Rc<S>> {
        let registry = self.registry.borrow();
        let service = registry.get(&TypeId::of::<S>())?;
        // The entry was stored under `TypeId::of::<S>`, so the downcast
        // cannot fail.
        Rc::downcast::<S>(service.clone()).ok()
    }

    #[must_use]
    pub fn contains<S: Any>(&self) -> bool {
        self.registry.borrow().contains_key(&TypeId::of::<S>())
    }

    /// Allocates the next entity identifier. Monotonic, never reused.
    pub(crate) fn allocate_entity_id(&self) -> EntityId {
        let raw = self.next_entity_id.get();
        self.next_entity_id.set(raw + 1);
        EntityId::new(raw)
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Camera {
        zoom: f64,
    }

    #[test]
    fn add_and_get() {
        let services = Services::new();
        services.add(Rc::new(Camera { zoom: 2.0 }));

        let camera = services.get::<Camera>().unwrap();
        assert_eq!(camera.zoom, 2.0);
    }

    #[test]
    fn get_returns_shared_instance() {
        let services = Services::new();
        services.add(Rc::new(Camera { zoom: 1.0 }));

        let first = services.get::<Camera>().unwrap();
        let second = services.get::<Camera>().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn missing_service_fails() {
        let services = Services::new();
        assert!(!services.contains::<Camera>());
        let error = services.get::<Camera>().unwrap_err();
        assert!(matches!(error, TickworkError::MissingService(_)));
    }

    #[test]
    fn entity_ids_are_monotonic() {
        let services = Services::new();
        let first = services.allocate_entity_id();
        let second = services.allocate_entity_id();
        assert_ne!(first, second);
        assert!(first < second);
    }
}
