use std::cell::RefCell;
use std::rc::Rc;

use crate::entity::feature::FeatureSet;
use crate::entity::identity::Lifecycle;
use crate::entity::{EntityId, Feature, FeatureRef};
use crate::error::TickworkError;
use crate::listener::ListenerId;
use crate::services::Services;

/// The composition root: a unique identity plus a write-once feature
/// registry. Designed to be owned by a
/// [`Handler`](crate::handler::Handler); to remove it from the handler, a
/// simple call to [`Entity::destroy`] is needed.
pub struct Entity {
    lifecycle: Lifecycle,
    features: RefCell<FeatureSet>,
}

impl Entity {
    /// Creates an empty entity with a fresh identifier from `services`.
    #[must_use]
    pub fn new(services: &Services) -> Rc<Entity> {
        Rc::new(Entity {
            lifecycle: Lifecycle::new(services.allocate_entity_id()),
            features: RefCell::new(FeatureSet::new()),
        })
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.lifecycle.id()
    }

    /// Attaches a feature and prepares it with a back-reference to this
    /// entity and the shared services. Returns the shared handle to the
    /// attached instance.
    ///
    /// Fails if preparation fails, if a feature of this capability type is
    /// already attached, or if the entity has been destroyed.
    pub fn add_feature<F: Feature>(
        self: &Rc<Self>,
        services: &Services,
        mut feature: F,
    ) -> Result<FeatureRef<F>, TickworkError> {
        if self.lifecycle.is_destroyed() {
            return Err(TickworkError::EntityDestroyed(self.id()));
        }
        // Reject duplicates before preparation, so a rejected feature leaves
        // no side effects (listeners on siblings, service lookups) behind.
        if self.features.borrow().has::<F>() {
            return Err(TickworkError::DuplicateFeature(std::any::type_name::<F>()));
        }
        feature.prepare(self, services)?;

        let feature = Rc::new(RefCell::new(feature));
        self.features.borrow_mut().add(feature.clone())?;
        Ok(feature)
    }

    /// Returns the attached feature of capability type `F`.
    ///
    /// The same shared instance is returned across repeated calls. Fails
    /// with [`TickworkError::MissingFeature`] if absent, and with
    /// [`TickworkError::EntityDestroyed`] once the entity has been
    /// destroyed — a destroyed entity never silently serves stale features.
    pub fn feature<F: Feature>(&self) -> Result<FeatureRef<F>, TickworkError> {
        if self.lifecycle.is_destroyed() {
            return Err(TickworkError::EntityDestroyed(self.id()));
        }
        self.features
            .borrow()
            .get::<F>()
            .ok_or(TickworkError::MissingFeature(std::any::type_name::<F>()))
    }

    /// Non-failing existence probe.
    #[must_use]
    pub fn has_feature<F: Feature>(&self) -> bool {
        !self.lifecycle.is_destroyed() && self.features.borrow().has::<F>()
    }

    /// Snapshot of all attached features in attach order, for broadcast
    /// operations. Restartable: call again for a fresh pass.
    #[must_use]
    pub fn features(&self) -> Vec<FeatureRef<dyn Feature>> {
        self.features.borrow().all()
    }

    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.borrow().len()
    }

    /// Flags this entity for removal at the handler's next flush point.
    /// Idempotent. Listener notification is deferred to
    /// [`Entity::notify_destroyed`] so a destroy requested mid-tick never
    /// mutates the live population under iteration.
    pub fn destroy(&self) {
        self.lifecycle.destroy();
    }

    #[must_use]
    pub fn is_pending_removal(&self) -> bool {
        self.lifecycle.is_pending_removal()
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_destroyed()
    }

    /// Finalizes destruction: fires destruction listeners, then releases all
    /// feature references. Invoked by the handler once removal completes;
    /// notifies at most once.
    pub fn notify_destroyed(&self) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        self.lifecycle.notify_destroyed();
        self.features.borrow_mut().clear();
    }

    /// Registers a destruction listener, fired from
    /// [`Entity::notify_destroyed`] with this entity's id.
    pub fn add_destruction_listener(
        &self,
        listener: impl FnMut(&EntityId) + 'static,
    ) -> ListenerId {
        self.lifecycle.add_listener(listener)
    }

    pub fn remove_destruction_listener(&self, id: ListenerId) -> bool {
        self.lifecycle.remove_listener(id)
    }
}
