use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::entity::Entity;
use crate::error::TickworkError;
use crate::services::Services;

/// A shared handle to an attached feature. Repeated lookups of the same
/// capability return clones of the same handle.
pub type FeatureRef<F> = Rc<RefCell<F>>;

/// A pluggable capability implementation attached to an entity.
///
/// A feature must not be used before [`Feature::prepare`] completes: it is
/// called at attach time with a back-reference to the owning entity and the
/// shared [`Services`] locator, and is where a feature resolves the sibling
/// features and services it depends on.
///
/// `update` and `render` default to no-ops; data-only features (a resource
/// node, a production request) simply never override them.
pub trait Feature: Any {
    /// Called once, at attach time. Fails fast when a required sibling
    /// feature or service is missing.
    fn prepare(&mut self, _owner: &Rc<Entity>, _services: &Services) -> Result<(), TickworkError> {
        Ok(())
    }

    /// Per-tick update, driven by the `Handler`'s update pass.
    fn update(&mut self, _dt: f64) {}

    /// Render pass hook. The target is opaque to the core; the frame driver
    /// supplies whatever drawing backend it uses and renderable features
    /// downcast it.
    fn render(&mut self, _target: &mut dyn Any) {}
}

/// Per-entity capability registry: at most one feature per concrete type,
/// write-once for the entity's lifetime (no removal).
///
/// Each feature is stored twice: under its `TypeId` for the typed accessor,
/// and in an insertion-ordered list of `dyn Feature` handles for broadcast
/// operations (the update/render passes).
pub(crate) struct FeatureSet {
    by_type: FxHashMap<TypeId, Box<dyn Any>>,
    ordered: Vec<FeatureRef<dyn Feature>>,
}

impl FeatureSet {
    pub(crate) fn new() -> FeatureSet {
        FeatureSet {
            by_type: FxHashMap::default(),
            ordered: Vec::new(),
        }
    }

    pub(crate) fn add<F: Feature>(&mut self, feature: FeatureRef<F>) -> Result<(), TickworkError> {
        let type_id = TypeId::of::<F>();
        if self.by_type.contains_key(&type_id) {
            return Err(TickworkError::DuplicateFeature(type_name::<F>()));
        }
        self.ordered.push(feature.clone());
        self.by_type.insert(type_id, Box::new(feature));
        Ok(())
    }

    pub(crate) fn get<F: Feature>(&self) -> Option<FeatureRef<F>> {
        self.by_type
            .get(&TypeId::of::<F>())
            .and_then(|boxed| boxed.downcast_ref::<FeatureRef<F>>())
            .cloned()
    }

    pub(crate) fn has<F: Feature>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<F>())
    }

    /// Snapshot of all attached features, in attach order. Cloning the
    /// handles keeps the registry borrow short, so a feature ticked from the
    /// snapshot can itself query the registry.
    pub(crate) fn all(&self) -> Vec<FeatureRef<dyn Feature>> {
        self.ordered.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Releases every feature handle. Called once, on destruction.
    pub(crate) fn clear(&mut self) {
        self.by_type.clear();
        self.ordered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health {
        points: u32,
    }
    impl Feature for Health {}

    struct Armor;
    impl Feature for Armor {}

    fn attach<F: Feature>(set: &mut FeatureSet, feature: F) -> FeatureRef<F> {
        let feature = Rc::new(RefCell::new(feature));
        set.add(feature.clone()).unwrap();
        feature
    }

    #[test]
    fn get_returns_the_attached_instance() {
        let mut set = FeatureSet::new();
        let attached = attach(&mut set, Health { points: 10 });

        let looked_up = set.get::<Health>().unwrap();
        assert!(Rc::ptr_eq(&attached, &looked_up));
        assert_eq!(looked_up.borrow().points, 10);
    }

    #[test]
    fn has_is_a_non_failing_probe() {
        let mut set = FeatureSet::new();
        attach(&mut set, Health { points: 1 });

        assert!(set.has::<Health>());
        assert!(!set.has::<Armor>());
        assert!(set.get::<Armor>().is_none());
    }

    #[test]
    fn duplicate_capability_is_rejected() {
        let mut set = FeatureSet::new();
        attach(&mut set, Health { points: 1 });

        let error = set
            .add(Rc::new(RefCell::new(Health { points: 2 })))
            .unwrap_err();
        assert!(matches!(error, TickworkError::DuplicateFeature(_)));
        // The original instance is untouched.
        assert_eq!(set.get::<Health>().unwrap().borrow().points, 1);
    }

    #[test]
    fn all_preserves_attach_order_and_is_restartable() {
        let mut set = FeatureSet::new();
        attach(&mut set, Health { points: 1 });
        attach(&mut set, Armor);

        assert_eq!(set.all().len(), 2);
        assert_eq!(set.all().len(), 2);
        assert_eq!(set.len(), 2);
    }
}
