//! The per-frame population manager.
//!
//! The [`Handler`] owns the live set of entities and drives the per-tick
//! update and render passes over registered component processors. Population
//! mutation is staged: additions go through the shared [`Spawner`] service
//! and become visible at the top of the next update; removals (explicit or
//! via [`Entity::destroy`]) are applied at the end of the update that
//! observed them. An in-progress pass is therefore never invalidated by a
//! structural change.
//!
//! Per entity the state machine is
//! `PENDING_ADD → ACTIVE → PENDING_REMOVE → REMOVED`: staged in the spawner,
//! member of the population, destroy-flagged, then notified and dropped.
//!
//! A failure thrown by one entity's feature during a pass is not swallowed:
//! it propagates (as a panic) and aborts the remainder of the pass. The
//! surrounding frame driver decides whether to continue.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::entity::{Entity, EntityId};
use crate::log::{debug, trace};
use crate::services::Services;

/// The live entity set, iterated in insertion order.
pub type Population = IndexMap<EntityId, Rc<Entity>>;

/// Staging service for additions. Registered in [`Services`] by
/// [`Handler::new`] so features can request a spawn mid-tick without holding
/// a mutable alias of the population.
#[derive(Default)]
pub struct Spawner {
    pending: RefCell<Vec<Rc<Entity>>>,
}

impl Spawner {
    /// Stages an entity for inclusion at the top of the next update cycle.
    pub fn spawn(&self, entity: Rc<Entity>) {
        trace!("staged entity {:?} for addition", entity.id());
        self.pending.borrow_mut().push(entity);
    }

    fn drain(&self) -> Vec<Rc<Entity>> {
        self.pending.borrow_mut().drain(..).collect()
    }
}

/// A processor run over the whole population during the update pass.
/// Components run in registration order; within a component, entities are
/// visited in population order.
pub trait UpdateComponent {
    fn update(&mut self, dt: f64, population: &Population);
}

/// A processor run over the whole population during the render pass. Render
/// never mutates population state.
pub trait RenderComponent {
    fn render(&mut self, target: &mut dyn Any, population: &Population);
}

/// Default update component: ticks every attached feature of every entity.
pub struct ComponentUpdater;

impl UpdateComponent for ComponentUpdater {
    fn update(&mut self, dt: f64, population: &Population) {
        for entity in population.values() {
            for feature in entity.features() {
                feature.borrow_mut().update(dt);
            }
        }
    }
}

/// Default render component: walks every attached feature of every entity.
pub struct ComponentRenderer;

impl RenderComponent for ComponentRenderer {
    fn render(&mut self, target: &mut dyn Any, population: &Population) {
        for entity in population.values() {
            for feature in entity.features() {
                feature.borrow_mut().render(target);
            }
        }
    }
}

/// The population manager driving update/render passes.
pub struct Handler {
    spawner: Rc<Spawner>,
    population: Population,
    staged_removals: Vec<EntityId>,
    updaters: Vec<Box<dyn UpdateComponent>>,
    renderers: Vec<Box<dyn RenderComponent>>,
}

impl Handler {
    /// Creates a handler and registers its [`Spawner`] in `services`.
    #[must_use]
    pub fn new(services: &Services) -> Handler {
        let spawner = Rc::new(Spawner::default());
        services.add(spawner.clone());
        Handler {
            spawner,
            population: Population::default(),
            staged_removals: Vec::new(),
            updaters: Vec::new(),
            renderers: Vec::new(),
        }
    }

    /// Stages an entity for inclusion at the next update cycle, never
    /// immediately.
    pub fn add(&mut self, entity: Rc<Entity>) {
        self.spawner.spawn(entity);
    }

    /// Stages an explicit removal, applied at the end of the next update.
    /// The entity is destroyed before removal completes.
    pub fn remove(&mut self, id: EntityId) {
        self.staged_removals.push(id);
    }

    /// Registers an update component. Updaters run in registration order.
    pub fn add_updater(&mut self, component: impl UpdateComponent + 'static) {
        self.updaters.push(Box::new(component));
    }

    /// Registers a render component. Renderers run in registration order.
    pub fn add_renderer(&mut self, component: impl RenderComponent + 'static) {
        self.renderers.push(Box::new(component));
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Rc<Entity>> {
        self.population.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.population.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.population.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Runs one update cycle: flush staged additions, run every registered
    /// updater over the active set, then flush staged removals (notifying
    /// each removed entity's destruction listeners).
    ///
    /// # Panics
    ///
    /// Panics if a staged entity carries an id already present in the
    /// population. Ids are unique by construction; a collision means the
    /// same entity was staged twice.
    pub fn update(&mut self, dt: f64) {
        for entity in self.spawner.drain() {
            debug!("entity {:?} joins the population", entity.id());
            let previous = self.population.insert(entity.id(), entity);
            assert!(
                previous.is_none(),
                "entity staged twice: ids in the population must be unique"
            );
        }

        for updater in &mut self.updaters {
            updater.update(dt, &self.population);
        }

        self.flush_removals();
    }

    /// Runs one render cycle over the active set. Never mutates population
    /// state: an entity destroy-flagged mid-tick still renders until the
    /// next update finalizes its removal.
    pub fn render(&mut self, target: &mut dyn Any) {
        for renderer in &mut self.renderers {
            renderer.render(target, &self.population);
        }
    }

    fn flush_removals(&mut self) {
        for id in std::mem::take(&mut self.staged_removals) {
            if let Some(entity) = self.population.shift_remove(&id) {
                debug!("entity {id:?} removed from the population");
                entity.destroy();
                entity.notify_destroyed();
            }
        }

        let flagged: Vec<EntityId> = self
            .population
            .values()
            .filter(|entity| entity.is_pending_removal())
            .map(|entity| entity.id())
            .collect();
        for id in flagged {
            if let Some(entity) = self.population.shift_remove(&id) {
                debug!("entity {id:?} destroyed and removed from the population");
                entity.notify_destroyed();
            }
        }
    }
}
