use std::rc::Rc;

use crate::collision::{Axis, CollisionCategory, MapCollision, Tile};
use crate::entity::{Entity, Feature, FeatureRef};
use crate::error::TickworkError;
use crate::listener::{ListenerId, Listeners};
use crate::services::Services;
use crate::transformable::TransformableModel;

/// Fired after a collision has been resolved and the owner teleported.
#[derive(Debug, Clone)]
pub struct TileCollidedEvent {
    pub tile: Tile,
    pub axis: Axis,
}

/// Per-entity tile collision feature.
///
/// Each tick it evaluates its categories in declaration order against the
/// owner's movement since the previous tick. Every hit teleports the owner
/// to the resolved coordinate (so later categories see the corrected
/// position) and notifies the listeners. Requires a sibling
/// [`TransformableModel`] and a [`MapCollision`] service.
#[derive(Debug)]
pub struct TileCollidableModel {
    categories: Vec<CollisionCategory>,
    transformable: Option<FeatureRef<TransformableModel>>,
    map: Option<Rc<MapCollision>>,
    listeners: Listeners<TileCollidedEvent>,
    enabled: bool,
}

impl TileCollidableModel {
    #[must_use]
    pub fn new(categories: Vec<CollisionCategory>) -> TileCollidableModel {
        TileCollidableModel {
            categories,
            transformable: None,
            map: None,
            listeners: Listeners::new(),
            enabled: true,
        }
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&TileCollidedEvent) + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Disabled collidables skip evaluation entirely, with no events.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn categories(&self) -> &[CollisionCategory] {
        &self.categories
    }
}

impl Feature for TileCollidableModel {
    fn prepare(&mut self, owner: &Rc<Entity>, services: &Services) -> Result<(), TickworkError> {
        self.transformable = Some(owner.feature::<TransformableModel>()?);
        self.map = Some(services.get::<MapCollision>()?);
        Ok(())
    }

    fn update(&mut self, _dt: f64) {
        if !self.enabled {
            return;
        }
        let (Some(transformable), Some(map)) = (self.transformable.clone(), self.map.clone())
        else {
            return;
        };

        let mut listeners = std::mem::take(&mut self.listeners);
        for category in &self.categories {
            let footprint = transformable.borrow().footprint();
            let Some(result) = map.compute_collision(&footprint, category) else {
                continue;
            };
            {
                let mut transformable = transformable.borrow_mut();
                if let Some(x) = result.x {
                    transformable.teleport_x(x);
                }
                if let Some(y) = result.y {
                    transformable.teleport_y(y);
                }
            }
            listeners.notify(&TileCollidedEvent {
                tile: result.tile,
                axis: category.axis(),
            });
        }
        self.listeners = listeners;
    }
}
