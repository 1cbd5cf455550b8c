pub use crate::collision::{
    Axis, CollisionCategory, CollisionConstraint, MapCollision, Orientation, TileCollidableModel,
    TileCollidedEvent, TileGrid,
};
pub use crate::config::{ExtractorConfig, ProducerConfig, ProducibleConfig};
pub use crate::entity::{Entity, EntityId, Feature, FeatureRef};
pub use crate::error::TickworkError;
pub use crate::extractor::{
    ExtractableModel, ExtractorChecker, ExtractorEvent, ExtractorModel, ResourceLocation,
};
pub use crate::handler::{Handler, Spawner};
pub use crate::listener::ListenerId;
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::producer::{
    ProducerChecker, ProducerEvent, ProducerModel, ProducibleEvent, ProducibleModel, ProducibleRef,
};
pub use crate::services::Services;
pub use crate::transformable::TransformableModel;
