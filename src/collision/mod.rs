/*!

Tile/map collision.

Collision response is declarative: a [`CollisionCategory`] names the tile
groups an entity reacts to on one axis, and [`CollisionConstraint`]s
suppress the response next to specific adjacent groups (which prevents
false positives at diagonal tile-group boundaries). Categories are loaded
from configuration and immutable afterwards.

The tile storage itself is external: the engine only sees the [`TileGrid`]
provider trait. [`MapCollision`] computes collisions against it, and the
[`TileCollidableModel`] feature applies the resolved corrections to its
owner's `TransformableModel` every tick.

*/

mod category;
mod engine;
mod tile_collidable;

pub use category::{Axis, CollisionCategory, CollisionConstraint, Orientation};
pub use engine::{CollisionResult, Footprint, MapCollision, Tile, TileGrid};
pub use tile_collidable::{TileCollidableModel, TileCollidedEvent};
