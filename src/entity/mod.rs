/*!

An entity is the composition root of the runtime: a unique identity plus a
registry of features. A feature is a pluggable capability implementation
(movement, tile collision, production, extraction, ...) attached to exactly
one entity; an entity holds at most one feature instance per capability type.

Features are looked up by their concrete type through a compile-time-typed
accessor:

```rust,ignore
let transformable = entity.feature::<TransformableModel>()?;
transformable.borrow_mut().teleport(80.0, 32.0);
```

Lifecycle is two-phase: `destroy()` only flags the entity for removal, so a
destroy requested mid-tick never mutates the live population while other
features are iterating it. The `Handler` finalizes removal at its flush
point and calls `notify_destroyed()`, which fires destruction listeners and
releases the feature registry.

*/

mod entity;
mod feature;
mod identity;

pub use entity::Entity;
pub use feature::{Feature, FeatureRef};
pub use identity::EntityId;
