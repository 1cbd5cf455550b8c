//! A composition runtime for tick-driven 2D simulations
//!
//! Tickwork provides the object layer of a tile-based game or simulation:
//! entities assembled from pluggable features, a handler that drives their
//! per-tick update and render passes, and a small set of ready-made features
//! for the common mechanics of the genre:
//! * `TransformableModel` for position and movement tracking
//! * `TileCollidableModel` and the map collision engine for resolving
//!   movement against tile groups
//! * `ProducerModel`/`ProducibleModel` for queued production
//! * `ExtractorModel`/`ExtractableModel` for resource gathering cycles
//!
//! An entity is only an identity plus whatever features are attached to it;
//! all game-specific behavior lives in features. Features find their
//! siblings through the owning [`Entity`](entity::Entity) and shared
//! state through the explicit [`Services`](services::Services) locator, so
//! there are no global singletons. Everything is single-threaded and
//! deterministic: one `Handler::update` call advances the whole population
//! by exactly one tick.

pub mod collision;
pub mod config;
pub mod entity;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod listener;
pub mod log;
pub mod prelude;
pub mod producer;
pub mod services;
pub mod transformable;

pub use crate::error::TickworkError;
pub use crate::log::{debug, error, info, trace, warn};
