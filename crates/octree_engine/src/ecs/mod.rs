//! Entity storage consumed by the spatial and collision modules
//!
//! The engine never owns gameplay objects. It reads them through the
//! [`EntityStore`] trait and refers to them by [`Entity`] handles.

pub mod entity;
pub mod entity_manager;

pub use entity::Entity;
pub use entity_manager::{Collidable, EntityManager, EntityStore, TrackedEntity};
