//! # Octree Engine
//!
//! Spatial partitioning and collision detection for large sets of moving
//! axis-aligned bounding volumes.
//!
//! ## Features
//!
//! - **Octree**: arena-backed recursive subdivision with a depth, size and
//!   per-node occupancy rebuild policy
//! - **Collision Strategies**: brute-force pairwise, forward-cutoff scan and
//!   octree-pruned subject queries behind one interface
//! - **Collision Categories**: bitflag filtering of hazards vs collectibles
//! - **Debug Drawing**: optional wireframe sink for octant outlines
//!
//! ## Quick Start
//!
//! ```rust
//! use octree_engine::prelude::*;
//!
//! let mut entities = EntityManager::new();
//! let player = entities.add_entity(
//!     "Player",
//!     CollisionShape::cube(Vec3::zeros(), 0.5),
//!     CollisionCategory::PLAYER,
//! );
//! entities.add_entity(
//!     "Cow0",
//!     CollisionShape::cube(Vec3::new(0.0, 0.0, -0.5), 0.5),
//!     CollisionCategory::OBSTACLE,
//! );
//!
//! let mut detector = CollisionDetector::new(CollisionConfig::default(), OctreeConfig::default())?;
//! assert!(detector.step(&entities, player));
//! # Ok::<(), octree_engine::spatial::OctreeError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod debug;
pub mod ecs;
pub mod foundation;
pub mod physics;
pub mod spatial;

#[cfg(test)]
mod tests;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        debug::{DebugDrawSystem, DebugShape, DebugSink, NullSink},
        ecs::{Collidable, Entity, EntityManager, EntityStore, TrackedEntity},
        foundation::math::{Vec3, Vec4},
        physics::{
            BoundingSphere, BoundingVolume, CollisionCategory, CollisionConfig,
            CollisionDetector, CollisionShape, CollisionStrategy,
        },
        spatial::{Octant, OctantId, Octree, OctreeConfig, OctreeError},
    };
}
