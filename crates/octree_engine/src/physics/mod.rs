//! Physics module for collision detection
//!
//! Bounding volumes, collision categories and the subject-vs-obstacle
//! strategies. There is no collision response: contact is only reported.

pub mod collision;
pub mod collision_layers;
pub mod collision_system;

pub use collision::{BoundingSphere, BoundingVolume, CollisionShape};
pub use collision_layers::CollisionCategory;
pub use collision_system::{
    brute_force, forward_cutoff, octree_pruned, subject_contacts, CollisionConfig, CollisionDetector,
    CollisionStrategy, DEFAULT_FORWARD_CUTOFF,
};
