//! Entity store interface and the default `Vec`-backed manager
//!
//! The octree and the collision strategies only hold [`Entity`] handles. Any
//! store that can answer "how many", "give me object N" and "does this
//! overlap that" can drive them.

use super::Entity;
use crate::foundation::math::Vec3;
use crate::physics::collision::{BoundingVolume, CollisionShape};
use crate::physics::collision_layers::CollisionCategory;
use std::collections::HashMap;

/// An object that can take part in collision queries
pub trait Collidable {
    /// Current collision shape in world space
    fn shape(&self) -> &CollisionShape;

    /// Category tag used for filtering verdicts
    fn category(&self) -> CollisionCategory;

    /// World-space center
    fn center(&self) -> Vec3 {
        self.shape().center()
    }

    /// Axis-aligned bounds of the shape
    fn bounds(&self) -> BoundingVolume {
        self.shape().bounds()
    }

    /// Check whether this object's shape overlaps another's
    fn overlaps(&self, other: &dyn Collidable) -> bool {
        self.shape().intersects(other.shape())
    }
}

/// Read access to the externally owned set of tracked objects
pub trait EntityStore {
    /// Stored object type
    type Object: Collidable;

    /// Number of tracked objects
    fn count(&self) -> usize;

    /// Object behind a handle
    ///
    /// # Panics
    /// Out-of-range handles are a caller error and panic.
    fn get(&self, entity: Entity) -> &Self::Object;

    /// All handles in storage order
    fn entities(&self) -> Box<dyn Iterator<Item = Entity> + '_> {
        #[allow(clippy::cast_possible_truncation)]
        Box::new((0..self.count()).map(|index| Entity::new(index as u32)))
    }

    /// Tag an object as "in contact" for debug visualization
    fn mark_contact(&mut self, _entity: Entity) {}

    /// Drop every "in contact" tag
    fn clear_contacts(&mut self) {}
}

/// Object tracked by [`EntityManager`]
#[derive(Debug, Clone)]
pub struct TrackedEntity {
    /// Unique name
    pub uid: String,
    /// Collision shape in world space
    pub shape: CollisionShape,
    /// Category tag
    pub category: CollisionCategory,
    /// Set by the octree's leaf checks, read by debug overlays
    pub in_contact: bool,
}

impl Collidable for TrackedEntity {
    fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    fn category(&self) -> CollisionCategory {
        self.category
    }
}

/// `Vec`-backed entity store with lookup by unique name
#[derive(Debug, Default, Clone)]
pub struct EntityManager {
    entities: Vec<TrackedEntity>,
    by_uid: HashMap<String, Entity>,
}

impl EntityManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its handle
    ///
    /// A duplicate `uid` is re-pointed to the new object; the old object
    /// stays in storage under its handle.
    pub fn add_entity(
        &mut self,
        uid: impl Into<String>,
        shape: CollisionShape,
        category: CollisionCategory,
    ) -> Entity {
        let uid = uid.into();
        #[allow(clippy::cast_possible_truncation)]
        let entity = Entity::new(self.entities.len() as u32);

        if self.by_uid.insert(uid.clone(), entity).is_some() {
            log::warn!("Entity uid {uid} already registered, newest entry wins");
        }

        self.entities.push(TrackedEntity {
            uid,
            shape,
            category,
            in_contact: false,
        });
        entity
    }

    /// Handle for a unique name
    pub fn entity_by_uid(&self, uid: &str) -> Option<Entity> {
        self.by_uid.get(uid).copied()
    }

    /// Object for a unique name
    pub fn get_by_uid(&self, uid: &str) -> Option<&TrackedEntity> {
        self.entity_by_uid(uid).map(|entity| self.get(entity))
    }

    /// Mutable access to an object
    pub fn get_mut(&mut self, entity: Entity) -> &mut TrackedEntity {
        &mut self.entities[entity.index()]
    }

    /// Move an object's shape to a new center
    pub fn set_position(&mut self, entity: Entity, position: Vec3) {
        self.get_mut(entity).shape.set_center(position);
    }

    /// Iterate handles and objects in storage order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &TrackedEntity)> {
        self.entities.iter().enumerate().map(|(index, tracked)| {
            #[allow(clippy::cast_possible_truncation)]
            (Entity::new(index as u32), tracked)
        })
    }

    /// Handles of every object currently tagged "in contact"
    pub fn contacts(&self) -> Vec<Entity> {
        self.iter()
            .filter(|(_, tracked)| tracked.in_contact)
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Returns true if the manager tracks no objects
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityStore for EntityManager {
    type Object = TrackedEntity;

    fn count(&self) -> usize {
        self.entities.len()
    }

    fn get(&self, entity: Entity) -> &TrackedEntity {
        &self.entities[entity.index()]
    }

    fn mark_contact(&mut self, entity: Entity) {
        self.get_mut(entity).in_contact = true;
    }

    fn clear_contacts(&mut self) {
        for tracked in &mut self.entities {
            tracked.in_contact = false;
        }
    }
}
