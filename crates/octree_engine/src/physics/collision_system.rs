//! Subject-vs-obstacle collision detection
//!
//! Every strategy answers one question: is the subject (the player) touching
//! at least one entity tagged [`OBSTACLE`](crate::physics::CollisionCategory::OBSTACLE) right now?
//! They differ only in how many pairs they look at, so for a given scene
//! snapshot (and a tree built from that snapshot) they agree.
//!
//! [`CollisionStrategy::ForwardCutoff`] is the strategy used by default. The
//! octree-backed strategy is an independent alternative the caller may pick.

use crate::ecs::{Collidable, Entity, EntityStore};
use crate::spatial::{Octree, OctreeConfig, OctreeError};
use serde::{Deserialize, Serialize};

/// Default forward cutoff, in world units past the subject's leading face
pub const DEFAULT_FORWARD_CUTOFF: f32 = 5.0;

/// Collision detection algorithm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionStrategy {
    /// Test every unordered pair of tracked entities, O(N²)
    BruteForce,

    /// Linear scan of subject vs entities not too far ahead
    ///
    /// Entities travel toward the subject along +Z. One whose far (+Z) face
    /// is more than `cutoff` beyond the subject's leading (-Z) face cannot be
    /// touching it yet and is skipped.
    ForwardCutoff {
        /// Look-ahead distance along -Z
        cutoff: f32,
    },

    /// Subject vs the entities the octree returns for its bounds
    Octree,
}

impl Default for CollisionStrategy {
    fn default() -> Self {
        Self::ForwardCutoff {
            cutoff: DEFAULT_FORWARD_CUTOFF,
        }
    }
}

impl CollisionStrategy {
    /// Returns true if this strategy reads the octree
    pub const fn uses_octree(&self) -> bool {
        matches!(self, Self::Octree)
    }

    /// Short display name for logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BruteForce => "brute-force",
            Self::ForwardCutoff { .. } => "forward-cutoff",
            Self::Octree => "octree",
        }
    }
}

/// Configuration for [`CollisionDetector`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Active strategy
    pub strategy: CollisionStrategy,

    /// Rebuild the octree every this many steps (octree strategy only)
    ///
    /// Values above 1 trade accuracy for speed: between rebuilds the tree
    /// reflects stale positions.
    pub rebuild_interval: u32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            strategy: CollisionStrategy::default(),
            rebuild_interval: 1,
        }
    }
}

/// The subject touches `other` and `other` is an obstacle
///
/// Only the other member's tag counts; the subject's own tag never does.
fn is_hazard_contact<S: EntityStore + ?Sized>(store: &S, subject: Entity, other: Entity) -> bool {
    let other_object = store.get(other);
    other_object.category().is_obstacle() && store.get(subject).overlaps(other_object)
}

/// Brute-force verdict: every pair of entities, keep those involving the subject
pub fn brute_force<S: EntityStore + ?Sized>(store: &S, subject: Entity) -> bool {
    let entities: Vec<Entity> = store.entities().collect();
    for (i, &a) in entities.iter().enumerate() {
        for &b in &entities[i + 1..] {
            let other = match (a == subject, b == subject) {
                (true, false) => b,
                (false, true) => a,
                _ => continue,
            };
            if is_hazard_contact(store, subject, other) {
                return true;
            }
        }
    }
    false
}

/// Forward-cutoff verdict: subject vs every entity within `cutoff` ahead
pub fn forward_cutoff<S: EntityStore + ?Sized>(store: &S, subject: Entity, cutoff: f32) -> bool {
    if store.count() == 0 {
        return false;
    }

    let play_boundary = store.get(subject).bounds().min().z - cutoff.max(0.0);
    store
        .entities()
        .filter(|&other| other != subject)
        .filter(|&other| store.get(other).bounds().max().z >= play_boundary)
        .any(|other| is_hazard_contact(store, subject, other))
}

/// Octree verdict: subject vs the candidates returned for its bounds
///
/// The tree must have been built from the current positions for the answer
/// to match the other strategies.
pub fn octree_pruned<S: EntityStore + ?Sized>(store: &S, subject: Entity, octree: &Octree) -> bool {
    if store.count() == 0 {
        return false;
    }

    octree
        .query_volume(&store.get(subject).bounds())
        .into_iter()
        .filter(|&other| other != subject)
        .any(|other| is_hazard_contact(store, subject, other))
}

/// Every entity overlapping the subject, whatever its category
pub fn subject_contacts<S: EntityStore + ?Sized>(store: &S, subject: Entity) -> Vec<Entity> {
    if store.count() == 0 {
        return Vec::new();
    }

    let subject_object = store.get(subject);
    store
        .entities()
        .filter(|&other| other != subject && subject_object.overlaps(store.get(other)))
        .collect()
}

/// Runs the configured strategy once per simulation step
///
/// Owns the octree so the octree strategy can rebuild it on its interval.
/// The tree is only rebuilt automatically while that strategy is active.
pub struct CollisionDetector {
    config: CollisionConfig,
    octree: Octree,
    steps: u64,
    last_rebuild: Option<u64>,
}

impl CollisionDetector {
    /// Create a detector with an empty octree
    pub fn new(config: CollisionConfig, octree_config: OctreeConfig) -> Result<Self, OctreeError> {
        Ok(Self {
            config,
            octree: Octree::new(octree_config)?,
            steps: 0,
            last_rebuild: None,
        })
    }

    /// Active configuration
    pub const fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Active strategy
    pub const fn strategy(&self) -> CollisionStrategy {
        self.config.strategy
    }

    /// Switch strategy; the octree is rebuilt on the next step if needed
    pub fn set_strategy(&mut self, strategy: CollisionStrategy) {
        if strategy != self.config.strategy {
            log::info!("Collision strategy: {} -> {}", self.config.strategy.name(), strategy.name());
            self.config.strategy = strategy;
            self.last_rebuild = None;
        }
    }

    /// The detector's octree
    pub const fn octree(&self) -> &Octree {
        &self.octree
    }

    /// Mutable access to the detector's octree
    pub fn octree_mut(&mut self) -> &mut Octree {
        &mut self.octree
    }

    /// Number of completed steps
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Rebuild the octree from the store's current positions
    pub fn rebuild_tree<S: EntityStore + ?Sized>(&mut self, store: &S) {
        self.octree.rebuild(store);
        self.last_rebuild = Some(self.steps);
    }

    fn rebuild_due(&self) -> bool {
        let interval = u64::from(self.config.rebuild_interval.max(1));
        self.last_rebuild
            .map_or(true, |last| self.steps.saturating_sub(last) >= interval)
    }

    /// Advance one step: rebuild the tree if due, then run the strategy
    pub fn step<S: EntityStore + ?Sized>(&mut self, store: &S, subject: Entity) -> bool {
        if self.config.strategy.uses_octree() && self.rebuild_due() {
            self.rebuild_tree(store);
        }

        let hit = self.detect(store, subject);
        self.steps += 1;
        hit
    }

    /// Run the active strategy against the current store and tree
    pub fn detect<S: EntityStore + ?Sized>(&self, store: &S, subject: Entity) -> bool {
        match self.config.strategy {
            CollisionStrategy::BruteForce => brute_force(store, subject),
            CollisionStrategy::ForwardCutoff { cutoff } => forward_cutoff(store, subject, cutoff),
            CollisionStrategy::Octree => octree_pruned(store, subject, &self.octree),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityManager;
    use crate::foundation::math::Vec3;
    use crate::physics::collision::CollisionShape;
    use crate::physics::collision_layers::CollisionCategory;

    fn lane_scene() -> (EntityManager, Entity) {
        let mut store = EntityManager::new();
        let player = store.add_entity(
            "Player",
            CollisionShape::cube(Vec3::zeros(), 0.5),
            CollisionCategory::PLAYER,
        );
        for i in 0..10 {
            store.add_entity(
                format!("Cow{i}"),
                CollisionShape::cube(Vec3::new(0.0, 0.0, -10.0 * (i + 1) as f32), 0.5),
                CollisionCategory::OBSTACLE,
            );
        }
        (store, player)
    }

    fn all_strategies() -> [CollisionStrategy; 3] {
        [
            CollisionStrategy::BruteForce,
            CollisionStrategy::default(),
            CollisionStrategy::Octree,
        ]
    }

    #[test]
    fn test_clear_lane_has_no_hit() {
        let (store, player) = lane_scene();
        for strategy in all_strategies() {
            let config = CollisionConfig { strategy, rebuild_interval: 1 };
            let mut detector = CollisionDetector::new(config, OctreeConfig::default()).unwrap();
            assert!(!detector.step(&store, player), "{}", strategy.name());
        }
    }

    #[test]
    fn test_obstacle_reaching_player_is_hit() {
        let (mut store, player) = lane_scene();
        store.set_position(Entity::new(1), Vec3::new(0.2, 0.0, -0.9));
        for strategy in all_strategies() {
            let config = CollisionConfig { strategy, rebuild_interval: 1 };
            let mut detector = CollisionDetector::new(config, OctreeConfig::default()).unwrap();
            assert!(detector.step(&store, player), "{}", strategy.name());
        }
    }

    #[test]
    fn test_cutoff_skips_far_obstacles_only() {
        let (store, player) = lane_scene();
        // Shrinking the cutoff never changes the verdict, only the work done
        assert!(!forward_cutoff(&store, player, 0.0));
        assert!(!forward_cutoff(&store, player, 1000.0));
    }

    #[test]
    fn test_negative_cutoff_behaves_as_zero() {
        let (mut store, player) = lane_scene();
        store.set_position(Entity::new(1), Vec3::new(0.0, 0.0, -0.75));
        assert!(forward_cutoff(&store, player, -50.0));
    }

    #[test]
    fn test_subject_contacts_include_every_category() {
        let (mut store, player) = lane_scene();
        let coin = store.add_entity(
            "Coin0",
            CollisionShape::sphere(Vec3::new(0.0, 0.5, 0.0), 0.25),
            CollisionCategory::COLLECTIBLE,
        );
        store.set_position(Entity::new(1), Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(subject_contacts(&store, player), vec![Entity::new(1), coin]);
    }

    #[test]
    fn test_octree_rebuilds_on_interval() {
        let (mut store, player) = lane_scene();
        let config = CollisionConfig {
            strategy: CollisionStrategy::Octree,
            rebuild_interval: 3,
        };
        let octree_config = OctreeConfig {
            size: 256.0,
            max_depth: 5,
            ideal_entity_count: 1,
            ..OctreeConfig::default()
        };
        let mut detector = CollisionDetector::new(config, octree_config).unwrap();
        assert!(!detector.step(&store, player));

        // Stale tree: the far cow is still bucketed at z = -100
        store.set_position(Entity::new(10), Vec3::new(0.0, 0.0, 0.0));
        assert!(!detector.step(&store, player));
        assert!(!detector.step(&store, player));
        assert!(detector.step(&store, player));
        assert_eq!(detector.steps(), 4);
    }

    #[test]
    fn test_switching_strategy_forces_rebuild() {
        let (mut store, player) = lane_scene();
        let mut detector = CollisionDetector::new(CollisionConfig::default(), OctreeConfig::default()).unwrap();
        assert!(!detector.step(&store, player));
        assert_eq!(detector.octree().octant_count(), 1);

        store.set_position(Entity::new(2), Vec3::new(0.0, 0.0, -0.5));
        detector.set_strategy(CollisionStrategy::Octree);
        assert!(detector.step(&store, player));
        assert!(detector.octree().octant_count() > 1);
    }
}
