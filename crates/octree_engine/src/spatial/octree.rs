//! Octree spatial partitioning structure
//!
//! Divides a cubic region of space into hierarchical octants so collision
//! checks only pair up objects that share a region. The tree is rebuilt
//! from scratch rather than updated incrementally: seed the root with every
//! tracked object, then subdivide while a child holds more objects than the
//! configured ideal count.
//!
//! Nodes live in an arena owned by the [`Octree`]. An [`OctantId`] is the
//! node's arena index, handed out sequentially from 0 (the root) each time
//! the tree is built, and parent/root links are plain ids. Tearing the tree
//! down is a single truncate of the arena.
//!
//! Region membership uses a closed cube test on the object's center, so an
//! object lying exactly on a face shared by two siblings is listed in both.

use crate::debug::DebugSink;
use crate::ecs::{Collidable, Entity, EntityStore};
use crate::foundation::math::{self, colors, Vec3};
use crate::physics::collision::BoundingVolume;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Child placement relative to the parent center, in creation order
///
/// Front (+Z) layer first, top (+Y) row before bottom, left (-X) before right.
const CHILD_OFFSETS: [[f32; 3]; 8] = [
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
];

/// Configuration for octree behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// World-space center of the root region
    pub center: Vec3,

    /// Edge length of the root cube
    pub size: f32,

    /// Maximum subdivision depth (root is depth 0)
    pub max_depth: u32,

    /// A child subdivides further only while it holds more than this many entities
    pub ideal_entity_count: usize,

    /// No subdivision happens if the child edge length would be at or below this
    pub min_size: f32,

    /// Emit wireframe outlines for visited octants
    pub draw_debug: bool,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            size: 80.0,
            max_depth: 3,
            ideal_entity_count: 5,
            min_size: 1.0,
            draw_debug: true,
        }
    }
}

impl OctreeConfig {
    /// Check that the root geometry is usable
    pub fn validate(&self) -> Result<(), OctreeError> {
        if !math::is_finite(&self.center) {
            return Err(OctreeError::NonFiniteCenter);
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(OctreeError::InvalidSize(self.size));
        }
        if !self.min_size.is_finite() || self.min_size <= 0.0 {
            return Err(OctreeError::InvalidMinSize(self.min_size));
        }
        Ok(())
    }
}

/// Octree construction errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum OctreeError {
    /// Root edge length must be positive and finite
    #[error("octree size must be positive and finite, got {0}")]
    InvalidSize(f32),

    /// Minimum edge length must be positive and finite
    #[error("octree minimum size must be positive and finite, got {0}")]
    InvalidMinSize(f32),

    /// Root center contains NaN or infinity
    #[error("octree center must be finite")]
    NonFiniteCenter,
}

/// Index of an octant within its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OctantId(usize);

impl OctantId {
    /// The root octant of every tree
    pub const ROOT: Self = Self(0);

    /// Arena index
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for OctantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Single cubic region of the tree
#[derive(Debug, Clone)]
pub struct Octant {
    id: OctantId,
    center: Vec3,
    size: f32,
    depth: u32,
    parent: Option<OctantId>,
    root: OctantId,
    children: Option<[OctantId; 8]>,
    entities: Vec<Entity>,
    draw_outline: bool,
}

impl Octant {
    fn new(id: OctantId, center: Vec3, size: f32, depth: u32, parent: Option<OctantId>, draw_outline: bool) -> Self {
        Self {
            id,
            center,
            size,
            depth,
            parent,
            root: OctantId::ROOT,
            children: None,
            entities: Vec::new(),
            draw_outline,
        }
    }

    /// Identifier, unique within the tree
    pub const fn id(&self) -> OctantId {
        self.id
    }

    /// Region center
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Edge length
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Depth below the root
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Parent octant, `None` for the root
    pub const fn parent(&self) -> Option<OctantId> {
        self.parent
    }

    /// Root of the tree this octant belongs to
    pub const fn root(&self) -> OctantId {
        self.root
    }

    /// The eight children, or `None` for a leaf
    pub const fn children(&self) -> Option<[OctantId; 8]> {
        self.children
    }

    /// Entities whose centers fall inside this region
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Whether this octant draws its outline
    pub const fn draws_outline(&self) -> bool {
        self.draw_outline
    }

    /// Returns true if the octant has no children
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Left face (-X)
    pub fn left(&self) -> f32 {
        self.center.x - self.size / 2.0
    }

    /// Right face (+X)
    pub fn right(&self) -> f32 {
        self.center.x + self.size / 2.0
    }

    /// Bottom face (-Y)
    pub fn bottom(&self) -> f32 {
        self.center.y - self.size / 2.0
    }

    /// Top face (+Y)
    pub fn top(&self) -> f32 {
        self.center.y + self.size / 2.0
    }

    /// Back face (-Z)
    pub fn back(&self) -> f32 {
        self.center.z - self.size / 2.0
    }

    /// Front face (+Z)
    pub fn front(&self) -> f32 {
        self.center.z + self.size / 2.0
    }

    /// Region as a bounding volume
    pub fn bounds(&self) -> BoundingVolume {
        BoundingVolume::cube(self.center, self.size / 2.0)
    }

    /// Closed cube containment of a point
    pub fn contains(&self, point: &Vec3) -> bool {
        cube_contains(&self.center, self.size, point)
    }
}

fn cube_contains(center: &Vec3, size: f32, point: &Vec3) -> bool {
    let half = size / 2.0;
    math::abs_diff(point, center).iter().all(|d| *d <= half)
}

/// Octree spatial partitioning structure
#[derive(Debug, Clone)]
pub struct Octree {
    octants: Vec<Octant>,
    config: OctreeConfig,

    /// Largest half-extent among the entities seen by the last build
    max_half_extent: f32,

    /// Entities a subdividing node could not hand to any child
    ///
    /// These are the objects outside the root cube, plus any object lost to
    /// rounding at a midplane. Volume queries always return them.
    strays: Vec<Entity>,
}

impl Octree {
    /// Create a tree holding only its root region
    pub fn new(config: OctreeConfig) -> Result<Self, OctreeError> {
        config.validate()?;
        let root = Octant::new(OctantId::ROOT, config.center, config.size, 0, None, config.draw_debug);
        log::trace!(
            "Octant {} created (root), center {:?}, size {}",
            root.id,
            root.center,
            root.size
        );

        Ok(Self {
            octants: vec![root],
            config,
            max_half_extent: 0.0,
            strays: Vec::new(),
        })
    }

    /// Configuration the tree was built with
    pub const fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Append an entity to the root's candidate list
    pub fn add_entity(&mut self, entity: Entity) {
        self.octants[OctantId::ROOT.index()].entities.push(entity);
    }

    /// Seed the root with every tracked entity, in store order
    pub fn add_all_entities<S: EntityStore + ?Sized>(&mut self, store: &S) {
        let root = &mut self.octants[OctantId::ROOT.index()];
        root.entities.extend(store.entities());
    }

    /// Recursively subdivide from the root
    ///
    /// Any hierarchy from a previous build is discarded first; the root's
    /// candidate list is kept. Returns immediately if the store or the
    /// candidate list is empty.
    pub fn build_tree<S: EntityStore + ?Sized>(&mut self, store: &S) {
        self.discard_children();

        let root_entities = &self.octants[OctantId::ROOT.index()].entities;
        if root_entities.is_empty() || store.count() == 0 {
            return;
        }

        self.max_half_extent = root_entities
            .iter()
            .map(|entity| store.get(*entity).shape().max_half_extent())
            .fold(0.0, f32::max);

        self.build_octant(OctantId::ROOT, store);

        log::debug!(
            "Octree built: {} octants, {} leaves, depth {}, {} strays",
            self.octants.len(),
            self.leaves().len(),
            self.max_depth_reached(),
            self.strays.len()
        );
    }

    /// Clear, reseed with every tracked entity and build again
    pub fn rebuild<S: EntityStore + ?Sized>(&mut self, store: &S) {
        self.clear();
        self.add_all_entities(store);
        self.build_tree(store);
    }

    fn build_octant<S: EntityStore + ?Sized>(&mut self, id: OctantId, store: &S) {
        if store.count() == 0 {
            return;
        }

        let (center, size, depth) = {
            let octant = &self.octants[id.index()];
            (octant.center, octant.size, octant.depth)
        };

        if depth >= self.config.max_depth {
            log::trace!("Octant {id} is at the max depth ({depth})");
            return;
        }

        let child_size = size / 2.0;
        if child_size <= self.config.min_size {
            return;
        }

        let mut children = [OctantId::ROOT; 8];
        for (slot, offset) in CHILD_OFFSETS.iter().enumerate() {
            let child_center = center + Vec3::from(*offset) * (child_size / 2.0);
            children[slot] = self.spawn_child(id, child_center, child_size, store);
        }
        self.octants[id.index()].children = Some(children);
        self.collect_strays(id, &children, store);

        for child in children {
            if self.octants[child.index()].entities.len() > self.config.ideal_entity_count {
                self.build_octant(child, store);
            }
        }
    }

    fn spawn_child<S: EntityStore + ?Sized>(
        &mut self,
        parent: OctantId,
        center: Vec3,
        size: f32,
        store: &S,
    ) -> OctantId {
        let parent_octant = &self.octants[parent.index()];
        let entities: Vec<Entity> = parent_octant
            .entities
            .iter()
            .copied()
            .filter(|entity| cube_contains(&center, size, &store.get(*entity).center()))
            .collect();

        let id = OctantId(self.octants.len());
        let mut child = Octant::new(
            id,
            center,
            size,
            parent_octant.depth + 1,
            Some(parent),
            parent_octant.draw_outline,
        );
        child.root = parent_octant.root;
        child.entities = entities;

        log::trace!(
            "Octant {} has {} objects, center {:?}, size {}, depth {}",
            child.id,
            child.entities.len(),
            child.center,
            child.size,
            child.depth
        );

        self.octants.push(child);
        id
    }

    fn collect_strays<S: EntityStore + ?Sized>(&mut self, id: OctantId, children: &[OctantId; 8], store: &S) {
        let strays: Vec<Entity> = self.octants[id.index()]
            .entities
            .iter()
            .copied()
            .filter(|entity| {
                let center = store.get(*entity).center();
                !children
                    .iter()
                    .any(|child| self.octants[child.index()].contains(&center))
            })
            .collect();
        self.strays.extend(strays);
    }

    /// Run leaf collision checks over the whole tree
    pub fn update<S: EntityStore + ?Sized>(&self, store: &mut S, sink: &mut dyn DebugSink) {
        self.update_octant(OctantId::ROOT, store, sink);
    }

    /// Run collision checks below `id`
    ///
    /// A leaf checks every pair of its entities and tags overlapping ones as
    /// in contact; an interior octant visits its children in creation order.
    /// Entities that moved since the last build are checked where they were
    /// bucketed.
    pub fn update_octant<S: EntityStore + ?Sized>(&self, id: OctantId, store: &mut S, sink: &mut dyn DebugSink) {
        let octant = &self.octants[id.index()];
        if octant.draw_outline {
            sink.draw_wire_cube(octant.center, octant.size, colors::yellow());
        }

        match octant.children {
            None => self.check_collisions(octant, store, sink),
            Some(children) => {
                for child in children {
                    self.update_octant(child, store, sink);
                }
            }
        }
    }

    fn check_collisions<S: EntityStore + ?Sized>(&self, octant: &Octant, store: &mut S, sink: &mut dyn DebugSink) {
        for (i, &a) in octant.entities.iter().enumerate() {
            for &b in &octant.entities[i + 1..] {
                if a == b || !store.get(a).overlaps(store.get(b)) {
                    continue;
                }

                store.mark_contact(a);
                store.mark_contact(b);
                if octant.draw_outline {
                    sink.draw_point(store.get(a).center(), colors::red());
                    sink.draw_point(store.get(b).center(), colors::red());
                }
            }
        }
    }

    /// Toggle outline drawing on every octant
    pub fn set_draw_debug(&mut self, draw_debug: bool) {
        self.config.draw_debug = draw_debug;
        for octant in &mut self.octants {
            octant.draw_outline = draw_debug;
        }
    }

    fn discard_children(&mut self) {
        self.octants.truncate(1);
        self.octants[OctantId::ROOT.index()].children = None;
        self.strays.clear();
        self.max_half_extent = 0.0;
    }

    /// Drop every child octant and the root's candidate list
    pub fn clear(&mut self) {
        self.discard_children();
        self.octants[OctantId::ROOT.index()].entities.clear();
    }

    /// The root octant
    pub fn root(&self) -> &Octant {
        &self.octants[OctantId::ROOT.index()]
    }

    /// Octant by id
    pub fn octant(&self, id: OctantId) -> Option<&Octant> {
        self.octants.get(id.index())
    }

    /// All octants in creation order
    pub fn octants(&self) -> &[Octant] {
        &self.octants
    }

    /// Number of live octants, root included
    pub fn octant_count(&self) -> usize {
        self.octants.len()
    }

    /// All leaf octants
    pub fn leaves(&self) -> Vec<&Octant> {
        self.octants.iter().filter(|octant| octant.is_leaf()).collect()
    }

    /// Deepest depth present in the tree
    pub fn max_depth_reached(&self) -> u32 {
        self.octants.iter().map(|octant| octant.depth).max().unwrap_or(0)
    }

    /// Unordered entity pairs sharing at least one leaf, each listed once
    ///
    /// Objects on a shared face sit in several leaves; the set removes the
    /// repeated pairs.
    pub fn candidate_pairs(&self) -> Vec<(Entity, Entity)> {
        let mut pairs = BTreeSet::new();
        for leaf in self.leaves() {
            for (i, &a) in leaf.entities.iter().enumerate() {
                for &b in &leaf.entities[i + 1..] {
                    if a != b {
                        pairs.insert((a.min(b), a.max(b)));
                    }
                }
            }
        }
        pairs.into_iter().collect()
    }

    /// Entities that may overlap `volume`, as of the last build
    ///
    /// Visits octants whose region, grown by the largest entity half-extent,
    /// overlaps the volume, and returns the entities of the leaves reached
    /// plus any strays. Sorted and free of duplicates.
    pub fn query_volume(&self, volume: &BoundingVolume) -> Vec<Entity> {
        let root = self.root();
        if root.is_leaf() {
            // An undivided root never sorted its candidates by region
            return root.entities.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        }

        let mut found: BTreeSet<Entity> = self.strays.iter().copied().collect();
        self.query_octant(OctantId::ROOT, volume, &mut found);
        found.into_iter().collect()
    }

    fn query_octant(&self, id: OctantId, volume: &BoundingVolume, found: &mut BTreeSet<Entity>) {
        let octant = &self.octants[id.index()];
        if !octant.bounds().expanded(self.max_half_extent).overlaps(volume) {
            return;
        }

        match octant.children {
            None => found.extend(octant.entities.iter().copied()),
            Some(children) => {
                for child in children {
                    self.query_octant(child, volume, found);
                }
            }
        }
    }
}
