//! Collision categories for filtering collision verdicts
//!
//! A category says what an object *is*; the collision strategies use it to
//! decide which contacts matter. Hitting a collectible is not the same event
//! as hitting a hazard.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Category tag carried by every tracked object
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionCategory: u32 {
        /// The player-controlled subject
        const PLAYER = 1 << 0;
        /// Hazards; contact with the subject ends the run
        const OBSTACLE = 1 << 1;
        /// Pickups; contact with the subject is harmless
        const COLLECTIBLE = 1 << 2;
        /// Static scenery
        const ENVIRONMENT = 1 << 3;
        /// Trigger volumes (no gameplay response)
        const TRIGGER = 1 << 4;
    }
}

impl CollisionCategory {
    /// Returns true if this object is tagged as an obstacle
    pub fn is_obstacle(self) -> bool {
        self.contains(Self::OBSTACLE)
    }

    /// Returns true if this object is tagged as a collectible
    pub fn is_collectible(self) -> bool {
        self.contains(Self::COLLECTIBLE)
    }
}

impl Default for CollisionCategory {
    fn default() -> Self {
        Self::ENVIRONMENT
    }
}
