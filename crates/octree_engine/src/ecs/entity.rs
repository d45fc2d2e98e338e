//! Entity implementation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity identifier
///
/// A handle is the entity's position in its store, so handles stay valid for
/// as long as the store only grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entity {
    id: u32,
}

impl Entity {
    /// Create a new entity with the given ID
    pub const fn new(id: u32) -> Self {
        Self { id }
    }

    /// Get the entity ID
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// The ID as a store index
    pub const fn index(&self) -> usize {
        self.id as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}
