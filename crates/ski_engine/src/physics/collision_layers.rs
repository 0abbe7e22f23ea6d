//! Collision layer system for filtering collision detection
//!
//! Every collider sits on one or more layers; queries pass a filter. An
//! empty filter matches everything, otherwise at least one bit must be shared.

use bitflags::bitflags;

bitflags! {
    /// Collision layer / filter bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionFilter: u32 {
        /// Solid walls the player bounces off
        const WALL = 1 << 0;
        /// Terrain and course props
        const SCENARIO = 1 << 1;
        /// Player characters
        const PLAYER = 1 << 2;
        /// Hostile actors
        const ENEMY = 1 << 3;
        /// Every standard layer
        const ALL = 0xFF;
    }
}

impl CollisionFilter {
    /// No layer; as a query filter it matches everything
    pub const NONE: Self = Self::empty();

    /// Whether a collider on `self` takes part in a query using `filter`
    pub fn participates(self, filter: CollisionFilter) -> bool {
        filter.is_empty() || self.intersects(filter)
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::SCENARIO
    }
}
