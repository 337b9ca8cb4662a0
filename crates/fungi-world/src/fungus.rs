//! Fungus state.

use fungi_core::{Color, Location};
use serde::{Deserialize, Serialize};

/// Growth points at which a fungus spawns a child
pub const SPAWN_THRESHOLD: u8 = 10;

/// Hit points given to every living fungus
pub const INITIAL_HIT_POINTS: u8 = 10;

/// Offset from a parent to the cell its child is spawned into
pub const CHILD_OFFSET: (i32, i32) = (1, 1);

/// A single point-organism living in one cell of the dish.
///
/// Location and color are fixed at construction; only the growth counter
/// changes over the fungus' lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fungus {
    location: Location,
    color: Color,
    growth_points: u8,
    hit_points: u8,
}

impl Fungus {
    pub fn new(location: Location, color: Color) -> Self {
        Self {
            location,
            color,
            growth_points: 0,
            hit_points: INITIAL_HIT_POINTS,
        }
    }

    /// A placeholder fungus with no hit points, at the origin
    pub fn empty() -> Self {
        Self {
            location: Location::default(),
            color: Color::default(),
            growth_points: 0,
            hit_points: 0,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn growth_points(&self) -> u8 {
        self.growth_points
    }

    pub fn hit_points(&self) -> u8 {
        self.hit_points
    }

    /// Add growth points, saturating at `u8::MAX`
    pub fn add_growth(&mut self, delta: u8) {
        self.growth_points = self.growth_points.saturating_add(delta);
    }

    pub fn is_ready_to_spawn(&self) -> bool {
        self.growth_points >= SPAWN_THRESHOLD
    }

    /// Consume the accumulated growth and produce a child one cell down and
    /// to the right. Returns `None` when that cell is not addressable.
    pub fn spawn_child(&mut self) -> Option<Fungus> {
        self.growth_points = 0;
        let (dx, dy) = CHILD_OFFSET;
        self.location
            .offset(dx, dy)
            .map(|location| Fungus::new(location, self.color))
    }
}

impl Default for Fungus {
    fn default() -> Self {
        Self::empty()
    }
}
