//! Local reconstruction of the remote world.
//!
//! The remote simulation streams the world as a square grid of `size`
//! world-units, a set of food tiles and a list of creatures. World-units have
//! y increasing upward; converting to surface pixels is the renderer's job.

mod store;

pub use store::{StateStore, UpdateOutcome};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Side length of a food tile's sub-raster.
pub const FOOD_TILE_CELLS: usize = 8;

/// Occupancy of a food tile, `values[row][col]`, row 0 is the bottom row.
pub type FoodMatrix = [[bool; FOOD_TILE_CELLS]; FOOD_TILE_CELLS];

/// One coarse cell of the food-density grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodTile {
    pub x_min: f64,
    pub y_min: f64,
    /// Extent along both axes; tiles are square.
    pub width: f64,
    pub values: FoodMatrix,
}

impl FoodTile {
    /// Tile with every sub-cell set to `value`.
    pub fn uniform(x_min: f64, y_min: f64, width: f64, value: bool) -> Self {
        Self {
            x_min,
            y_min,
            width,
            values: [[value; FOOD_TILE_CELLS]; FOOD_TILE_CELLS],
        }
    }

    /// Number of occupied sub-cells.
    pub fn occupied_count(&self) -> usize {
        self.values.iter().flatten().filter(|v| **v).count()
    }
}

/// A creature as last reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Heading in radians, 0 along +x, counter-clockwise.
    pub direction: f64,
}

impl Creature {
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Unit vector of the heading in world space.
    pub fn heading(&self) -> DVec2 {
        DVec2::from_angle(self.direction)
    }
}

/// The locally held world facts. Every field starts unset.
///
/// Only [`StateStore`] can write a snapshot; everything else gets a shared
/// reference for the duration of one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldSnapshot {
    size: Option<f64>,
    food_fields: Option<Vec<FoodTile>>,
    creatures: Option<Vec<Creature>>,
}

impl WorldSnapshot {
    /// Side length of the world in world-units, once the server has sent it.
    pub fn size(&self) -> Option<f64> {
        self.size
    }

    pub fn food_fields(&self) -> Option<&[FoodTile]> {
        self.food_fields.as_deref()
    }

    pub fn creatures(&self) -> Option<&[Creature]> {
        self.creatures.as_deref()
    }

    /// True while nothing at all has been received.
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.food_fields.is_none() && self.creatures.is_none()
    }
}

/// A partial update: every present field replaces the stored one wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldUpdate {
    pub size: Option<f64>,
    pub food_fields: Option<Vec<FoodTile>>,
    pub creatures: Option<Vec<Creature>>,
}

impl WorldUpdate {
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_food_fields(mut self, food_fields: Vec<FoodTile>) -> Self {
        self.food_fields = Some(food_fields);
        self
    }

    pub fn with_creatures(mut self, creatures: Vec<Creature>) -> Self {
        self.creatures = Some(creatures);
        self
    }

    /// True when the update carries no recognized field.
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.food_fields.is_none() && self.creatures.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_follows_direction() {
        let creature = Creature {
            x: 1.0,
            y: 2.0,
            radius: 0.5,
            direction: std::f64::consts::FRAC_PI_2,
        };
        let heading = creature.heading();
        assert!(heading.x.abs() < 1e-12);
        assert!((heading.y - 1.0).abs() < 1e-12);
        assert_eq!(creature.position(), DVec2::new(1.0, 2.0));
    }

    #[test]
    fn test_uniform_tile() {
        assert_eq!(FoodTile::uniform(0.0, 0.0, 8.0, true).occupied_count(), 64);
        assert_eq!(FoodTile::uniform(0.0, 0.0, 8.0, false).occupied_count(), 0);
    }

    #[test]
    fn test_new_snapshot_is_empty() {
        let snapshot = WorldSnapshot::default();
        assert!(snapshot.is_empty());
        assert!(snapshot.size().is_none());
        assert!(snapshot.food_fields().is_none());
        assert!(snapshot.creatures().is_none());
    }

    #[test]
    fn test_update_builder() {
        let update = WorldUpdate::default().with_size(64.0).with_creatures(vec![]);
        assert!(!update.is_empty());
        assert_eq!(update.size, Some(64.0));
        assert_eq!(update.creatures, Some(vec![]));
        assert!(update.food_fields.is_none());
        assert!(WorldUpdate::default().is_empty());
    }
}
