//! The single write path into the local world snapshot.

use super::{Creature, FoodTile, WorldSnapshot, WorldUpdate};
use crate::error::{Result, ViewError};

/// Result of applying one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// True iff at least one field was present and applied. Value-equal
    /// replacements still count.
    pub changed: bool,
}

/// Owns the [`WorldSnapshot`] of one session.
#[derive(Debug, Default)]
pub struct StateStore {
    snapshot: WorldSnapshot,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the current snapshot.
    pub fn snapshot(&self) -> &WorldSnapshot {
        &self.snapshot
    }

    /// Apply a partial update.
    ///
    /// Every present field replaces the stored field as a whole; absent
    /// fields are left untouched. The update is validated in full first, so
    /// a rejected update leaves the snapshot exactly as it was.
    pub fn apply_update(&mut self, update: WorldUpdate) -> Result<UpdateOutcome> {
        validate(&update)?;

        let WorldUpdate {
            size,
            food_fields,
            creatures,
        } = update;
        let mut changed = false;

        if let Some(size) = size {
            if self.snapshot.size.is_some_and(|old| old != size) {
                log::info!("World size changed from {:?} to {}", self.snapshot.size, size);
            }
            self.snapshot.size = Some(size);
            changed = true;
        }

        if let Some(food_fields) = food_fields {
            log::debug!("Replacing food fields ({} tiles)", food_fields.len());
            self.snapshot.food_fields = Some(food_fields);
            changed = true;
        }

        if let Some(creatures) = creatures {
            log::debug!("Replacing creatures ({} entities)", creatures.len());
            self.snapshot.creatures = Some(creatures);
            changed = true;
        }

        Ok(UpdateOutcome { changed })
    }
}

fn validate(update: &WorldUpdate) -> Result<()> {
    if let Some(size) = update.size {
        if !size.is_finite() || size <= 0.0 {
            return Err(ViewError::malformed(
                "size",
                format!("expected a positive number, got {size}"),
            ));
        }
    }

    if let Some(tiles) = &update.food_fields {
        for (index, tile) in tiles.iter().enumerate() {
            validate_tile(tile)
                .map_err(|reason| ViewError::malformed("food_fields", format!("tile {index}: {reason}")))?;
        }
    }

    if let Some(creatures) = &update.creatures {
        for (index, creature) in creatures.iter().enumerate() {
            validate_creature(creature).map_err(|reason| {
                ViewError::malformed("creatures", format!("creature {index}: {reason}"))
            })?;
        }
    }

    Ok(())
}

fn validate_tile(tile: &FoodTile) -> Result<(), String> {
    if !tile.x_min.is_finite() || !tile.y_min.is_finite() {
        return Err(format!("non-finite origin ({}, {})", tile.x_min, tile.y_min));
    }
    if !tile.width.is_finite() || tile.width <= 0.0 {
        return Err(format!("width must be positive, got {}", tile.width));
    }
    Ok(())
}

fn validate_creature(creature: &Creature) -> Result<(), String> {
    let Creature {
        x,
        y,
        radius,
        direction,
    } = *creature;
    if !x.is_finite() || !y.is_finite() || !direction.is_finite() {
        return Err(format!("non-finite position or direction ({x}, {y}, {direction})"));
    }
    if !radius.is_finite() || radius < 0.0 {
        return Err(format!("radius must be non-negative, got {radius}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creature(x: f64, y: f64) -> Creature {
        Creature {
            x,
            y,
            radius: 1.0,
            direction: 0.0,
        }
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let mut store = StateStore::new();
        let outcome = store.apply_update(WorldUpdate::default()).unwrap();
        assert!(!outcome.changed);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_creatures_do_not_erase_food() {
        let mut store = StateStore::new();
        let tiles = vec![FoodTile::uniform(0.0, 0.0, 8.0, true)];
        store
            .apply_update(WorldUpdate::default().with_size(64.0).with_food_fields(tiles.clone()))
            .unwrap();

        let outcome = store
            .apply_update(WorldUpdate::default().with_creatures(vec![creature(1.0, 1.0)]))
            .unwrap();

        assert!(outcome.changed);
        assert_eq!(store.snapshot().food_fields(), Some(tiles.as_slice()));
        assert_eq!(store.snapshot().size(), Some(64.0));
    }

    #[test]
    fn test_food_does_not_erase_creatures() {
        let mut store = StateStore::new();
        let creatures = vec![creature(3.0, 4.0)];
        store
            .apply_update(WorldUpdate::default().with_creatures(creatures.clone()))
            .unwrap();
        store
            .apply_update(WorldUpdate::default().with_food_fields(vec![]))
            .unwrap();
        assert_eq!(store.snapshot().creatures(), Some(creatures.as_slice()));
        assert_eq!(store.snapshot().food_fields(), Some(&[][..]));
    }

    #[test]
    fn test_field_is_replaced_not_merged() {
        let mut store = StateStore::new();
        store
            .apply_update(WorldUpdate::default().with_creatures(vec![
                creature(1.0, 1.0),
                creature(2.0, 2.0),
            ]))
            .unwrap();
        store
            .apply_update(WorldUpdate::default().with_creatures(vec![creature(9.0, 9.0)]))
            .unwrap();
        assert_eq!(store.snapshot().creatures(), Some(&[creature(9.0, 9.0)][..]));
    }

    #[test]
    fn test_identical_value_still_counts_as_change() {
        let mut store = StateStore::new();
        store.apply_update(WorldUpdate::default().with_size(64.0)).unwrap();
        let outcome = store.apply_update(WorldUpdate::default().with_size(64.0)).unwrap();
        assert!(outcome.changed);
    }

    #[test]
    fn test_invalid_size_rejected() {
        let mut store = StateStore::new();
        for bad in [0.0, -4.0, f64::NAN, f64::INFINITY] {
            let err = store
                .apply_update(WorldUpdate::default().with_size(bad))
                .unwrap_err();
            assert!(matches!(err, ViewError::MalformedUpdate { field: "size", .. }));
        }
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_rejection_is_all_or_nothing() {
        let mut store = StateStore::new();
        store.apply_update(WorldUpdate::default().with_size(32.0)).unwrap();

        let mut broken = creature(1.0, 1.0);
        broken.radius = f64::NAN;
        let update = WorldUpdate::default()
            .with_size(64.0)
            .with_food_fields(vec![FoodTile::uniform(0.0, 0.0, 8.0, true)])
            .with_creatures(vec![creature(0.0, 0.0), broken]);

        let err = store.apply_update(update).unwrap_err();
        assert!(matches!(err, ViewError::MalformedUpdate { field: "creatures", .. }));
        assert_eq!(store.snapshot().size(), Some(32.0));
        assert!(store.snapshot().food_fields().is_none());
        assert!(store.snapshot().creatures().is_none());
    }

    #[test]
    fn test_zero_width_tile_rejected() {
        let mut store = StateStore::new();
        let err = store
            .apply_update(
                WorldUpdate::default().with_food_fields(vec![FoodTile::uniform(0.0, 0.0, 0.0, true)]),
            )
            .unwrap_err();
        assert!(matches!(err, ViewError::MalformedUpdate { field: "food_fields", .. }));
    }
}
