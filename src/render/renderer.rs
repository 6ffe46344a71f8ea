//! Full-surface repaint from a world snapshot

use super::{Bitmap, DrawingSurface, RenderStyle, WorldTransform};
use crate::error::{Result, ViewError};
use crate::world::{Creature, FoodTile, WorldSnapshot};

pub struct Renderer {
    style: RenderStyle,
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Repaint `surface` from `snapshot`.
    ///
    /// Returns `Ok(false)` without touching the surface while the world size
    /// is still unknown. Fails with [`ViewError::SurfaceUnavailable`] when no
    /// surface is attached.
    pub fn redraw<S>(&self, snapshot: &WorldSnapshot, surface: Option<&mut S>) -> Result<bool>
    where
        S: DrawingSurface + ?Sized,
    {
        let Some(world_size) = snapshot.size() else {
            log::trace!("Skipping redraw, world size not received yet");
            return Ok(false);
        };
        let surface = surface.ok_or(ViewError::SurfaceUnavailable)?;

        surface.clear();

        let transform = WorldTransform::new(world_size, surface.width(), surface.height());

        let tiles = snapshot.food_fields().unwrap_or_default();
        for tile in tiles {
            self.draw_food_tile(surface, &transform, tile);
        }

        let creatures = snapshot.creatures().unwrap_or_default();
        for creature in creatures {
            self.draw_creature(surface, &transform, creature);
        }

        log::trace!(
            "Redrew {} food tiles and {} creatures",
            tiles.len(),
            creatures.len()
        );

        Ok(true)
    }

    fn draw_food_tile<S>(&self, surface: &mut S, transform: &WorldTransform, tile: &FoodTile)
    where
        S: DrawingSurface + ?Sized,
    {
        let bitmap = Bitmap::from_food_tile(tile, &self.style);
        let (top_left, extent) = transform.tile_rect(tile);
        surface.draw_block(&bitmap, top_left.x, top_left.y, extent.x, extent.y);
    }

    /// Body fill, outline, then heading line from the center to the rim.
    fn draw_creature<S>(&self, surface: &mut S, transform: &WorldTransform, creature: &Creature)
    where
        S: DrawingSurface + ?Sized,
    {
        let center = transform.to_surface(creature.position());
        let radius = transform.length(creature.radius);
        let tip = center + transform.direction(creature.heading()) * radius;

        surface.fill_circle(center, radius, self.style.creature_fill);
        surface.stroke_circle(
            center,
            radius,
            self.style.line_width,
            self.style.creature_outline,
        );
        surface.draw_line(center, tip, self.style.line_width, self.style.creature_outline);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderStyle::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PixelSurface;
    use crate::world::{StateStore, WorldUpdate};

    #[test]
    fn test_redraw_without_size_is_noop() {
        let store = StateStore::new();
        let mut surface = PixelSurface::new(4, 4).with_background([9, 9, 9, 255]);
        let drew = Renderer::default()
            .redraw(store.snapshot(), Some(&mut surface))
            .unwrap();
        assert!(!drew);
        // Never cleared either.
        assert_eq!(surface.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_redraw_without_surface_fails() {
        let mut store = StateStore::new();
        store.apply_update(WorldUpdate::default().with_size(8.0)).unwrap();
        let err = Renderer::default()
            .redraw::<PixelSurface>(store.snapshot(), None)
            .unwrap_err();
        assert!(matches!(err, ViewError::SurfaceUnavailable));
    }

    #[test]
    fn test_size_only_clears_surface() {
        let mut store = StateStore::new();
        store.apply_update(WorldUpdate::default().with_size(64.0)).unwrap();
        let mut surface = PixelSurface::new(16, 16).with_background([1, 2, 3, 255]);
        assert!(Renderer::default()
            .redraw(store.snapshot(), Some(&mut surface))
            .unwrap());
        assert_eq!(surface.count_color([1, 2, 3, 255]), 16 * 16);
    }

    #[test]
    fn test_full_tile_covers_surface() {
        let mut store = StateStore::new();
        store
            .apply_update(
                WorldUpdate::default()
                    .with_size(8.0)
                    .with_food_fields(vec![FoodTile::uniform(0.0, 0.0, 8.0, true)]),
            )
            .unwrap();
        let renderer = Renderer::default();
        let mut surface = PixelSurface::new(64, 64);
        renderer.redraw(store.snapshot(), Some(&mut surface)).unwrap();
        assert_eq!(surface.count_color(renderer.style().occupied_color), 64 * 64);
    }
}
