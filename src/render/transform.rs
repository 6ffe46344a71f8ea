//! World-unit to surface-pixel mapping.

use glam::DVec2;

use crate::world::FoodTile;

/// Maps world-units (y up) onto a surface (y down) so that the whole square
/// world fills the surface.
///
/// Built fresh for every redraw; a changed world size or surface size is
/// picked up on the next frame without any cached scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    scale: DVec2,
    surface_height: f64,
}

impl WorldTransform {
    pub fn new(world_size: f64, surface_width: f64, surface_height: f64) -> Self {
        Self {
            scale: DVec2::new(surface_width / world_size, surface_height / world_size),
            surface_height,
        }
    }

    /// Pixels per world-unit along each axis.
    pub fn scale(&self) -> DVec2 {
        self.scale
    }

    pub fn to_surface(&self, world: DVec2) -> DVec2 {
        DVec2::new(
            world.x * self.scale.x,
            self.surface_height - world.y * self.scale.y,
        )
    }

    /// Top-left corner and extent of a tile on the surface.
    pub fn tile_rect(&self, tile: &FoodTile) -> (DVec2, DVec2) {
        let top_left = self.to_surface(DVec2::new(tile.x_min, tile.y_min + tile.width));
        let extent = DVec2::splat(tile.width) * self.scale;
        (top_left, extent)
    }

    /// Convert a world-unit length to pixels. Circles use the horizontal scale.
    pub fn length(&self, world: f64) -> f64 {
        world * self.scale.x
    }

    /// Turn a world-space direction into a surface-space one (y flipped).
    pub fn direction(&self, world: DVec2) -> DVec2 {
        DVec2::new(world.x, -world.y)
    }
}
