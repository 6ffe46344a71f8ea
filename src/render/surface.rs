//! The drawing target abstraction the renderer paints onto.

use glam::DVec2;

use super::{Color, RenderStyle};
use crate::world::{FoodTile, FOOD_TILE_CELLS};

/// A raster target with its origin at the top-left corner, y growing down.
///
/// The renderer never creates or owns a surface; one is handed in for the
/// duration of each redraw.
pub trait DrawingSurface {
    fn width(&self) -> f64;

    fn height(&self) -> f64;

    /// Reset every pixel to the background.
    fn clear(&mut self);

    /// Blit `bitmap` stretched into the destination rectangle with
    /// nearest-neighbor sampling, never interpolated.
    fn draw_block(&mut self, bitmap: &Bitmap, dest_x: f64, dest_y: f64, dest_w: f64, dest_h: f64);

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color);

    fn stroke_circle(&mut self, center: DVec2, radius: f64, line_width: f64, color: Color);

    fn draw_line(&mut self, from: DVec2, to: DVec2, line_width: f64, color: Color);
}

/// An 8x8 block of colors in surface orientation (row 0 is the top row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pixels: [[Color; FOOD_TILE_CELLS]; FOOD_TILE_CELLS],
}

impl Bitmap {
    pub const SIZE: usize = FOOD_TILE_CELLS;

    pub fn filled(color: Color) -> Self {
        Self {
            pixels: [[color; FOOD_TILE_CELLS]; FOOD_TILE_CELLS],
        }
    }

    /// Color a food tile's occupancy matrix.
    ///
    /// The matrix stores its bottom row first; the bitmap stores its top row
    /// first, so rows are flipped here.
    pub fn from_food_tile(tile: &FoodTile, style: &RenderStyle) -> Self {
        let mut bitmap = Self::filled(style.empty_color);
        for (row, cells) in tile.values.iter().enumerate() {
            let y = FOOD_TILE_CELLS - 1 - row;
            for (x, &occupied) in cells.iter().enumerate() {
                if occupied {
                    bitmap.pixels[y][x] = style.occupied_color;
                }
            }
        }
        bitmap
    }

    /// Color at column `x`, row `y` (top-down).
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y][x]
    }

    /// Row-major RGBA bytes, top row first.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().flatten().copied().collect()
    }
}
