//! Rendering - projects the world snapshot onto a 2D raster surface
//!
//! Every redraw is a full repaint: clear, food layer, then creatures on top.

mod renderer;
mod surface;
mod transform;

pub mod pixel_surface;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use pixel_surface::PixelSurface;
pub use renderer::Renderer;
pub use surface::{Bitmap, DrawingSurface};
pub use transform::WorldTransform;

use serde::{Deserialize, Serialize};

/// RGBA, 8 bits per channel, straight alpha.
pub type Color = [u8; 4];

/// Colors and stroke widths used by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Sub-cell containing food
    pub occupied_color: Color,
    /// Sub-cell without food
    pub empty_color: Color,
    /// Creature body; semi-transparent so food stays visible underneath
    pub creature_fill: Color,
    /// Creature outline and heading line
    pub creature_outline: Color,
    /// Stroke width in pixels
    pub line_width: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            occupied_color: [0x33, 0x66, 0x00, 255],
            empty_color: [255, 255, 255, 255],
            creature_fill: [255, 255, 255, 179],
            creature_outline: [0, 0, 0, 255],
            line_width: 3.0,
        }
    }
}
