//! CPU-based RGBA pixel buffer surface
//!
//! Used for headless frame capture and in tests. Shapes are rasterized by
//! sampling pixel centers; colors are composited source-over.

use glam::DVec2;

use super::{Bitmap, Color, DrawingSurface};

pub struct PixelSurface {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// RGBA pixel buffer (4 bytes per pixel)
    pub buffer: Vec<u8>,
    background: Color,
}

impl PixelSurface {
    /// Create a transparent surface of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            buffer: vec![0u8; width * height * 4],
            background: [0, 0, 0, 0],
        }
    }

    /// Color used by [`DrawingSurface::clear`]. Takes effect on the next clear.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        let idx = (y * self.width + x) * 4;
        [
            self.buffer[idx],
            self.buffer[idx + 1],
            self.buffer[idx + 2],
            self.buffer[idx + 3],
        ]
    }

    /// Number of pixels exactly equal to `color`.
    pub fn count_color(&self, color: Color) -> usize {
        self.buffer
            .chunks_exact(4)
            .filter(|pixel| *pixel == color.as_slice())
            .count()
    }

    /// Write the buffer to disk as a PNG.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> anyhow::Result<()> {
        use anyhow::Context;
        use image::{ImageBuffer, Rgba};

        let path = path.as_ref();
        let img: ImageBuffer<Rgba<u8>, _> =
            ImageBuffer::from_raw(self.width as u32, self.height as u32, self.buffer.clone())
                .context("Pixel buffer does not match surface dimensions")?;
        img.save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Composite `color` over the pixel at (x, y). Out-of-bounds writes are dropped.
    fn blend_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let dst = &mut self.buffer[idx..idx + 4];

        let src_a = color[3] as u32;
        if src_a == 255 {
            dst.copy_from_slice(&color);
            return;
        }
        if src_a == 0 {
            return;
        }

        let dst_a = dst[3] as u32;
        // Alpha in 0..=255 * 255 fixed point.
        let out_a = src_a * 255 + dst_a * (255 - src_a);
        if out_a == 0 {
            dst.copy_from_slice(&[0, 0, 0, 0]);
            return;
        }
        for channel in 0..3 {
            let src = color[channel] as u32 * src_a * 255;
            let below = dst[channel] as u32 * dst_a * (255 - src_a);
            dst[channel] = ((src + below + out_a / 2) / out_a) as u8;
        }
        dst[3] = ((out_a + 127) / 255) as u8;
    }

    /// Visit the pixels whose centers fall in the box spanned by `min`/`max`.
    fn covered_pixels(&self, min: DVec2, max: DVec2) -> impl Iterator<Item = (i64, i64)> {
        let x0 = (min.x - 0.5).ceil().max(0.0) as i64;
        let y0 = (min.y - 0.5).ceil().max(0.0) as i64;
        let x1 = ((max.x - 0.5).floor() as i64).min(self.width as i64 - 1);
        let y1 = ((max.y - 0.5).floor() as i64).min(self.height as i64 - 1);
        (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| (x, y)))
    }

    fn paint_where(
        &mut self,
        min: DVec2,
        max: DVec2,
        color: Color,
        inside: impl Fn(DVec2) -> bool,
    ) {
        let pixels: Vec<(i64, i64)> = self
            .covered_pixels(min, max)
            .filter(|&(x, y)| inside(DVec2::new(x as f64 + 0.5, y as f64 + 0.5)))
            .collect();
        for (x, y) in pixels {
            self.blend_pixel(x, y, color);
        }
    }
}

impl DrawingSurface for PixelSurface {
    fn width(&self) -> f64 {
        self.width as f64
    }

    fn height(&self) -> f64 {
        self.height as f64
    }

    fn clear(&mut self) {
        let background = self.background;
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&background);
        }
    }

    fn draw_block(&mut self, bitmap: &Bitmap, dest_x: f64, dest_y: f64, dest_w: f64, dest_h: f64) {
        if dest_w <= 0.0 || dest_h <= 0.0 {
            return;
        }
        let origin = DVec2::new(dest_x, dest_y);
        let extent = DVec2::new(dest_w, dest_h);
        let cells = Bitmap::SIZE as f64;
        let last = Bitmap::SIZE - 1;

        let pixels: Vec<(i64, i64)> = self.covered_pixels(origin, origin + extent).collect();
        for (x, y) in pixels {
            let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
            // Nearest source texel.
            let uv = (center - origin) / extent * cells;
            let col = (uv.x.floor() as usize).min(last);
            let row = (uv.y.floor() as usize).min(last);
            self.blend_pixel(x, y, bitmap.pixel(col, row));
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        let reach = DVec2::splat(radius);
        self.paint_where(center - reach, center + reach, color, |p| {
            p.distance_squared(center) <= radius * radius
        });
    }

    fn stroke_circle(&mut self, center: DVec2, radius: f64, line_width: f64, color: Color) {
        let half = line_width.max(1.0) / 2.0;
        let reach = DVec2::splat(radius + half);
        self.paint_where(center - reach, center + reach, color, |p| {
            (p.distance(center) - radius).abs() <= half
        });
    }

    fn draw_line(&mut self, from: DVec2, to: DVec2, line_width: f64, color: Color) {
        let half = line_width.max(1.0) / 2.0;
        let reach = DVec2::splat(half);
        let span = to - from;
        let length_squared = span.length_squared();
        self.paint_where(from.min(to) - reach, from.max(to) + reach, color, |p| {
            let t = if length_squared > 0.0 {
                ((p - from).dot(span) / length_squared).clamp(0.0, 1.0)
            } else {
                0.0
            };
            p.distance(from + span * t) <= half
        });
    }
}
