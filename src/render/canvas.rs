//! `DrawingSurface` backed by a browser `<canvas>` 2D context

use glam::DVec2;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use super::{Bitmap, Color, DrawingSurface};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Off-screen 8x8 canvas each food bitmap is staged on before scaling
    scratch: HtmlCanvasElement,
    scratch_ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Attach to the canvas element with the given DOM id.
    pub fn from_element_id(id: &str) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("No document available"))?;

        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("No element with id '{}'", id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("Element '{}' is not a canvas", id)))?;

        let scratch = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("Failed to create scratch canvas"))?;
        scratch.set_width(Bitmap::SIZE as u32);
        scratch.set_height(Bitmap::SIZE as u32);

        Self::new(canvas, scratch)
    }

    pub fn new(canvas: HtmlCanvasElement, scratch: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        let scratch_ctx = context_2d(&scratch)?;
        Ok(Self {
            canvas,
            ctx,
            scratch,
            scratch_ctx,
        })
    }

    fn stroke_with(&self, line_width: f64, color: Color) {
        self.ctx.set_line_width(line_width);
        self.ctx.set_stroke_style_str(&css_color(color));
        self.ctx.stroke();
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("Unexpected context type"))
}

fn css_color([r, g, b, a]: Color) -> String {
    format!("rgba({}, {}, {}, {:.3})", r, g, b, a as f64 / 255.0)
}

impl DrawingSurface for CanvasSurface {
    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    fn draw_block(&mut self, bitmap: &Bitmap, dest_x: f64, dest_y: f64, dest_w: f64, dest_h: f64) {
        let bytes = bitmap.to_rgba_bytes();
        let size = Bitmap::SIZE as u32;
        let result = ImageData::new_with_u8_clamped_array_and_sh(Clamped(bytes.as_slice()), size, size)
            .and_then(|image| self.scratch_ctx.put_image_data(&image, 0.0, 0.0))
            .and_then(|()| {
                self.ctx.set_image_smoothing_enabled(false);
                self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                    &self.scratch,
                    dest_x,
                    dest_y,
                    dest_w,
                    dest_h,
                )
            });
        if let Err(e) = result {
            log::warn!("Failed to draw food block: {:?}", e);
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        self.ctx.begin_path();
        if let Err(e) = self
            .ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
        {
            log::warn!("Failed to trace circle: {:?}", e);
            return;
        }
        self.ctx.set_fill_style_str(&css_color(color));
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: DVec2, radius: f64, line_width: f64, color: Color) {
        self.ctx.begin_path();
        if let Err(e) = self
            .ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
        {
            log::warn!("Failed to trace circle: {:?}", e);
            return;
        }
        self.stroke_with(line_width, color);
    }

    fn draw_line(&mut self, from: DVec2, to: DVec2, line_width: f64, color: Color) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.stroke_with(line_width, color);
    }
}
