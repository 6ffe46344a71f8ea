//! # worldview - live view of a remote food/creature world
//!
//! Mirrors the world streamed by the simulation server (a food-density grid
//! plus moving creatures) and paints it onto a 2D raster surface.
//!
//! Inbound messages are decoded into partial [`world::WorldUpdate`]s, merged
//! field-by-field into the session's [`world::StateStore`], and every accepted
//! change triggers one full repaint through [`render::Renderer`].

#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod error;
pub mod protocol;
pub mod render;
#[cfg(not(target_arch = "wasm32"))]
pub mod replay;
pub mod session;
pub mod world;

pub use error::ViewError;
pub use session::Session;

/// One-line import of the types needed to drive a session and inspect
/// what it drew, for embedders and integration tests.
pub mod prelude {
    pub use crate::error::{Result, ViewError};
    pub use crate::protocol::{ServerMessage, WorldRequest};
    pub use crate::render::{DrawingSurface, PixelSurface, RenderStyle, Renderer};
    pub use crate::session::Session;
    pub use crate::world::{Creature, FoodTile, StateStore, WorldSnapshot, WorldUpdate};
    pub use glam::DVec2;
}

// WASM entry point
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    // Set up panic hook for better error messages in the browser console
    console_error_panic_hook::set_once();

    // Initialize logging for WASM
    console_log::init_with_level(log::Level::Info).ok();

    log::info!("worldview WASM module initialized");
}

/// Handle given to the page script. The script owns the WebSocket and feeds
/// every text frame to [`WorldView::handle_message`].
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct WorldView {
    session: Session<render::canvas::CanvasSurface>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl WorldView {
    /// Bind to the `<canvas>` with the given element id.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WorldView, JsValue> {
        let surface = render::canvas::CanvasSurface::from_element_id(canvas_id)?;
        let mut session = Session::new(render::Renderer::default());
        session.attach_surface(surface);
        log::info!("Attached world view to #{}", canvas_id);
        Ok(WorldView { session })
    }

    /// Apply one server message. Returns a JSON request the caller should
    /// send back to the server, if any.
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&mut self, text: &str) -> Result<Option<String>, JsValue> {
        let reply = self
            .session
            .on_message(text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        reply
            .map(|request| request.encode())
            .transpose()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Encoded request advancing the simulation by `steps`.
    #[wasm_bindgen(js_name = iterateRequest)]
    pub fn iterate_request(steps: u32) -> Result<String, JsValue> {
        protocol::WorldRequest::iterate(steps)
            .encode()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Encoded request resetting the simulation.
    #[wasm_bindgen(js_name = resetRequest)]
    pub fn reset_request() -> Result<String, JsValue> {
        protocol::WorldRequest::reset()
            .encode()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Repaint the current snapshot, e.g. after the canvas was resized.
    pub fn redraw(&mut self) -> Result<bool, JsValue> {
        self.session
            .redraw()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
