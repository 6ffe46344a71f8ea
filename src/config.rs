//! Client configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `worldview.ron` file (if exists)
//! 3. Environment variables prefixed with `WORLDVIEW_`
//!
//! Example environment variable: `WORLDVIEW_RENDER__LINE_WIDTH=2.0`

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::render::{Color, RenderStyle};

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub surface: SurfaceConfig,
}

/// Colors and stroke widths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub occupied_color: Color,
    pub empty_color: Color,
    pub creature_fill: Color,
    pub creature_outline: Color,
    /// Outline and heading line width in pixels
    pub line_width: f64,
    /// Color a headless surface is cleared to
    pub background: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let style = RenderStyle::default();
        Self {
            occupied_color: style.occupied_color,
            empty_color: style.empty_color,
            creature_fill: style.creature_fill,
            creature_outline: style.creature_outline,
            line_width: style.line_width,
            background: [0, 0, 0, 0],
        }
    }
}

impl RenderConfig {
    pub fn style(&self) -> RenderStyle {
        RenderStyle {
            occupied_color: self.occupied_color,
            empty_color: self.empty_color,
            creature_fill: self.creature_fill,
            creature_outline: self.creature_outline,
            line_width: self.line_width,
        }
    }
}

/// Headless surface dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 640,
        }
    }
}

impl ClientConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `worldview.ron` file (if exists)
    /// 3. Environment variables prefixed with `WORLDVIEW_` (highest priority)
    pub fn load() -> Result<Self> {
        Self::load_from("worldview")
    }

    /// Same as [`ClientConfig::load`] with a custom config file stem.
    pub fn load_from(file_stem: &str) -> Result<Self> {
        let defaults = Self::default();
        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("render.occupied_color", color_default(defaults.render.occupied_color))?
            .set_default("render.empty_color", color_default(defaults.render.empty_color))?
            .set_default("render.creature_fill", color_default(defaults.render.creature_fill))?
            .set_default(
                "render.creature_outline",
                color_default(defaults.render.creature_outline),
            )?
            .set_default("render.line_width", defaults.render.line_width)?
            .set_default("render.background", color_default(defaults.render.background))?
            .set_default("surface.width", defaults.surface.width as i64)?
            .set_default("surface.height", defaults.surface.height as i64)?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name(file_stem)
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (WORLDVIEW_SURFACE__WIDTH, etc.)
            .add_source(Environment::with_prefix("WORLDVIEW").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

fn color_default(color: Color) -> Vec<i64> {
    color.iter().map(|&channel| channel as i64).collect()
}
