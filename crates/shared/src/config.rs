use serde::{Deserialize, Serialize};

use crate::hit::HIT_TOLERANCE_PX;
use crate::tiles::TileSources;
use crate::viewport::REDRAW_DEBOUNCE_MS;

/// Renderer settings. Every field has a default, so a partial JSON object (or
/// `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub hit_tolerance_px: f64,
    pub redraw_debounce_ms: u32,
    pub min_marker_radius: f64,
    pub max_marker_radius: f64,
    /// Fill for tiles that failed to load.
    pub placeholder_color: String,
    pub tiles: TileSources,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            canvas_width: 960,
            canvas_height: 600,
            hit_tolerance_px: HIT_TOLERANCE_PX,
            redraw_debounce_ms: REDRAW_DEBOUNCE_MS,
            min_marker_radius: 6.0,
            max_marker_radius: 14.0,
            placeholder_color: "#e5e7eb".to_string(),
            tiles: TileSources::default(),
        }
    }
}

impl MapConfig {
    pub fn width(&self) -> f64 {
        self.canvas_width as f64
    }

    pub fn height(&self) -> f64 {
        self.canvas_height as f64
    }
}
