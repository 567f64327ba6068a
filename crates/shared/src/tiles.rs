use serde::{Deserialize, Serialize};

use crate::models::MapStyle;
use crate::projection::{Projector, TILE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// A tile and where its top-left corner lands on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub tile: TileIndex,
    pub screen_x: f64,
    pub screen_y: f64,
}

/// Inclusive range of unwrapped tile indices covering the surface.
/// X may run past either edge of the world; Y may run past the poles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub zoom: u8,
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

pub fn visible_tile_range(projector: &Projector) -> TileRange {
    let (ox, oy) = projector.origin();
    let to_index = |px: f64| (px / TILE_SIZE).floor() as i64;
    TileRange {
        zoom: projector.zoom(),
        min_x: to_index(ox),
        max_x: to_index(ox + projector.width()),
        min_y: to_index(oy),
        max_y: to_index(oy + projector.height()),
    }
}

impl TileRange {
    /// Tiles to fetch with their screen offsets, row by row from the top-left.
    pub fn placements(&self, projector: &Projector) -> Vec<TilePlacement> {
        let tiles_per_axis = 1i64 << self.zoom;
        let mut out = Vec::new();
        for y in self.min_y..=self.max_y {
            // No tiles above or below the world.
            if y < 0 || y >= tiles_per_axis {
                continue;
            }
            for x in self.min_x..=self.max_x {
                let (screen_x, screen_y) =
                    projector.world_to_screen(x as f64 * TILE_SIZE, y as f64 * TILE_SIZE);
                out.push(TilePlacement {
                    tile: TileIndex {
                        z: self.zoom,
                        x: x.rem_euclid(tiles_per_axis) as u32,
                        y: y as u32,
                    },
                    screen_x,
                    screen_y,
                });
            }
        }
        out
    }
}

/// URL templates per map style; `{z}`, `{x}` and `{y}` are substituted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TileSources {
    pub base: String,
    pub satellite: String,
}

impl Default for TileSources {
    fn default() -> Self {
        TileSources {
            base: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            // Esri orders row before column.
            satellite:
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
                    .to_string(),
        }
    }
}

impl TileSources {
    pub fn template(&self, style: MapStyle) -> &str {
        match style {
            MapStyle::Base => &self.base,
            MapStyle::Satellite => &self.satellite,
        }
    }

    pub fn tile_url(&self, style: MapStyle, tile: TileIndex) -> String {
        expand_template(self.template(style), tile)
    }
}

pub fn expand_template(template: &str, tile: TileIndex) -> String {
    template
        .replace("{z}", &tile.z.to_string())
        .replace("{x}", &tile.x.to_string())
        .replace("{y}", &tile.y.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileOutcome {
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadProgress {
    /// The event belongs to a superseded draw pass.
    Stale,
    Pending,
    /// Every tile of the pass has settled; reported once.
    Complete,
}

/// Counts settled tile loads for the current draw pass.
///
/// Each pass gets a new generation; events from older passes are ignored so a
/// slow tile can neither draw over nor complete a newer pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileLoadTracker {
    generation: u64,
    total: usize,
    loaded: usize,
    failed: usize,
}

impl TileLoadTracker {
    pub fn begin(&mut self, total: usize) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.total = total;
        self.loaded = 0;
        self.failed = 0;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn settled(&self) -> usize {
        self.loaded + self.failed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.settled() >= self.total
    }

    pub fn record(&mut self, generation: u64, outcome: TileOutcome) -> LoadProgress {
        if generation != self.generation || self.is_complete() {
            return LoadProgress::Stale;
        }
        match outcome {
            TileOutcome::Loaded => self.loaded += 1,
            TileOutcome::Failed => self.failed += 1,
        }
        if self.is_complete() {
            LoadProgress::Complete
        } else {
            LoadProgress::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::ViewportState;

    fn projector(zoom: u8, lat: f64, lon: f64, w: f64, h: f64) -> Projector {
        Projector::new(
            &ViewportState {
                zoom_level: zoom,
                center_latitude: lat,
                center_longitude: lon,
                map_style: MapStyle::Base,
            },
            w,
            h,
        )
    }

    #[test]
    fn test_range_covers_viewport() {
        let p = projector(8, 34.0, -118.0, 960.0, 600.0);
        let range = visible_tile_range(&p);
        let (ox, oy) = p.origin();
        assert!(range.min_x as f64 * TILE_SIZE <= ox);
        assert!((range.max_x + 1) as f64 * TILE_SIZE >= ox + 960.0);
        assert!(range.min_y as f64 * TILE_SIZE <= oy);
        assert!((range.max_y + 1) as f64 * TILE_SIZE >= oy + 600.0);
        // 960 px needs 4 or 5 columns of 256 px tiles.
        let cols = range.max_x - range.min_x + 1;
        assert!((4..=5).contains(&cols));
    }

    #[test]
    fn test_placements_are_tile_aligned() {
        let p = projector(8, 34.0, -118.0, 960.0, 600.0);
        let placements = visible_tile_range(&p).placements(&p);
        assert!(!placements.is_empty());
        let first = placements[0];
        assert!(first.screen_x <= 0.0 && first.screen_x > -TILE_SIZE);
        assert!(first.screen_y <= 0.0 && first.screen_y > -TILE_SIZE);
        for pair in placements.windows(2) {
            if pair[0].tile.y == pair[1].tile.y {
                assert!((pair[1].screen_x - pair[0].screen_x - TILE_SIZE).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_placements_wrap_antimeridian() {
        let p = projector(3, 0.0, 179.0, 960.0, 600.0);
        let placements = visible_tile_range(&p).placements(&p);
        let max_index = (1u32 << 3) - 1;
        assert!(placements.iter().all(|t| t.tile.x <= max_index));
        assert!(placements.iter().any(|t| t.tile.x == 0));
        assert!(placements.iter().any(|t| t.tile.x == max_index));
    }

    #[test]
    fn test_placements_skip_rows_beyond_poles() {
        let p = projector(3, 80.0, 0.0, 512.0, 2048.0);
        let placements = visible_tile_range(&p).placements(&p);
        assert!(placements.iter().all(|t| t.tile.y < 8));
        assert!(placements.iter().any(|t| t.tile.y == 0));
    }

    #[test]
    fn test_tile_url_templates() {
        let sources = TileSources::default();
        let tile = TileIndex { z: 9, x: 88, y: 205 };
        assert_eq!(
            sources.tile_url(MapStyle::Base, tile),
            "https://tile.openstreetmap.org/9/88/205.png"
        );
        assert!(sources
            .tile_url(MapStyle::Satellite, tile)
            .ends_with("/tile/9/205/88"));
    }

    #[test]
    fn test_tile_sources_partial_config() {
        let sources: TileSources =
            serde_json::from_str(r#"{"base":"http://localhost/{z}/{x}/{y}.png"}"#).unwrap();
        assert_eq!(sources.base, "http://localhost/{z}/{x}/{y}.png");
        assert_eq!(sources.satellite, TileSources::default().satellite);
    }

    #[test]
    fn test_tracker_completes_after_all_settle() {
        let mut t = TileLoadTracker::default();
        let pass = t.begin(3);
        assert_eq!(t.record(pass, TileOutcome::Loaded), LoadProgress::Pending);
        assert_eq!(t.record(pass, TileOutcome::Failed), LoadProgress::Pending);
        assert_eq!(t.record(pass, TileOutcome::Loaded), LoadProgress::Complete);
        assert_eq!(t.failed(), 1);
    }

    #[test]
    fn test_tracker_failures_never_block_completion() {
        let mut t = TileLoadTracker::default();
        let pass = t.begin(2);
        t.record(pass, TileOutcome::Failed);
        assert_eq!(t.record(pass, TileOutcome::Failed), LoadProgress::Complete);
    }

    #[test]
    fn test_tracker_ignores_stale_generation() {
        let mut t = TileLoadTracker::default();
        let old = t.begin(2);
        let new = t.begin(1);
        assert_eq!(t.record(old, TileOutcome::Loaded), LoadProgress::Stale);
        assert_eq!(t.settled(), 0);
        assert_eq!(t.record(new, TileOutcome::Loaded), LoadProgress::Complete);
    }

    #[test]
    fn test_tracker_reports_complete_once() {
        let mut t = TileLoadTracker::default();
        let pass = t.begin(1);
        assert_eq!(t.record(pass, TileOutcome::Loaded), LoadProgress::Complete);
        assert_eq!(t.record(pass, TileOutcome::Loaded), LoadProgress::Stale);
    }

    #[test]
    fn test_tracker_empty_pass_is_complete() {
        let mut t = TileLoadTracker::default();
        t.begin(0);
        assert!(t.is_complete());
    }
}
