use crate::models::{BoundingBox, MapStyle};
use crate::projection::{self, Projector};

pub const MIN_ZOOM: u8 = 3;
pub const MAX_ZOOM: u8 = 18;
pub const DEFAULT_ZOOM: u8 = 4;

/// Geographic centre of California, `(latitude, longitude)`.
pub const DEFAULT_CENTER: (f64, f64) = (36.7783, -119.4179);

/// Delay between the last viewport change and the redraw it triggers.
pub const REDRAW_DEBOUNCE_MS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub zoom_level: u8,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub map_style: MapStyle,
}

impl Default for ViewportState {
    fn default() -> Self {
        ViewportState {
            zoom_level: DEFAULT_ZOOM,
            center_latitude: DEFAULT_CENTER.0,
            center_longitude: DEFAULT_CENTER.1,
            map_style: MapStyle::Base,
        }
    }
}

/// Largest zoom in `[MIN_ZOOM, MAX_ZOOM]` at which `bbox` fits a `width` x `height`
/// surface. Falls back to `MIN_ZOOM` when even that is too small.
pub fn fit_zoom(bbox: &BoundingBox, width: f64, height: f64) -> u8 {
    (MIN_ZOOM..=MAX_ZOOM)
        .rev()
        .find(|&z| {
            let w = projection::lon_to_world_x(bbox.east(), z)
                - projection::lon_to_world_x(bbox.west(), z);
            let h = projection::lat_to_world_y(bbox.south(), z)
                - projection::lat_to_world_y(bbox.north(), z);
            w <= width && h <= height
        })
        .unwrap_or(MIN_ZOOM)
}

/// Current view plus the home view that `reset_view` returns to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    current: ViewportState,
    home: ViewportState,
}

impl Viewport {
    pub fn new(home: ViewportState) -> Self {
        Viewport {
            current: home,
            home,
        }
    }

    /// Initial view for a data extent: centred on the box, zoomed to fit it.
    pub fn for_bounds(bbox: &BoundingBox, width: f64, height: f64) -> Self {
        let (lat, lon) = bbox.center();
        Viewport::new(ViewportState {
            zoom_level: fit_zoom(bbox, width, height),
            center_latitude: lat,
            center_longitude: lon,
            map_style: MapStyle::Base,
        })
    }

    pub fn state(&self) -> &ViewportState {
        &self.current
    }

    pub fn home(&self) -> &ViewportState {
        &self.home
    }

    /// Returns `false` when already at `MAX_ZOOM`.
    pub fn zoom_in(&mut self) -> bool {
        if self.current.zoom_level >= MAX_ZOOM {
            return false;
        }
        self.current.zoom_level += 1;
        true
    }

    /// Returns `false` when already at `MIN_ZOOM`.
    pub fn zoom_out(&mut self) -> bool {
        if self.current.zoom_level <= MIN_ZOOM {
            return false;
        }
        self.current.zoom_level -= 1;
        true
    }

    /// Restore the home zoom and centre. The map style is a user preference and
    /// survives the reset.
    pub fn reset_view(&mut self) {
        let style = self.current.map_style;
        self.current = ViewportState {
            map_style: style,
            ..self.home
        };
    }

    /// Move the view so that content shifts by `(dx, dy)` screen pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64, width: f64, height: f64) {
        let projector = Projector::new(&self.current, width, height);
        let (lat, lon) = projector.unproject(width / 2.0 - dx, height / 2.0 - dy);
        let max_lat = crate::models::MAX_MERCATOR_LAT;
        self.current.center_latitude = lat.clamp(-max_lat, max_lat);
        self.current.center_longitude = (lon + 180.0).rem_euclid(360.0) - 180.0;
    }

    pub fn set_style(&mut self, style: MapStyle) {
        self.current.map_style = style;
    }
}
