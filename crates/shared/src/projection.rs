//! Spherical Web-Mercator projection between lat/lon and screen pixels.
//!
//! World pixels: the whole world is a square `TILE_SIZE * 2^zoom` wide with the
//! origin at the north-west corner (lon -180, lat ~85.05). Screen pixels: the
//! viewport centre sits at `(width / 2, height / 2)`.

use std::f64::consts::PI;

use crate::viewport::ViewportState;

/// Edge length of one raster tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Width (and height) of the world in pixels at `zoom`.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * 2f64.powi(zoom as i32)
}

pub fn lon_to_world_x(lon: f64, zoom: u8) -> f64 {
    (lon + 180.0) / 360.0 * world_size(zoom)
}

/// `Y = (1 - ln(tan(lat) + sec(lat)) / π) / 2`, scaled to the world.
///
/// Not guarded near the poles, where the terms diverge.
pub fn lat_to_world_y(lat: f64, zoom: u8) -> f64 {
    let rad = lat.to_radians();
    let merc = (rad.tan() + 1.0 / rad.cos()).ln();
    (1.0 - merc / PI) / 2.0 * world_size(zoom)
}

/// Inverse of the forward projection: world pixel to `(latitude, longitude)`.
pub fn world_to_lat_lon(x: f64, y: f64, zoom: u8) -> (f64, f64) {
    let size = world_size(zoom);
    let lon = x / size * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y / size)).sinh().atan().to_degrees();
    (lat, lon)
}

/// Screen pixel of a point for a viewport centred on `(center_lat, center_lon)`.
///
/// No clamping: points outside the viewport come back off-screen.
pub fn project(
    lat: f64,
    lon: f64,
    zoom: u8,
    center_lat: f64,
    center_lon: f64,
    width: f64,
    height: f64,
) -> (f64, f64) {
    let x = lon_to_world_x(lon, zoom) - lon_to_world_x(center_lon, zoom) + width / 2.0;
    let y = lat_to_world_y(lat, zoom) - lat_to_world_y(center_lat, zoom) + height / 2.0;
    (x, y)
}

/// A viewport frozen for one draw pass, with the centre's world position cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    zoom: u8,
    center_world_x: f64,
    center_world_y: f64,
    width: f64,
    height: f64,
}

impl Projector {
    pub fn new(state: &ViewportState, width: f64, height: f64) -> Self {
        Projector {
            zoom: state.zoom_level,
            center_world_x: lon_to_world_x(state.center_longitude, state.zoom_level),
            center_world_y: lat_to_world_y(state.center_latitude, state.zoom_level),
            width,
            height,
        }
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// World pixel shown at the top-left corner of the surface.
    pub fn origin(&self) -> (f64, f64) {
        (
            self.center_world_x - self.width / 2.0,
            self.center_world_y - self.height / 2.0,
        )
    }

    pub fn world_to_screen(&self, world_x: f64, world_y: f64) -> (f64, f64) {
        let (ox, oy) = self.origin();
        (world_x - ox, world_y - oy)
    }

    pub fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
        self.world_to_screen(lon_to_world_x(lon, self.zoom), lat_to_world_y(lat, self.zoom))
    }

    /// Screen pixel back to `(latitude, longitude)`.
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let (ox, oy) = self.origin();
        world_to_lat_lon(ox + x, oy + y, self.zoom)
    }

    pub fn is_on_screen(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x <= self.width && y >= 0.0 && y <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MapStyle;

    fn view(zoom: u8, lat: f64, lon: f64) -> ViewportState {
        ViewportState {
            zoom_level: zoom,
            center_latitude: lat,
            center_longitude: lon,
            map_style: MapStyle::Base,
        }
    }

    #[test]
    fn test_world_origin_and_equator() {
        assert!((lon_to_world_x(-180.0, 0) - 0.0).abs() < 1e-9);
        assert!((lon_to_world_x(0.0, 0) - 128.0).abs() < 1e-9);
        assert!((lat_to_world_y(0.0, 0) - 128.0).abs() < 1e-9);
        assert!((world_size(2) - 1024.0).abs() < 1e-9);
    }

    #[test]
    fn test_north_is_up() {
        assert!(lat_to_world_y(40.0, 5) < lat_to_world_y(30.0, 5));
    }

    #[test]
    fn test_center_projects_to_viewport_middle() {
        let (x, y) = project(34.0, -118.0, 9, 34.0, -118.0, 960.0, 600.0);
        assert!((x - 480.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_project_is_deterministic() {
        for zoom in 0..=18 {
            let a = project(37.77, -122.42, zoom, 36.0, -119.0, 800.0, 600.0);
            let b = project(37.77, -122.42, zoom, 36.0, -119.0, 800.0, 600.0);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_project_does_not_clamp() {
        let (x, _) = project(34.0, 10.0, 6, 34.0, -118.0, 960.0, 600.0);
        assert!(x > 960.0);
    }

    #[test]
    fn test_projector_matches_free_function() {
        let state = view(7, 36.5, -119.5);
        let p = Projector::new(&state, 960.0, 600.0);
        let (ax, ay) = p.project(34.05, -118.24);
        let (bx, by) = project(34.05, -118.24, 7, 36.5, -119.5, 960.0, 600.0);
        assert!((ax - bx).abs() < 1e-9);
        assert!((ay - by).abs() < 1e-9);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let p = Projector::new(&view(10, 34.0, -118.0), 960.0, 600.0);
        let (x, y) = p.project(34.2, -118.3);
        let (lat, lon) = p.unproject(x, y);
        assert!((lat - 34.2).abs() < 1e-9);
        assert!((lon - -118.3).abs() < 1e-9);
    }

    #[test]
    fn test_is_on_screen() {
        let p = Projector::new(&view(4, 0.0, 0.0), 100.0, 50.0);
        assert!(p.is_on_screen(0.0, 0.0));
        assert!(p.is_on_screen(100.0, 50.0));
        assert!(!p.is_on_screen(-0.5, 10.0));
        assert!(!p.is_on_screen(10.0, 50.5));
    }
}
