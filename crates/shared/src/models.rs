use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Latitude limit of the square Web-Mercator world.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// Extent shown before any region data is available.
pub const CALIFORNIA: BoundingBox = BoundingBox {
    west: -124.48,
    south: 32.53,
    east: -114.13,
    north: 42.01,
};

/// Geographic extent as `[west, south, east, north]` in degrees.
///
/// Serialized as a plain 4-element array, the shape the data files use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, MapError> {
        let invalid = |reason| MapError::InvalidBoundingBox {
            west,
            south,
            east,
            north,
            reason,
        };
        if ![west, south, east, north].iter().all(|v| v.is_finite()) {
            return Err(invalid("coordinates must be finite"));
        }
        if west >= east {
            return Err(invalid("west must be less than east"));
        }
        if south >= north {
            return Err(invalid("south must be less than north"));
        }
        if south < -MAX_MERCATOR_LAT || north > MAX_MERCATOR_LAT {
            return Err(invalid("latitude outside the Web-Mercator range"));
        }
        if west < -180.0 || east > 180.0 {
            return Err(invalid("longitude outside [-180, 180]"));
        }
        Ok(BoundingBox {
            west,
            south,
            east,
            north,
        })
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    /// Midpoint as `(latitude, longitude)`.
    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = MapError;

    fn try_from([west, south, east, north]: [f64; 4]) -> Result<Self, Self::Error> {
        BoundingBox::new(west, south, east, north)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.west, b.south, b.east, b.north]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub risk_score: f64,
    pub risk_class: String,
}

/// Everything the map needs for one render: an extent and the points inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskGrid {
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub cells: Vec<DataPoint>,
}

impl RiskGrid {
    pub fn empty(bounding_box: BoundingBox) -> Self {
        RiskGrid {
            bounding_box,
            cells: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    #[default]
    Base,
    Satellite,
}

impl MapStyle {
    pub fn toggled(self) -> Self {
        match self {
            MapStyle::Base => MapStyle::Satellite,
            MapStyle::Satellite => MapStyle::Base,
        }
    }
}

impl std::fmt::Display for MapStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapStyle::Base => write!(f, "base"),
            MapStyle::Satellite => write!(f, "satellite"),
        }
    }
}

impl FromStr for MapStyle {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(MapStyle::Base),
            "satellite" => Ok(MapStyle::Satellite),
            other => Err(MapError::UnknownMapStyle(other.to_string())),
        }
    }
}

/// The point under the last click, with where it was drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedPoint {
    pub index: usize,
    pub screen_x: f64,
    pub screen_y: f64,
}

/// Raw pollutant concentrations reported by one monitoring station.
/// PM values are µg/m³, gases are ppb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationReading {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub pm25: Option<f64>,
    #[serde(default)]
    pub pm10: Option<f64>,
    #[serde(default)]
    pub o3: Option<f64>,
    #[serde(default)]
    pub no2: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSet {
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub readings: Vec<StationReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    pub display_name: String,
    pub bounding_box: BoundingBox,
    pub data_file: String,
}
