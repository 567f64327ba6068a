pub mod calc;
pub mod config;
pub mod error;
pub mod hit;
pub mod models;
pub mod overlay;
pub mod places;
pub mod projection;
pub mod risk;
pub mod tiles;
pub mod viewport;

pub use config::MapConfig;
pub use error::MapError;
pub use models::{BoundingBox, DataPoint, MapStyle, ReadingSet, Region, RiskGrid, SelectedPoint, StationReading};
pub use viewport::{Viewport, ViewportState};
