use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("invalid bounding box [{west}, {south}, {east}, {north}]: {reason}")]
    InvalidBoundingBox {
        west: f64,
        south: f64,
        east: f64,
        north: f64,
        reason: &'static str,
    },
    #[error("unknown map style: {0}")]
    UnknownMapStyle(String),
}
