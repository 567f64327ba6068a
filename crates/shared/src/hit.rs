//! Click selection: linear nearest-point scan in screen space.

use crate::models::{DataPoint, SelectedPoint};
use crate::projection::Projector;

/// Maximum click distance, in screen pixels, that still selects a point.
pub const HIT_TOLERANCE_PX: f64 = 20.0;

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Index of the position nearest to `click` if it is closer than `tolerance`.
/// On equal distances the earliest index wins.
pub fn nearest_within(
    positions: impl IntoIterator<Item = (f64, f64)>,
    click: (f64, f64),
    tolerance: f64,
) -> Option<usize> {
    let mut best_idx = None;
    let mut best_dist = tolerance;
    for (i, pos) in positions.into_iter().enumerate() {
        let d = distance(pos, click);
        if d < best_dist || (best_idx.is_none() && d == 0.0) {
            best_dist = d;
            best_idx = Some(i);
        }
    }
    best_idx
}

/// Select the data point under a click, or `None` to clear the selection.
pub fn hit_test(
    cells: &[DataPoint],
    projector: &Projector,
    click: (f64, f64),
    tolerance: f64,
) -> Option<SelectedPoint> {
    let positions = cells
        .iter()
        .map(|c| projector.project(c.latitude, c.longitude));
    let index = nearest_within(positions, click, tolerance)?;
    let (screen_x, screen_y) = projector.project(cells[index].latitude, cells[index].longitude);
    Some(SelectedPoint {
        index,
        screen_x,
        screen_y,
    })
}

/// Refresh a selection's screen position for a new view. `None` when the
/// index no longer refers to a point.
pub fn reproject(
    selected: SelectedPoint,
    cells: &[DataPoint],
    projector: &Projector,
) -> Option<SelectedPoint> {
    let cell = cells.get(selected.index)?;
    let (screen_x, screen_y) = projector.project(cell.latitude, cell.longitude);
    Some(SelectedPoint {
        index: selected.index,
        screen_x,
        screen_y,
    })
}
