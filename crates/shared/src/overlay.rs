//! Draw plan for the data layer.
//!
//! The plan is computed without touching a canvas so that ordering and sizing
//! can be checked on the host. The painter walks the commands in order.

use crate::config::MapConfig;
use crate::models::DataPoint;
use crate::places::KNOWN_PLACES;
use crate::projection::Projector;
use crate::risk::{halo_radius, marker_radius};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Radial gradient from `color` at the centre to transparent at `radius`.
    Halo {
        x: f64,
        y: f64,
        radius: f64,
        color: String,
    },
    Marker {
        index: usize,
        x: f64,
        y: f64,
        radius: f64,
        fill: String,
        selected: bool,
    },
    /// Text anchored at its centre, drawn on a background box.
    Label { x: f64, y: f64, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub min_marker_radius: f64,
    pub max_marker_radius: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        OverlayStyle::from(&MapConfig::default())
    }
}

impl From<&MapConfig> for OverlayStyle {
    fn from(config: &MapConfig) -> Self {
        let (lo, hi) = if config.min_marker_radius <= config.max_marker_radius {
            (config.min_marker_radius, config.max_marker_radius)
        } else {
            (config.max_marker_radius, config.min_marker_radius)
        };
        OverlayStyle {
            min_marker_radius: lo,
            max_marker_radius: hi,
        }
    }
}

/// Halos for every point, then markers for every point, then place labels.
///
/// Points are not culled; off-screen ones simply land outside the surface.
/// Labels whose anchor is off the surface are skipped.
pub fn build_overlay(
    cells: &[DataPoint],
    projector: &Projector,
    selected: Option<usize>,
    risk_color: impl Fn(f64) -> String,
    style: &OverlayStyle,
) -> Vec<DrawCommand> {
    let positioned: Vec<_> = cells
        .iter()
        .map(|c| {
            let (x, y) = projector.project(c.latitude, c.longitude);
            (x, y, c.risk_score, risk_color(c.risk_score))
        })
        .collect();

    let mut commands = Vec::with_capacity(cells.len() * 2 + KNOWN_PLACES.len());

    commands.extend(
        positioned
            .iter()
            .map(|(x, y, score, color)| DrawCommand::Halo {
                x: *x,
                y: *y,
                radius: halo_radius(*score),
                color: color.clone(),
            }),
    );

    commands.extend(
        positioned
            .into_iter()
            .enumerate()
            .map(|(index, (x, y, score, fill))| DrawCommand::Marker {
                index,
                x,
                y,
                radius: marker_radius(score, style.min_marker_radius, style.max_marker_radius),
                fill,
                selected: selected == Some(index),
            }),
    );

    for place in KNOWN_PLACES.iter() {
        let (x, y) = projector.project(place.latitude, place.longitude);
        if projector.is_on_screen(x, y) {
            commands.push(DrawCommand::Label {
                x,
                y,
                text: place.name.to_string(),
            });
        }
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::{default_risk_color, GREEN, ORANGE, RED, YELLOW};
    use crate::viewport::{Viewport, ViewportState};
    use crate::models::BoundingBox;

    fn point(lat: f64, lon: f64, score: f64) -> DataPoint {
        DataPoint {
            latitude: lat,
            longitude: lon,
            risk_score: score,
            risk_class: String::new(),
        }
    }

    fn la_projector() -> Projector {
        let state = ViewportState {
            zoom_level: 8,
            center_latitude: 34.0,
            center_longitude: -118.0,
            ..ViewportState::default()
        };
        Projector::new(&state, 960.0, 600.0)
    }

    fn markers(commands: &[DrawCommand]) -> Vec<(usize, String, bool)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Marker {
                    index,
                    fill,
                    selected,
                    ..
                } => Some((*index, fill.clone(), *selected)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_halos_before_markers_before_labels() {
        let cells = vec![
            point(34.05, -118.24, 80.0),
            point(33.77, -118.19, 10.0),
            point(34.0, -117.4, 50.0),
        ];
        let commands = build_overlay(
            &cells,
            &la_projector(),
            None,
            default_risk_color,
            &OverlayStyle::default(),
        );
        let rank = |c: &DrawCommand| match c {
            DrawCommand::Halo { .. } => 0,
            DrawCommand::Marker { .. } => 1,
            DrawCommand::Label { .. } => 2,
        };
        for pair in commands.windows(2) {
            assert!(rank(&pair[0]) <= rank(&pair[1]));
        }
        assert_eq!(commands.iter().filter(|c| rank(c) == 0).count(), 3);
        assert_eq!(markers(&commands).len(), 3);
    }

    #[test]
    fn test_marker_colors_follow_buckets() {
        let cells = vec![
            point(34.0, -118.0, 12.0),
            point(34.0, -118.0, 30.0),
            point(34.0, -118.0, 45.0),
            point(34.0, -118.0, 70.0),
        ];
        let commands = build_overlay(
            &cells,
            &la_projector(),
            None,
            default_risk_color,
            &OverlayStyle::default(),
        );
        let fills: Vec<_> = markers(&commands).into_iter().map(|m| m.1).collect();
        assert_eq!(fills, vec![GREEN, YELLOW, ORANGE, RED]);
    }

    #[test]
    fn test_injected_color_strategy_is_used() {
        let cells = vec![point(34.0, -118.0, 99.0)];
        let commands = build_overlay(
            &cells,
            &la_projector(),
            None,
            |_| "purple".to_string(),
            &OverlayStyle::default(),
        );
        assert!(commands.iter().any(|c| matches!(
            c,
            DrawCommand::Halo { color, .. } if color == "purple"
        )));
        assert_eq!(markers(&commands)[0].1, "purple");
    }

    #[test]
    fn test_only_selected_marker_is_highlighted() {
        let cells = vec![point(34.0, -118.0, 20.0), point(34.1, -118.1, 60.0)];
        let commands = build_overlay(
            &cells,
            &la_projector(),
            Some(1),
            default_risk_color,
            &OverlayStyle::default(),
        );
        let flags: Vec<_> = markers(&commands).into_iter().map(|m| m.2).collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn test_marker_radius_within_bounds() {
        let cells = vec![point(34.0, -118.0, -20.0), point(34.0, -118.0, 150.0)];
        let style = OverlayStyle {
            min_marker_radius: 4.0,
            max_marker_radius: 9.0,
        };
        let commands = build_overlay(&cells, &la_projector(), None, default_risk_color, &style);
        for c in &commands {
            if let DrawCommand::Marker { radius, .. } = c {
                assert!((4.0..=9.0).contains(radius));
            }
        }
    }

    #[test]
    fn test_empty_cells_draw_no_markers() {
        let bbox = BoundingBox::new(-119.0, 33.0, -117.0, 35.0).unwrap();
        let viewport = Viewport::for_bounds(&bbox, 960.0, 600.0);
        let projector = Projector::new(viewport.state(), 960.0, 600.0);
        let commands = build_overlay(
            &[],
            &projector,
            None,
            default_risk_color,
            &OverlayStyle::default(),
        );
        assert!(commands
            .iter()
            .all(|c| matches!(c, DrawCommand::Label { .. })));
    }

    #[test]
    fn test_off_screen_labels_skipped() {
        let commands = build_overlay(
            &[],
            &la_projector(),
            None,
            default_risk_color,
            &OverlayStyle::default(),
        );
        let labels: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(labels.contains(&"Los Angeles"));
        assert!(!labels.contains(&"Sacramento"));
    }

    #[test]
    fn test_swapped_radius_bounds_are_normalized() {
        let config = MapConfig {
            min_marker_radius: 12.0,
            max_marker_radius: 5.0,
            ..MapConfig::default()
        };
        let style = OverlayStyle::from(&config);
        assert_eq!(style.min_marker_radius, 5.0);
        assert_eq!(style.max_marker_radius, 12.0);
    }
}
