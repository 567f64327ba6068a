use std::cell::RefCell;
use std::rc::Rc;

use airmap_shared::hit::{hit_test, reproject};
use airmap_shared::models::{DataPoint, MapStyle, RiskGrid, SelectedPoint};
use airmap_shared::overlay::{build_overlay, OverlayStyle};
use airmap_shared::projection::Projector;
use airmap_shared::tiles::{visible_tile_range, TileLoadTracker};
use airmap_shared::viewport::{Viewport, ViewportState, MAX_ZOOM, MIN_ZOOM};
use airmap_shared::MapConfig;
use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::logger::tracing::{debug, warn};
use dioxus::prelude::*;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsValue;

use crate::canvas::{Surface, TileBatch};
use crate::components::legend::Legend;
use crate::components::map_controls::MapControls;
use crate::components::point_popup::PointPopup;
use crate::coords;

const CANVAS_ID: &str = "airmap-canvas";

const TILE_MAP_CSS: Asset = asset!("/assets/tile_map.css");

/// Drag threshold in pixels, movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Accumulated wheel travel that counts as one zoom step.
const WHEEL_STEP: f64 = 100.0;

/// Everything one redraw needs, captured when the redraw is scheduled.
struct RedrawJob {
    state: ViewportState,
    cells: Vec<DataPoint>,
    selected: Option<usize>,
    config: MapConfig,
    risk_color: fn(f64) -> String,
}

/// Clear the canvas, start the tile pass and paint the overlay once every
/// tile has settled.
fn redraw(
    job: RedrawJob,
    batch_slot: &Rc<RefCell<Option<TileBatch>>>,
    tracker: &Rc<RefCell<TileLoadTracker>>,
) -> Result<(), JsValue> {
    // Cancel whatever the previous pass still has in flight.
    batch_slot.borrow_mut().take();

    let surface = Surface::from_element_id(CANVAS_ID)?;
    surface.clear(&job.config.placeholder_color);

    let projector = Projector::new(&job.state, surface.width(), surface.height());
    let tiles: Vec<_> = visible_tile_range(&projector)
        .placements(&projector)
        .into_iter()
        .map(|p| {
            let url = job.config.tiles.tile_url(job.state.map_style, p.tile);
            (p, url)
        })
        .collect();
    let commands = build_overlay(
        &job.cells,
        &projector,
        job.selected,
        job.risk_color,
        &OverlayStyle::from(&job.config),
    );
    debug!(
        zoom = job.state.zoom_level,
        tiles = tiles.len(),
        commands = commands.len(),
        "Redrawing map"
    );

    let overlay_surface = surface.clone();
    let batch = TileBatch::start(
        &surface,
        tiles,
        tracker,
        &job.config.placeholder_color,
        move || {
            if let Err(err) = overlay_surface.paint(&commands) {
                warn!(?err, "Failed to paint overlay");
            }
        },
    )?;
    *batch_slot.borrow_mut() = Some(batch);
    Ok(())
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

fn attribution(style: MapStyle) -> &'static str {
    match style {
        MapStyle::Base => "\u{a9} OpenStreetMap contributors",
        MapStyle::Satellite => "Imagery \u{a9} Esri",
    }
}

#[component]
pub fn TileMap(
    grid: ReadSignal<RiskGrid>,
    get_risk_color: fn(f64) -> String,
    get_risk_label: fn(&str) -> String,
    #[props(default)] config: MapConfig,
) -> Element {
    let width = config.width();
    let height = config.height();
    let tolerance = config.hit_tolerance_px;

    let mut viewport =
        use_signal(|| Viewport::for_bounds(&grid.peek().bounding_box, width, height));
    let mut selected = use_signal(|| None::<SelectedPoint>);

    // Drag state
    let mut drag_origin = use_signal(|| None::<(f64, f64)>);
    let mut did_drag = use_signal(|| false);
    let mut drag_start_view = use_signal(Viewport::default);
    let mut wheel_travel = use_signal(|| 0.0_f64);

    let batch_slot = use_hook(|| Rc::new(RefCell::new(None::<TileBatch>)));
    let tracker = use_hook(|| Rc::new(RefCell::new(TileLoadTracker::default())));
    let pending = use_hook(|| Rc::new(RefCell::new(None::<Timeout>)));

    // New data: re-home the view on its extent and drop the selection. The
    // base layer choice is kept.
    use_effect(move || {
        let bbox = grid.read().bounding_box;
        let style = viewport.peek().state().map_style;
        let mut fresh = Viewport::for_bounds(&bbox, width, height);
        fresh.set_style(style);
        viewport.set(fresh);
        selected.set(None);
    });

    // Debounced redraw on any view, data or selection change.
    {
        let pending = pending.clone();
        let batch_slot = batch_slot.clone();
        let tracker = tracker.clone();
        let config = config.clone();
        use_effect(move || {
            let job = RedrawJob {
                state: *viewport.read().state(),
                cells: grid.read().cells.clone(),
                selected: selected.read().as_ref().map(|s| s.index),
                config: config.clone(),
                risk_color: get_risk_color,
            };
            let batch_slot = batch_slot.clone();
            let tracker = tracker.clone();
            let timer = Timeout::new(job.config.redraw_debounce_ms, move || {
                if let Err(err) = redraw(job, &batch_slot, &tracker) {
                    warn!(?err, "Map redraw failed");
                }
            });
            // Replacing the handle cancels the previous timer.
            *pending.borrow_mut() = Some(timer);
        });
    }

    {
        let pending = pending.clone();
        let batch_slot = batch_slot.clone();
        use_drop(move || {
            pending.borrow_mut().take();
            batch_slot.borrow_mut().take();
        });
    }

    let state = *viewport.read().state();
    let projector = Projector::new(&state, width, height);
    let popup = {
        let grid = grid.read();
        (*selected.read())
            .and_then(|sel| reproject(sel, &grid.cells, &projector))
            .and_then(|sel| grid.cells.get(sel.index).cloned().map(|p| (sel, p)))
            .map(|(sel, point)| {
                let label = get_risk_label(&point.risk_class);
                let color = get_risk_color(point.risk_score);
                (sel, point, label, color)
            })
    };

    let canvas_w = config.canvas_width;
    let canvas_h = config.canvas_height;
    let dragging = *did_drag.read() && drag_origin.read().is_some();
    let frame_class = if dragging {
        "tile-map-frame dragging"
    } else {
        "tile-map-frame"
    };
    let credit = attribution(state.map_style);

    rsx! {
        document::Stylesheet { href: TILE_MAP_CSS }
        div { class: "tile-map",
            div { class: "{frame_class}",
                canvas {
                    id: CANVAS_ID,
                    width: "{canvas_w}",
                    height: "{canvas_h}",

                    onwheel: move |evt: Event<WheelData>| {
                        evt.prevent_default();
                        let travel = *wheel_travel.read() + wheel_delta_y(evt.data().delta());
                        if travel.abs() < WHEEL_STEP {
                            wheel_travel.set(travel);
                            return;
                        }
                        wheel_travel.set(0.0);
                        viewport.with_mut(|v| {
                            if travel < 0.0 {
                                v.zoom_in();
                            } else {
                                v.zoom_out();
                            }
                        });
                    },

                    onmousedown: move |evt: Event<MouseData>| {
                        if evt.trigger_button() != Some(MouseButton::Primary) {
                            return;
                        }
                        let client = evt.client_coordinates();
                        drag_origin.set(Some((client.x, client.y)));
                        did_drag.set(false);
                        drag_start_view.set(*viewport.read());
                    },

                    onmousemove: move |evt: Event<MouseData>| {
                        let Some((start_x, start_y)) = *drag_origin.read() else {
                            return;
                        };
                        let client = evt.client_coordinates();
                        let dx = client.x - start_x;
                        let dy = client.y - start_y;
                        if !*did_drag.read() && (dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD) {
                            did_drag.set(true);
                        }
                        if *did_drag.read() {
                            let (cdx, cdy) = match coords::element_rect(CANVAS_ID) {
                                Some(rect) => coords::client_delta_to_canvas(
                                    dx, dy, rect.width(), rect.height(), width, height,
                                ),
                                None => (dx, dy),
                            };
                            let mut next = *drag_start_view.read();
                            next.pan_by(cdx, cdy, width, height);
                            viewport.set(next);
                        }
                    },

                    onmouseup: move |evt: Event<MouseData>| {
                        let was_down = drag_origin.read().is_some();
                        let was_drag = *did_drag.read();
                        drag_origin.set(None);
                        did_drag.set(false);

                        // A mouseup without drag movement = a click
                        if was_down && !was_drag {
                            let client = evt.client_coordinates();
                            let Some(click) =
                                coords::click_to_canvas(client.x, client.y, CANVAS_ID, width, height)
                            else {
                                return;
                            };
                            let projector = Projector::new(viewport.read().state(), width, height);
                            let hit = hit_test(&grid.read().cells, &projector, click, tolerance);
                            debug!(?hit, "Map click");
                            selected.set(hit);
                        }
                    },

                    onmouseleave: move |_| {
                        drag_origin.set(None);
                        did_drag.set(false);
                    },
                }

                if let Some((sel, point, label, color)) = popup {
                    PointPopup {
                        point,
                        selected: sel,
                        canvas_width: width,
                        canvas_height: height,
                        label,
                        color,
                        on_close: move |_| selected.set(None),
                    }
                }

                MapControls {
                    map_style: state.map_style,
                    can_zoom_in: state.zoom_level < MAX_ZOOM,
                    can_zoom_out: state.zoom_level > MIN_ZOOM,
                    on_zoom_in: move |_| {
                        viewport.with_mut(|v| {
                            v.zoom_in();
                        });
                    },
                    on_zoom_out: move |_| {
                        viewport.with_mut(|v| {
                            v.zoom_out();
                        });
                    },
                    on_reset: move |_| {
                        viewport.with_mut(|v| v.reset_view());
                        selected.set(None);
                    },
                    on_toggle_style: move |_| {
                        viewport.with_mut(|v| {
                            let next = v.state().map_style.toggled();
                            v.set_style(next);
                        });
                    },
                }

                div { class: "map-attribution", "{credit}" }
            }
            Legend { get_risk_color, get_risk_label }
        }
    }
}
