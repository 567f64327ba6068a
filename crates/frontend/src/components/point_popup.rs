use airmap_shared::models::{DataPoint, SelectedPoint};
use dioxus::prelude::*;

/// Offset from the marker so the popup does not cover it.
const POPUP_OFFSET_PX: f64 = 14.0;

#[component]
pub fn PointPopup(
    point: DataPoint,
    selected: SelectedPoint,
    canvas_width: f64,
    canvas_height: f64,
    label: String,
    color: String,
    on_close: EventHandler<()>,
) -> Element {
    // Positions are in canvas pixels; express them as percentages so the popup
    // follows the canvas when CSS scales it.
    let left = (selected.screen_x + POPUP_OFFSET_PX) / canvas_width * 100.0;
    let top = (selected.screen_y - POPUP_OFFSET_PX) / canvas_height * 100.0;
    let score = format!("{:.1}", point.risk_score);
    let lat = format!("{:.4}", point.latitude);
    let lon = format!("{:.4}", point.longitude);

    rsx! {
        div {
            class: "point-popup",
            style: "left: {left}%; top: {top}%;",
            onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
            onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
            button {
                class: "popup-close",
                title: "Dismiss",
                onclick: move |_| on_close.call(()),
                "\u{00d7}"
            }
            div { class: "popup-heading",
                span { class: "legend-swatch", style: "background: {color};" }
                strong { "{label}" }
            }
            div { class: "popup-score", "Risk score {score}" }
            div { class: "popup-coords", "{lat}, {lon}" }
        }
    }
}
