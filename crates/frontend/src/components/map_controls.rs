use airmap_shared::MapStyle;
use dioxus::prelude::*;

#[component]
pub fn MapControls(
    map_style: MapStyle,
    can_zoom_in: bool,
    can_zoom_out: bool,
    on_zoom_in: EventHandler<()>,
    on_zoom_out: EventHandler<()>,
    on_reset: EventHandler<()>,
    on_toggle_style: EventHandler<()>,
) -> Element {
    let style_label = match map_style {
        MapStyle::Base => "Satellite",
        MapStyle::Satellite => "Map",
    };

    rsx! {
        div { class: "map-controls",
            button {
                title: "Zoom in",
                disabled: !can_zoom_in,
                onclick: move |_| on_zoom_in.call(()),
                "+"
            }
            button {
                title: "Zoom out",
                disabled: !can_zoom_out,
                onclick: move |_| on_zoom_out.call(()),
                "\u{2212}"
            }
            button {
                title: "Reset view",
                onclick: move |_| on_reset.call(()),
                "\u{27f2}"
            }
            button {
                class: "style-toggle",
                title: "Switch base layer",
                onclick: move |_| on_toggle_style.call(()),
                "{style_label}"
            }
        }
    }
}
