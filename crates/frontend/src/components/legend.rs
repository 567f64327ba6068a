use airmap_shared::risk::RiskBucket;
use dioxus::prelude::*;

/// One row per risk bucket, rendered through the same strategies as the map.
#[component]
pub fn Legend(get_risk_color: fn(f64) -> String, get_risk_label: fn(&str) -> String) -> Element {
    let rows: Vec<(&'static str, String, String, &'static str)> = RiskBucket::ALL
        .into_iter()
        .map(|bucket| {
            (
                bucket.class_name(),
                get_risk_color(bucket.representative_score()),
                get_risk_label(bucket.class_name()),
                bucket.range_label(),
            )
        })
        .collect();

    rsx! {
        div { class: "map-legend",
            h4 { "Risk score" }
            for (class, color, label, range) in rows {
                div { class: "legend-row", key: "{class}",
                    span { class: "legend-swatch", style: "background: {color};" }
                    span { class: "legend-label", "{label}" }
                    span { class: "legend-range", "{range}" }
                }
            }
        }
    }
}
