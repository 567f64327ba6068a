use airmap_shared::models::{Region, RiskGrid, CALIFORNIA};
use airmap_shared::risk::{bucket_counts, default_risk_color, default_risk_label, RiskBucket};
use dioxus::logger::tracing::debug;
use dioxus::prelude::*;

use crate::api;
use crate::components::tile_map::TileMap;
use crate::Route;

#[component]
pub fn Dashboard(region_id: Option<String>) -> Element {
    // Data resources
    let regions_resource = use_resource(|| api::fetch_regions());
    let config_resource = use_resource(|| api::fetch_map_config());

    let mut selected_id = use_signal(|| region_id.clone());
    let navigator = use_navigator();

    let current_region = use_memo(move || {
        let regions = regions_resource.read();
        let Some(Ok(list)) = &*regions else {
            return None;
        };
        let wanted = selected_id.read().clone();
        wanted
            .and_then(|id| list.iter().find(|r| r.id == id))
            .or_else(|| list.first())
            .cloned()
    });

    let readings_resource = use_resource(move || {
        let region = current_region();
        async move {
            match region {
                Some(region) => api::fetch_readings(&region).await.map(Some),
                None => Ok(None),
            }
        }
    });

    let grid = use_memo(move || match (&*readings_resource.read(), current_region()) {
        (Some(Ok(Some(set))), _) => {
            let grid = set.to_grid();
            let dropped = set.readings.len() - grid.cells.len();
            if dropped > 0 {
                debug!(dropped, "Skipping stations without pollutant readings");
            }
            grid
        }
        (_, Some(region)) => RiskGrid::empty(region.bounding_box),
        _ => RiskGrid::empty(CALIFORNIA),
    });

    let regions: Vec<Region> = match &*regions_resource.read() {
        Some(Ok(list)) => list.clone(),
        _ => vec![],
    };

    // Upstream failures surface here, never inside the map.
    let mut alerts = Vec::new();
    if let Some(Err(err)) = &*regions_resource.read() {
        alerts.push(format!("Could not load the region list: {err}"));
    }
    if let Some(Err(err)) = &*readings_resource.read() {
        alerts.push(format!("Could not load readings: {err}"));
    }

    let region = current_region();
    let current_id = region.as_ref().map(|r| r.id.clone()).unwrap_or_default();
    let heading = region
        .as_ref()
        .map(|r| r.display_name.clone())
        .unwrap_or_else(|| "California".to_string());
    let loading = readings_resource.read().is_none() && region.is_some();

    let summary: Vec<(&'static str, String, usize)> = {
        let counts = bucket_counts(&grid.read().cells);
        RiskBucket::ALL
            .into_iter()
            .zip(counts)
            .map(|(bucket, n)| (bucket.class_name(), default_risk_label(bucket.class_name()), n))
            .collect()
    };
    let station_count = grid.read().cells.len();
    let map_config = config_resource.read().clone();

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Air Quality Map" }
                select {
                    value: "{current_id}",
                    disabled: regions.is_empty(),
                    onchange: move |evt: Event<FormData>| {
                        let id = evt.value();
                        selected_id.set(Some(id.clone()));
                        navigator.replace(Route::RegionView { id });
                    },
                    for r in regions.iter() {
                        option { key: "{r.id}", value: "{r.id}", "{r.display_name}" }
                    }
                }
            }

            for (i, message) in alerts.into_iter().enumerate() {
                div { class: "alert", role: "alert", key: "{i}", "{message}" }
            }

            div { class: "sidebar",
                div { class: "panel",
                    h3 { "{heading}" }
                    if loading {
                        p { class: "muted", "Loading readings\u{2026}" }
                    } else {
                        p { "{station_count} stations" }
                    }
                    for (class, label, n) in summary {
                        div { class: "summary-row {class}", key: "{class}",
                            span { "{label}" }
                            strong { "{n}" }
                        }
                    }
                }
            }

            div { class: "main",
                if let Some(config) = map_config {
                    TileMap {
                        grid,
                        get_risk_color: default_risk_color,
                        get_risk_label: default_risk_label,
                        config,
                    }
                } else {
                    p { class: "muted", "Loading map\u{2026}" }
                }
            }
        }
    }
}
