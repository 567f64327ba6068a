use airmap_shared::models::{ReadingSet, Region};
use airmap_shared::MapConfig;
use dioxus::logger::tracing::{debug, info, warn};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("no browser window available")]
    NoWindow,
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not read {url}: {message}")]
    Decode { url: String, message: String },
}

/// Build the URL of the region catalog.
pub fn regions_url(origin: &str) -> String {
    format!("{}/static/data/regions.json", origin)
}

/// Build the URL of a region's reading file.
pub fn data_url(origin: &str, data_file: &str) -> String {
    format!("{}/static/data/{}", origin, data_file.trim_start_matches('/'))
}

pub fn map_config_url(origin: &str) -> String {
    format!("{}/static/map_config.json", origin)
}

fn origin() -> Result<String, FetchError> {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .ok_or(FetchError::NoWindow)
}

async fn get_json<T: DeserializeOwned>(url: String) -> Result<T, FetchError> {
    let resp = reqwest::get(&url)
        .await
        .map_err(|e| FetchError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url,
            status: status.as_u16(),
        });
    }
    resp.json().await.map_err(|e| FetchError::Decode {
        url,
        message: e.to_string(),
    })
}

pub async fn fetch_regions() -> Result<Vec<Region>, FetchError> {
    let regions: Vec<Region> = get_json(regions_url(&origin()?))
        .await
        .inspect_err(|err| warn!(%err, "Region catalog unavailable"))?;
    info!(count = regions.len(), "Loaded region catalog");
    Ok(regions)
}

pub async fn fetch_readings(region: &Region) -> Result<ReadingSet, FetchError> {
    let set: ReadingSet = get_json(data_url(&origin()?, &region.data_file))
        .await
        .inspect_err(|err| warn!(region = %region.id, %err, "Readings unavailable"))?;
    debug!(region = %region.id, stations = set.readings.len(), "Loaded readings");
    Ok(set)
}

/// Renderer settings; any failure falls back to the built-in defaults.
pub async fn fetch_map_config() -> MapConfig {
    let url = match origin() {
        Ok(origin) => map_config_url(&origin),
        Err(_) => return MapConfig::default(),
    };
    match get_json(url).await {
        Ok(config) => config,
        Err(err) => {
            debug!(%err, "Using default map config");
            MapConfig::default()
        }
    }
}
