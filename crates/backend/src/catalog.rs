use std::collections::HashSet;
use std::path::{Component, Path};

use airmap_shared::models::{ReadingSet, Region};
use serde::de::DeserializeOwned;

use crate::error::ServerError;

/// Sample data shipped under `<assets>/data`, checked once at start-up so a
/// malformed file fails the deploy instead of the browser.
pub struct Catalog {
    pub regions: Vec<Region>,
    pub station_count: usize,
    pub scored_count: usize,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ServerError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ServerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ServerError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Data files are plain relative paths below the data directory.
fn is_contained(data_file: &str) -> bool {
    let path = Path::new(data_file);
    !data_file.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

impl Catalog {
    pub fn load(assets_dir: &Path) -> Result<Self, ServerError> {
        let data_dir = assets_dir.join("data");
        let regions: Vec<Region> = read_json(&data_dir.join("regions.json"))?;

        let mut seen = HashSet::new();
        let mut station_count = 0;
        let mut scored_count = 0;
        for region in &regions {
            if !seen.insert(region.id.as_str()) {
                return Err(ServerError::DuplicateRegion(region.id.clone()));
            }
            if !is_contained(&region.data_file) {
                return Err(ServerError::DataFileOutsideDir {
                    region: region.id.clone(),
                    data_file: region.data_file.clone(),
                });
            }
            let readings: ReadingSet = read_json(&data_dir.join(&region.data_file))?;
            let grid = readings.to_grid();
            let dropped = readings.readings.len() - grid.cells.len();
            if dropped > 0 {
                tracing::warn!(
                    region = %region.id,
                    dropped,
                    "Stations without any pollutant reading will not be drawn"
                );
            }
            station_count += readings.readings.len();
            scored_count += grid.cells.len();
        }

        Ok(Catalog {
            regions,
            station_count,
            scored_count,
        })
    }
}
