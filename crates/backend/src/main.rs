mod catalog;
mod config;
mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{extract::State, response::Html, routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use catalog::Catalog;
use config::Config;
use error::ServerError;

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

const FALLBACK_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head><title>Air Quality Map</title></head>
<body>
<h1>Air Quality Map</h1>
<p>Frontend not built yet. Sample data is served under <a href="/static/data/regions.json">/static/data</a>.</p>
</body>
</html>"#;

#[derive(Clone)]
struct AppState {
    dist_dir: Arc<PathBuf>,
}

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

fn build_app(config: &Config) -> Router {
    let static_files = Router::new()
        .nest(
            "/static",
            cached_static_router(&config.assets_dir, CACHE_1DAY),
        )
        .nest(
            "/dist",
            cached_static_router(&config.dist_dir, CACHE_IMMUTABLE),
        )
        .nest(
            "/assets",
            cached_static_router(&config.dist_dir.join("assets"), CACHE_IMMUTABLE),
        );

    let state = AppState {
        dist_dir: Arc::new(config.dist_dir.clone()),
    };

    Router::new()
        .route("/", get(serve_index))
        .route("/region/{id}", get(serve_index))
        .with_state(state)
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// The app routes client-side, so every page path gets the same shell.
async fn serve_index(State(state): State<AppState>) -> Html<String> {
    let path = state.dist_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html),
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "Serving fallback index");
            Html(FALLBACK_INDEX.to_string())
        }
    }
}

async fn run(config: Config) -> Result<(), ServerError> {
    let catalog = Catalog::load(&config.assets_dir)?;
    tracing::info!(
        regions = catalog.regions.len(),
        stations = catalog.station_count,
        scored = catalog.scored_count,
        "Loaded data catalog"
    );
    for region in &catalog.regions {
        tracing::debug!(id = %region.id, name = %region.display_name, file = %region.data_file, "Region");
    }

    let app = build_app(&config);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Server running at http://localhost:{}", config.port);
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let result = match Config::from_env() {
        Ok(config) => run(config).await,
        Err(err) => Err(err),
    };
    if let Err(err) = result {
        tracing::error!(%err, "Server failed");
        std::process::exit(1);
    }
}
