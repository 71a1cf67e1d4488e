use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tfi_server::config::{AppConfig, FeedMode};
use tfi_server::gtfs::{GtfsStore, load_dir};
use tfi_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tfi_server=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    // Load static GTFS data (fail fast if unavailable)
    info!(dir = %config.gtfs_dir.display(), "loading GTFS data");
    let gtfs_dir = config.gtfs_dir.clone();
    let store = tokio::task::spawn_blocking(move || load_dir(gtfs_dir)).await??;
    let summary = store.summary();
    info!(
        stops = summary.stops,
        routes = summary.routes,
        trips = summary.trips,
        stop_times = summary.stop_times,
        "GTFS data loaded"
    );

    match &config.feed {
        FeedMode::Upstream(feed) => info!(url = %feed.url, "using upstream realtime feed"),
        FeedMode::File(path) => info!(path = %path.display(), "serving realtime feed from file"),
        FeedMode::Unconfigured(reason) => {
            warn!(%reason, "realtime feed not configured; /tfi/live will fail")
        }
    }
    let feed = config.feed.clone().into_source()?;

    let state = AppState::new(
        Arc::new(store),
        feed,
        config.route_search.clone(),
        config.timezone,
    );
    let app = create_router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("TFI server listening on http://{addr}");
    info!("  GET /health      - Health check");
    info!("  GET /tfi/status  - Loaded reference data");
    info!("  GET /tfi/route   - Direct bus between two coordinates");
    info!("  GET /tfi/live    - Realtime bus updates");

    axum::serve(listener, app).await?;
    Ok(())
}
