//! Scenario Replay API Server
//!
//! REST API serving scenario lists, statistics, per-frame actor outlines,
//! map layers and raw-data exports to the replay viewer.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
mod routes;
mod settings;

pub use error::ApiError;
pub use settings::{LoggingSettings, PathSettings, ReplaySettings, ServerSettings, SettingsError};

use scenario_loader::{CacheStats, CsvSource, ScenarioBundle, ScenarioLoader};
use track_engine::TrackClassifier;

/// Application state shared across handlers
pub struct AppState {
    /// Memoizing scenario loader
    pub loader: Arc<ScenarioLoader>,
    /// Loaded settings
    pub settings: ReplaySettings,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: ReplaySettings) -> Self {
        let loader = ScenarioLoader::new(TrackClassifier::new(settings.classifier), settings.cache);
        Self {
            loader: Arc::new(loader),
            settings,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Source described by the configured paths
    pub fn source(&self) -> CsvSource {
        CsvSource::new(&self.settings.paths.traj_file, &self.settings.paths.map_file)
    }
}

pub type SharedState = Arc<RwLock<AppState>>;

/// Load a scenario off the async runtime
pub(crate) async fn load_bundle(
    state: &SharedState,
    scenario_id: &str,
) -> Result<Arc<ScenarioBundle>, ApiError> {
    let (loader, source) = {
        let state = state.read().await;
        (Arc::clone(&state.loader), state.source())
    };
    let scenario_id = scenario_id.to_string();

    tokio::task::spawn_blocking(move || loader.load(&source, &scenario_id))
        .await
        .map_err(|e| ApiError::Task(e.to_string()))?
        .map_err(ApiError::from)
}

/// Like [`load_bundle`], but a scenario without rows is `NoData`
pub(crate) async fn load_with_data(
    state: &SharedState,
    scenario_id: &str,
) -> Result<Arc<ScenarioBundle>, ApiError> {
    let bundle = load_bundle(state, scenario_id).await?;
    if !bundle.has_data || bundle.is_empty() {
        return Err(ApiError::NoData(scenario_id.to_string()));
    }
    Ok(bundle)
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub trajectory_file_present: bool,
    pub cache: CacheStats,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/scenarios", get(routes::scenarios::list_scenarios))
        .route(
            "/api/v1/scenarios/:id/summary",
            get(routes::scenarios::get_summary),
        )
        .route("/api/v1/scenarios/:id/frames", get(routes::frames::get_frames))
        .route("/api/v1/scenarios/:id/map", get(routes::map::get_map))
        .route("/api/v1/scenarios/:id/export", get(routes::export::export_csv))
        .route(
            "/api/v1/scenarios/:id/export/options",
            get(routes::export::export_options),
        )
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(
    State(state): State<SharedState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let state = state.read().await;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        trajectory_file_present: state.settings.paths.traj_file.exists(),
        cache: state.loader.cache_stats()?,
    }))
}

/// Prometheus scrape endpoint
async fn metrics_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Initialize logging
pub fn init_logging(settings: &LoggingSettings) {
    let level = settings.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if settings.json {
        tracing::subscriber::set_global_default(builder.json().finish())
            .expect("Failed to set tracing subscriber");
    } else {
        tracing::subscriber::set_global_default(builder.finish())
            .expect("Failed to set tracing subscriber");
    }
}

/// Install the Prometheus recorder
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Metrics recorder not installed: {}", e);
            None
        }
    }
}

/// Run the server
pub async fn run_server(settings: ReplaySettings) -> anyhow::Result<()> {
    let addr = settings.server.bind_addr.clone();
    let mut state = AppState::new(settings);
    if let Some(handle) = init_metrics() {
        state = state.with_metrics(handle);
    }

    info!(
        "Serving scenarios from {} (map: {})",
        state.settings.paths.traj_file.display(),
        state.settings.paths.map_file.display()
    );
    let app = create_router(Arc::new(RwLock::new(state)));

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
