//! HTTP routes.
//!
//! `GET /analyze` returns the merged raw history exactly as the shards hold
//! it. `GET /views/:mode` computes one view server-side. Everything else
//! falls through to the static client assets.

use crate::error::{ServerError, ServerResult};
use crate::history::HistoryLoader;
use axum::extract::{Path, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use rewind_config::Config;
use rewind_engine::{Analyzer, ViewMode, ViewReport};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared, read-only state of the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<Config>,
    /// Shard loader built from `config.data`.
    pub history: Arc<HistoryLoader>,
    /// Analysis settings with their classifier.
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    /// Builds the state for `config`.
    pub fn new(config: Config) -> ServerResult<Self> {
        let history = HistoryLoader::from_config(&config.data);
        let analyzer = Analyzer::new(config.analysis.clone())?;
        Ok(Self {
            config: Arc::new(config),
            history: Arc::new(history),
            analyzer: Arc::new(analyzer),
        })
    }
}

/// Create the router with every route and the static fallback.
pub fn create_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.server.static_dir);

    Router::new()
        .route("/analyze", get(analyze))
        .route("/views/:mode", get(view))
        .fallback_service(assets)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Merged raw play records of every shard.
async fn analyze(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    let records = state.history.load_records().await?;
    Ok(Json(Value::Array(records)))
}

/// One computed and rendered view.
async fn view(Path(mode): Path<String>, State(state): State<AppState>) -> ServerResult<Json<ViewReport>> {
    let mode: ViewMode = mode.parse()?;
    let events = state.history.load_events().await?;
    Ok(Json(state.analyzer.report(mode, &events)))
}

/// Bind `config.server.bind_address` and serve until the process stops.
pub async fn serve(config: Config) -> ServerResult<()> {
    let address = config.server.bind_address.clone();
    info!("Starting Rewind server on {address}");

    let app = create_router(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

    info!("Rewind server listening on {address}");

    axum::serve(listener, app).await.map_err(ServerError::Serve)
}
