pub mod config;
pub mod dashboard;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod preferences;
pub mod routes;
pub mod upstream;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::AppConfig,
    dashboard::DashboardStore,
    errors::AppError,
    preferences::{InMemoryPreferences, PreferenceStore},
    upstream::UpstreamClient,
};

/// Shared application state passed to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub upstream: UpstreamClient,
    pub dashboard: Arc<DashboardStore>,
    pub preferences: Arc<dyn PreferenceStore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        Self::with_preferences(config, Arc::new(InMemoryPreferences::new()))
    }

    pub fn with_preferences(
        config: AppConfig,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Result<Self, AppError> {
        let upstream = UpstreamClient::new(&config)?;
        Ok(Self {
            config,
            upstream,
            dashboard: Arc::new(DashboardStore::new()),
            preferences,
        })
    }
}

pub fn app(state: AppState) -> Router {
    // Very permissive CORS for local dev (tighten for prod)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health))
        // proxies
        .route("/api/calls", get(routes::calls::proxy_calls))
        .route("/api/loads", get(routes::loads::proxy_loads))
        // dashboard
        .route("/api/dashboard", get(routes::dashboard::overview))
        .route("/api/dashboard/refresh", post(routes::dashboard::refresh))
        .route("/api/dashboard/calls", get(routes::dashboard::list_calls))
        .route("/api/dashboard/loads", get(routes::dashboard::list_loads))
        // preferences
        .route(
            "/api/preferences/theme",
            get(routes::preferences::get_theme).put(routes::preferences::put_theme),
        )
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
