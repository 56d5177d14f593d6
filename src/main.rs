// src/main.rs

use anyhow::Context;
use freight_dashboard_api::{app, config::AppConfig, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "freight_dashboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("loading configuration")?;
    tracing::info!(?config, "configuration loaded");

    let state = AppState::new(config.clone())?;

    // One-shot fetch at boot; the dashboard reports `loading` until it lands.
    if config.refresh_on_start {
        let initial = state.clone();
        tokio::spawn(async move {
            initial.dashboard.refresh(&initial.upstream).await;
        });
    }

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "API listening");

    axum::serve(listener, app(state).into_make_service()).await?;
    Ok(())
}
