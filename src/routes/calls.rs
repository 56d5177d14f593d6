// src/routes/calls.rs

use axum::extract::State;

use crate::{errors::AppError, upstream::UpstreamResponse, AppState};

/// GET /api/calls
/// Forwards to {API_BASE_URL}/calls; status and body come back unchanged.
pub async fn proxy_calls(
    State(state): State<AppState>,
) -> Result<UpstreamResponse, AppError> {
    tracing::info!(upstream = %state.upstream.base_url(), "fetching calls");
    state.upstream.calls().await
}
