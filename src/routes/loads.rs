// src/routes/loads.rs

use axum::extract::{Query, State};

use crate::{
    errors::AppError,
    upstream::{LoadSearch, UpstreamResponse},
    AppState,
};

/// GET /api/loads?origin=&destination=&equipment_type=
/// Forwards to {API_BASE_URL}/loads/search with the same filters.
pub async fn proxy_loads(
    State(state): State<AppState>,
    Query(search): Query<LoadSearch>,
) -> Result<UpstreamResponse, AppError> {
    tracing::info!(
        origin = %search.origin,
        destination = %search.destination,
        equipment_type = %search.equipment_type,
        "searching loads"
    );
    state.upstream.search_loads(&search).await
}
