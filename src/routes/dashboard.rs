// src/routes/dashboard.rs

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{
    dashboard::DashboardView,
    models::{CallRecord, LoadRecord},
    AppState,
};

// GET /api/dashboard
pub async fn overview(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.view().await)
}

// POST /api/dashboard/refresh
pub async fn refresh(State(state): State<AppState>) -> Json<DashboardView> {
    state.dashboard.refresh(&state.upstream).await;
    Json(state.dashboard.view().await)
}

// GET /api/dashboard/calls
pub async fn list_calls(State(state): State<AppState>) -> Json<Arc<Vec<CallRecord>>> {
    Json(state.dashboard.calls().await)
}

// GET /api/dashboard/loads
pub async fn list_loads(State(state): State<AppState>) -> Json<Arc<Vec<LoadRecord>>> {
    Json(state.dashboard.loads().await)
}
