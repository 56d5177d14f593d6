// src/routes/preferences.rs

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::{
    errors::AppError,
    preferences::{Theme, ThemeUpdate},
    AppState,
};

// GET /api/preferences/theme
pub async fn get_theme(State(state): State<AppState>) -> Json<Theme> {
    Json(Theme::for_mode(state.preferences.get_dark_mode()))
}

// PUT /api/preferences/theme
pub async fn put_theme(
    State(state): State<AppState>,
    payload: Result<Json<ThemeUpdate>, JsonRejection>,
) -> Result<Json<Theme>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    state.preferences.set_dark_mode(body.dark_mode);
    tracing::debug!(dark_mode = body.dark_mode, "theme preference updated");
    Ok(Json(Theme::for_mode(body.dark_mode)))
}
