use axum::{extract::State, response::Json};
use serde_json::Value;
use std::sync::Arc;

use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

/// GET /api/artist
pub async fn get_artist(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    log_request_received("/api/artist", "GET");

    let access_token = state.token_manager.access_token();

    state
        .spotify
        .get_artist(&access_token, &state.settings.spotify.artist_id)
        .await
        .map(Json)
        .map_err(|e| proxied_error(&state, "/api/artist", e))
}

/// GET /api/albums
pub async fn get_albums(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    log_request_received("/api/albums", "GET");

    let access_token = state.token_manager.access_token();

    state
        .spotify
        .get_artist_albums(&access_token, &state.settings.spotify.albums_artist_id)
        .await
        .map(Json)
        .map_err(|e| proxied_error(&state, "/api/albums", e))
}

/// GET /api/user
pub async fn get_user(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    log_request_received("/api/user", "GET");

    let access_token = state.token_manager.access_token();

    state
        .spotify
        .get_me(&access_token)
        .await
        .map(Json)
        .map_err(|e| proxied_error(&state, "/api/user", e))
}

fn proxied_error(state: &AppState, endpoint: &str, err: spotify::SpotifyError) -> AppError {
    log_spotify_api_error(endpoint, err.status(), &err.to_string());
    AppError::from_proxied(err, state.authorize_url.as_str())
}
