// REST API routes consumed by the browser UI

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use super::AppState;
use crate::ai::PlaylistForm;
use crate::catalog::Track;
use crate::downloads::Download;

// ---- Request/Response types ----

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub name: String,
    pub version: String,
    pub track_count: usize,
    pub ai_enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub playlist: Vec<Arc<Track>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub track_id: String,
}

// ---- Route registration ----

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/tracks", get(get_tracks))
        .route("/api/tracks/search", get(search_tracks))
        .route("/api/tracks/{id}", get(get_track))
        .route("/api/playlist", post(generate_playlist))
        .route("/api/downloads", get(get_downloads).post(start_download))
        .route("/api/downloads/{id}/pause", post(pause_download))
        .route("/api/downloads/{id}/resume", post(resume_download))
}

// ---- Handlers ----

async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        name: "TuneDrop".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        track_count: state.catalog.len(),
        ai_enabled: state.ai_enabled,
    })
}

async fn get_tracks(State(state): State<Arc<AppState>>) -> Json<Vec<Arc<Track>>> {
    Json(state.catalog.list_tracks().to_vec())
}

async fn search_tracks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Arc<Track>>> {
    let query = params.q.unwrap_or_default();
    Json(state.catalog.search(&query))
}

async fn get_track(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Arc<Track>>, ApiError> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("track {} not found", id)))
}

/// The AI playlist boundary: `{seedSong, moodPrompt}` in, `{playlist}` or
/// `{error}` out. An empty playlist is a success.
async fn generate_playlist(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PlaylistForm>, JsonRejection>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let Json(form) = payload?;
    let playlist = state
        .playlists
        .generate(&form.seed_song, &form.mood_prompt)
        .await?;
    Ok(Json(PlaylistResponse { playlist }))
}

async fn get_downloads(State(state): State<Arc<AppState>>) -> Json<Vec<Download>> {
    Json(state.downloads.list())
}

async fn start_download(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<Download>, ApiError> {
    let Json(body) = payload?;
    let track = state
        .catalog
        .get(&body.track_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("track {} not found", body.track_id)))?;

    Ok(Json(state.downloads.enqueue(track)?))
}

async fn pause_download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Download>, ApiError> {
    Ok(Json(state.downloads.pause(&id)?))
}

async fn resume_download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Download>, ApiError> {
    Ok(Json(state.downloads.resume(&id)?))
}
