/// Playlist track API routes
use crate::{error::Result, extract::ApiJson, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use jukebox_core::types::{NewTrack, PlaylistId, Track, TrackId, TrackMove};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTrackRequest {
    pub new_position: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub vote_count: i64,
}

/// GET /api/playlists/:id/tracks
pub async fn list_tracks(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Track>>> {
    let tracks = app_state
        .queue
        .list_tracks(auth.user_id(), &PlaylistId::new(id))
        .await?;
    Ok(Json(tracks))
}

/// POST /api/playlists/:id/tracks
/// Append a track to the end of the queue
pub async fn add_track(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<NewTrack>,
) -> Result<(StatusCode, Json<Track>)> {
    let track = app_state
        .queue
        .insert_track(auth.user_id(), &PlaylistId::new(id), req)
        .await?;
    Ok((StatusCode::CREATED, Json(track)))
}

/// PATCH /api/playlists/:id/tracks/:track_id
/// Move a track to a new position
pub async fn move_track(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path((id, track_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<MoveTrackRequest>,
) -> Result<Json<TrackMove>> {
    let moved = app_state
        .queue
        .move_track(
            auth.user_id(),
            &PlaylistId::new(id),
            &TrackId::new(track_id),
            req.new_position,
        )
        .await?;
    Ok(Json(moved))
}

/// DELETE /api/playlists/:id/tracks/:track_id
pub async fn delete_track(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path((id, track_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    app_state
        .queue
        .delete_track(auth.user_id(), &PlaylistId::new(id), &TrackId::new(track_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/playlists/:id/tracks/:track_id/vote
pub async fn vote(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path((id, track_id)): Path<(String, String)>,
) -> Result<Json<VoteResponse>> {
    let outcome = app_state
        .queue
        .vote(auth.user_id(), &PlaylistId::new(id), &TrackId::new(track_id))
        .await?;
    Ok(Json(VoteResponse {
        vote_count: outcome.vote_count,
    }))
}
