/// Player API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use jukebox_core::types::{PlayerState, PlaylistId};

/// GET /api/playlists/:id/player
pub async fn get_player(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<PlayerState>> {
    let state = app_state
        .queue
        .player_state(auth.user_id(), &PlaylistId::new(id))
        .await?;
    Ok(Json(state))
}

/// POST /api/playlists/:id/next
/// Finish the current track and start the next queued one
pub async fn next_track(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<PlayerState>> {
    let state = app_state
        .queue
        .next_track(auth.user_id(), &PlaylistId::new(id))
        .await?;
    Ok(Json(state))
}
