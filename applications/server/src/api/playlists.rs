/// Playlists API routes
use crate::{error::Result, extract::ApiJson, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use jukebox_core::types::{
    CreatePlaylist, EditMode, Playlist, PlaylistDetails, PlaylistId, UserId, Visibility,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub edit_mode: EditMode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub user_id: UserId,
}

/// POST /api/playlists
/// Create a playlist owned by the caller
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<Playlist>)> {
    let playlist = app_state
        .queue
        .create_playlist(CreatePlaylist {
            owner_id: auth.user_id().clone(),
            name: req.name,
            visibility: req.visibility,
            edit_mode: req.edit_mode,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(playlist)))
}

/// GET /api/playlists/:id
/// Get a playlist with its tracks in play order
pub async fn get_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<PlaylistDetails>> {
    let details = app_state
        .queue
        .get_playlist(auth.user_id(), &PlaylistId::new(id))
        .await?;
    Ok(Json(details))
}

/// POST /api/playlists/:id/invites
/// Invite a user (owner only)
pub async fn invite_user(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<InviteRequest>,
) -> Result<StatusCode> {
    app_state
        .queue
        .invite(auth.user_id(), &PlaylistId::new(id), &req.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
