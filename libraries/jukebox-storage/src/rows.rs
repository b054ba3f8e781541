//! Row decoding shared by the slices

use chrono::{DateTime, Utc};
use jukebox_core::error::{JukeboxError, Result};
use jukebox_core::types::{
    EditMode, Playlist, PlaylistId, Track, TrackId, TrackStatus, UserId, Visibility,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

pub(crate) const TRACK_COLUMNS: &str = "id, playlist_id, title, artist, provider, \
     provider_track_id, thumbnail_url, duration_ms, position, vote_count, status, created_at";

pub(crate) const PLAYLIST_COLUMNS: &str = "id, owner_id, name, visibility, edit_mode, \
     current_track_id, playing_started_at, created_at, updated_at";

pub(crate) fn millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub(crate) fn timestamp(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| JukeboxError::internal(format!("timestamp out of range: {ms}")))
}

pub(crate) fn track_from_row(row: &SqliteRow) -> Result<Track> {
    let status: String = row.try_get("status")?;

    Ok(Track {
        id: TrackId::new(row.try_get::<String, _>("id")?),
        playlist_id: PlaylistId::new(row.try_get::<String, _>("playlist_id")?),
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        provider: row.try_get("provider")?,
        provider_track_id: row.try_get("provider_track_id")?,
        thumbnail_url: row.try_get("thumbnail_url")?,
        duration_ms: row.try_get("duration_ms")?,
        position: row.try_get("position")?,
        vote_count: row.try_get("vote_count")?,
        status: TrackStatus::from_str(&status)
            .ok_or_else(|| JukeboxError::internal(format!("unknown track status: {status}")))?,
        created_at: timestamp(row.try_get("created_at")?)?,
    })
}

pub(crate) fn playlist_from_row(row: &SqliteRow) -> Result<Playlist> {
    let visibility: String = row.try_get("visibility")?;
    let edit_mode: String = row.try_get("edit_mode")?;
    let current: Option<String> = row.try_get("current_track_id")?;
    let started: Option<i64> = row.try_get("playing_started_at")?;

    Ok(Playlist {
        id: PlaylistId::new(row.try_get::<String, _>("id")?),
        owner_id: UserId::new(row.try_get::<String, _>("owner_id")?),
        name: row.try_get("name")?,
        visibility: Visibility::from_str(&visibility)
            .ok_or_else(|| JukeboxError::internal(format!("unknown visibility: {visibility}")))?,
        edit_mode: EditMode::from_str(&edit_mode)
            .ok_or_else(|| JukeboxError::internal(format!("unknown edit mode: {edit_mode}")))?,
        current_track_id: current.map(TrackId::new),
        playing_started_at: started.map(timestamp).transpose()?,
        created_at: timestamp(row.try_get("created_at")?)?,
        updated_at: timestamp(row.try_get("updated_at")?)?,
    })
}
