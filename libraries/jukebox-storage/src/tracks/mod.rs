use crate::playlists::{fetch_locked, lock_for_update};
use crate::positions::{self, PARKED};
use crate::rows::{millis, track_from_row, TRACK_COLUMNS};
use chrono::Utc;
use jukebox_core::{error::Result, types::*, JukeboxError};
use sqlx::{SqliteConnection, SqlitePool};

/// Tracks of a playlist in position order
pub async fn list(pool: &SqlitePool, playlist_id: &PlaylistId) -> Result<Vec<Track>> {
    let rows = sqlx::query(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks WHERE playlist_id = ? ORDER BY position"
    ))
    .bind(playlist_id.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(track_from_row).collect()
}

/// Get a track that belongs to `playlist_id`
pub async fn get_by_id(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
) -> Result<Option<Track>> {
    let mut conn = pool.acquire().await?;
    fetch(&mut conn, playlist_id, track_id).await
}

pub(crate) async fn fetch(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
) -> Result<Option<Track>> {
    let row = sqlx::query(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks WHERE id = ? AND playlist_id = ?"
    ))
    .bind(track_id.as_str())
    .bind(playlist_id.as_str())
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(track_from_row).transpose()
}

pub(crate) async fn fetch_required(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
) -> Result<Track> {
    fetch(conn, playlist_id, track_id)
        .await?
        .ok_or_else(|| JukeboxError::not_found("Track", track_id.as_str()))
}

/// Append a queued track
///
/// The track lands at `position = count` with zero votes.
pub async fn insert(pool: &SqlitePool, playlist_id: &PlaylistId, track: NewTrack) -> Result<Track> {
    let track = track.validate()?;
    let id = TrackId::generate();
    let now = millis(Utc::now());

    let mut tx = pool.begin().await?;

    lock_for_update(&mut tx, playlist_id, now).await?;
    let position = positions::count(&mut tx, playlist_id).await?;

    sqlx::query(
        r#"
        INSERT INTO tracks (
            id, playlist_id, title, artist, provider, provider_track_id,
            thumbnail_url, duration_ms, position, vote_count, status, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 'queued', ?)
        "#,
    )
    .bind(id.as_str())
    .bind(playlist_id.as_str())
    .bind(&track.title)
    .bind(&track.artist)
    .bind(&track.provider)
    .bind(&track.provider_track_id)
    .bind(&track.thumbnail_url)
    .bind(track.duration_ms)
    .bind(position)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let created = fetch_required(&mut tx, playlist_id, &id).await?;

    tx.commit().await?;

    tracing::debug!(playlist = %playlist_id, track = %id, position, "track inserted");

    Ok(created)
}

/// Remove a track and close the gap
///
/// Deleting the playing track stops playback in the same transaction.
pub async fn delete(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
) -> Result<DeletedTrack> {
    let mut tx = pool.begin().await?;

    lock_for_update(&mut tx, playlist_id, millis(Utc::now())).await?;
    let track = fetch_required(&mut tx, playlist_id, track_id).await?;
    let playlist = fetch_locked(&mut tx, playlist_id).await?;

    let stopped_playback = playlist.current_track_id.as_ref() == Some(track_id);
    if stopped_playback {
        sqlx::query(
            "UPDATE playlists SET current_track_id = NULL, playing_started_at = NULL WHERE id = ?",
        )
        .bind(playlist_id.as_str())
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(track_id.as_str())
        .execute(&mut *tx)
        .await?;

    positions::shift_range(&mut tx, playlist_id, track.position + 1, i64::MAX, -1).await?;

    tx.commit().await?;

    tracing::debug!(
        playlist = %playlist_id,
        track = %track_id,
        position = track.position,
        stopped_playback,
        "track deleted"
    );

    Ok(DeletedTrack {
        track_id: track.id,
        position: track.position,
        stopped_playback,
    })
}

/// Move a track to `new_position`
///
/// The target is clamped into `[0, total - 1]` and then into the track's
/// own segment: queued tracks stay behind every playing/played track and
/// the others stay ahead of the queue. A move onto the current position
/// changes nothing and still succeeds.
pub async fn move_to(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
    new_position: i64,
) -> Result<TrackMove> {
    if new_position < 0 {
        return Err(JukeboxError::validation("newPosition must not be negative"));
    }

    let mut tx = pool.begin().await?;

    lock_for_update(&mut tx, playlist_id, millis(Utc::now())).await?;

    let total = positions::count(&mut tx, playlist_id).await?;
    if total == 0 {
        return Err(JukeboxError::conflict(format!(
            "playlist {playlist_id} has no tracks to move"
        )));
    }

    let track = fetch_required(&mut tx, playlist_id, track_id).await?;
    let non_queued = positions::count_non_queued(&mut tx, playlist_id).await?;
    let (lo, hi) = segment_bounds(track.status, non_queued, total);

    let from = track.position;
    let to = new_position.min(total - 1).clamp(lo, hi);

    let moved = TrackMove {
        track_id: track.id,
        from,
        to,
    };

    if moved.is_noop() {
        // Nothing to write; dropping the transaction rolls back the lock touch
        return Ok(moved);
    }

    positions::set(&mut tx, track_id, PARKED).await?;

    if to > from {
        positions::shift_range(&mut tx, playlist_id, from + 1, to, -1).await?;
    } else {
        positions::shift_range(&mut tx, playlist_id, to, from - 1, 1).await?;
    }

    positions::set(&mut tx, track_id, to).await?;

    tx.commit().await?;

    tracing::debug!(playlist = %playlist_id, track = %track_id, from, to, "track moved");

    Ok(moved)
}

/// Inclusive position range a track of `status` may occupy
fn segment_bounds(status: TrackStatus, non_queued: i64, total: i64) -> (i64, i64) {
    match status {
        TrackStatus::Queued => (non_queued, total - 1),
        TrackStatus::Playing | TrackStatus::Played => (0, (non_queued - 1).max(0)),
    }
}
