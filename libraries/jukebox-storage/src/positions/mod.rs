//! Gap-free position primitives
//!
//! `tracks` carries `UNIQUE (playlist_id, position)` and SQLite checks it
//! row by row inside a multi-row `UPDATE`, so a plain `position = position + 1`
//! over a range collides with its neighbour. Every permutation here parks
//! the affected rows in a disjoint negative range first and then writes the
//! final values.
//!
//! All functions except [`audit`] expect to run inside a transaction that
//! already holds the playlist lock.

use crate::playlists;
use jukebox_core::{error::Result, types::*};
use sqlx::{Row, SqliteConnection, SqlitePool};

/// Distance of the parking range from zero
///
/// A row at position `p` is parked at `-(p + REPOSITION_OFFSET)`. Anything
/// at or below `-REPOSITION_OFFSET` is therefore a parked row.
pub const REPOSITION_OFFSET: i64 = 1_000_000;

/// Slot for a single track lifted out of the ordering during a move
pub const PARKED: i64 = -1;

/// Number of tracks in the playlist
pub(crate) async fn count(conn: &mut SqliteConnection, playlist_id: &PlaylistId) -> Result<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tracks WHERE playlist_id = ?")
        .bind(playlist_id.as_str())
        .fetch_one(&mut *conn)
        .await?;

    Ok(total)
}

/// Number of tracks that are playing or played
///
/// These occupy positions `0..n` ahead of the queued segment.
pub(crate) async fn count_non_queued(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
) -> Result<i64> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM tracks WHERE playlist_id = ? AND status != 'queued'",
    )
    .bind(playlist_id.as_str())
    .fetch_one(&mut *conn)
    .await?;

    Ok(total)
}

/// Position right after the last non-queued track, 0 if there is none
pub(crate) async fn queue_start(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
) -> Result<i64> {
    let max: Option<i64> = sqlx::query_scalar(
        "SELECT MAX(position) FROM tracks WHERE playlist_id = ? AND status != 'queued'",
    )
    .bind(playlist_id.as_str())
    .fetch_one(&mut *conn)
    .await?;

    Ok(max.map_or(0, |p| p + 1))
}

/// Add `delta` to the position of every track in `lo..=hi`
pub(crate) async fn shift_range(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    lo: i64,
    hi: i64,
    delta: i64,
) -> Result<u64> {
    if lo > hi || delta == 0 {
        return Ok(0);
    }

    let parked = sqlx::query(
        r#"
        UPDATE tracks SET position = -(position + ?)
        WHERE playlist_id = ? AND position BETWEEN ? AND ?
        "#,
    )
    .bind(REPOSITION_OFFSET)
    .bind(playlist_id.as_str())
    .bind(lo)
    .bind(hi)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        UPDATE tracks SET position = -position - ? + ?
        WHERE playlist_id = ? AND position <= ?
        "#,
    )
    .bind(REPOSITION_OFFSET)
    .bind(delta)
    .bind(playlist_id.as_str())
    .bind(-REPOSITION_OFFSET)
    .execute(&mut *conn)
    .await?;

    Ok(parked.rows_affected())
}

/// Set one track's position directly
///
/// The target slot must be free (or the track parked there must be this one).
pub(crate) async fn set(conn: &mut SqliteConnection, track_id: &TrackId, position: i64) -> Result<()> {
    sqlx::query("UPDATE tracks SET position = ? WHERE id = ?")
        .bind(position)
        .bind(track_id.as_str())
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Give `ordered[i]` the position `start + i`
///
/// The tracks must currently occupy exactly `start..start + ordered.len()`.
pub(crate) async fn assign(
    conn: &mut SqliteConnection,
    ordered: &[TrackId],
    start: i64,
) -> Result<()> {
    // Pass 1: park everything out of range
    for (i, track_id) in (0_i64..).zip(ordered) {
        set(conn, track_id, -(REPOSITION_OFFSET + i)).await?;
    }

    // Pass 2: final positions
    for (i, track_id) in (0_i64..).zip(ordered) {
        set(conn, track_id, start + i).await?;
    }

    Ok(())
}

/// Check the ordering and playback invariants of one playlist
///
/// Returns a human-readable description of every violation found; an
/// empty list means the playlist is consistent.
pub async fn audit(pool: &SqlitePool, playlist_id: &PlaylistId) -> Result<Vec<String>> {
    let mut conn = pool.acquire().await?;
    let playlist = playlists::fetch_locked(&mut *conn, playlist_id).await?;

    let rows = sqlx::query(
        "SELECT id, position, status FROM tracks WHERE playlist_id = ? ORDER BY position",
    )
    .bind(playlist_id.as_str())
    .fetch_all(&mut *conn)
    .await?;

    let mut violations = Vec::new();
    let mut playing = Vec::new();
    let mut seen_queued = false;

    for (expected, row) in (0_i64..).zip(&rows) {
        let id: String = row.try_get("id")?;
        let position: i64 = row.try_get("position")?;
        let status: String = row.try_get("status")?;

        if position != expected {
            violations.push(format!(
                "track {id} at position {position}, expected {expected}"
            ));
        }

        match status.as_str() {
            "queued" => seen_queued = true,
            other => {
                if seen_queued {
                    violations.push(format!(
                        "{other} track {id} at {position} follows a queued track"
                    ));
                }
                if other == "playing" {
                    playing.push(id);
                }
            }
        }
    }

    if playing.len() > 1 {
        violations.push(format!("{} tracks playing: {playing:?}", playing.len()));
    }

    let current = playlist.current_track_id.as_ref().map(TrackId::as_str);
    match (current, playing.as_slice()) {
        (None, []) => {}
        (Some(c), [p]) if c == p.as_str() => {}
        (c, p) => violations.push(format!("current track {c:?} but playing {p:?}")),
    }

    if playlist.current_track_id.is_some() != playlist.playing_started_at.is_some() {
        violations.push("current track and start time disagree".to_string());
    }

    Ok(violations)
}
