use crate::playlists::{self, fetch_locked, lock_for_update};
use crate::rows::{millis, timestamp};
use chrono::{DateTime, Utc};
use jukebox_core::{error::Result, types::*, JukeboxError};
use sqlx::{Row, SqlitePool};

/// Current player state of a playlist
pub async fn state(pool: &SqlitePool, playlist_id: &PlaylistId) -> Result<PlayerState> {
    let playlist = playlists::get_by_id(pool, playlist_id)
        .await?
        .ok_or_else(|| JukeboxError::not_found("Playlist", playlist_id.as_str()))?;

    Ok(PlayerState::from_columns(
        playlist.id,
        playlist.current_track_id,
        playlist.playing_started_at,
    ))
}

/// Advance playback to the next queued track
///
/// The playing track (if any) becomes played and keeps its position; the
/// lowest-positioned queued track starts playing at `now`. With no queued
/// track left the player stops.
///
/// When `expected_current` is given and no longer matches the playlist's
/// current track, nothing changes and `advanced` is `false`.
pub async fn next_track(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    expected_current: Option<&TrackId>,
    now: DateTime<Utc>,
) -> Result<Advance> {
    let now_ms = millis(now);
    let mut tx = pool.begin().await?;

    lock_for_update(&mut tx, playlist_id, now_ms).await?;
    let playlist = fetch_locked(&mut tx, playlist_id).await?;

    if let Some(expected) = expected_current {
        if playlist.current_track_id.as_ref() != Some(expected) {
            tracing::debug!(
                playlist = %playlist_id,
                expected = %expected,
                "current track changed, skipping advance"
            );
            return Ok(Advance {
                state: PlayerState::from_columns(
                    playlist.id,
                    playlist.current_track_id,
                    playlist.playing_started_at,
                ),
                advanced: false,
            });
        }
    }

    sqlx::query("UPDATE tracks SET status = 'played' WHERE playlist_id = ? AND status = 'playing'")
        .bind(playlist_id.as_str())
        .execute(&mut *tx)
        .await?;

    let next: Option<String> = sqlx::query_scalar(
        r#"
        SELECT id FROM tracks
        WHERE playlist_id = ? AND status = 'queued'
        ORDER BY position
        LIMIT 1
        "#,
    )
    .bind(playlist_id.as_str())
    .fetch_optional(&mut *tx)
    .await?;

    let state = match next {
        None => {
            sqlx::query(
                "UPDATE playlists SET current_track_id = NULL, playing_started_at = NULL WHERE id = ?",
            )
            .bind(playlist_id.as_str())
            .execute(&mut *tx)
            .await?;

            PlayerState::stopped(playlist_id.clone())
        }
        Some(next) => {
            sqlx::query("UPDATE tracks SET status = 'playing' WHERE id = ?")
                .bind(&next)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                "UPDATE playlists SET current_track_id = ?, playing_started_at = ? WHERE id = ?",
            )
            .bind(&next)
            .bind(now_ms)
            .bind(playlist_id.as_str())
            .execute(&mut *tx)
            .await?;

            PlayerState::playing(playlist_id.clone(), TrackId::new(next), timestamp(now_ms)?)
        }
    };

    tx.commit().await?;

    tracing::debug!(
        playlist = %playlist_id,
        current = ?state.current_track_id,
        status = ?state.status,
        "player advanced"
    );

    Ok(Advance {
        state,
        advanced: true,
    })
}

/// Playlists whose playing track has run its full duration by `now`
///
/// Tracks with a zero duration never become due.
pub async fn due(pool: &SqlitePool, now: DateTime<Utc>) -> Result<Vec<DueAdvance>> {
    let rows = sqlx::query(
        r#"
        SELECT p.id AS playlist_id, t.id AS track_id
        FROM playlists p
        INNER JOIN tracks t ON t.id = p.current_track_id
        WHERE t.status = 'playing'
          AND t.duration_ms > 0
          AND p.playing_started_at IS NOT NULL
          AND p.playing_started_at + t.duration_ms <= ?
        ORDER BY p.playing_started_at + t.duration_ms
        "#,
    )
    .bind(millis(now))
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<DueAdvance> {
            Ok(DueAdvance {
                playlist_id: PlaylistId::new(row.try_get::<String, _>("playlist_id")?),
                track_id: TrackId::new(row.try_get::<String, _>("track_id")?),
            })
        })
        .collect()
}
