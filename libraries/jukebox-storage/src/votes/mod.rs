use crate::playlists::lock_for_update;
use crate::positions;
use crate::rows::millis;
use crate::tracks::fetch_required;
use chrono::Utc;
use jukebox_core::{error::Result, types::*, JukeboxError};
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::cmp::Reverse;

/// Cast a vote for a track
///
/// The vote is recorded per user. A vote on a queued track reorders the
/// queued segment in the same transaction; votes on playing or played
/// tracks only bump the count.
///
/// # Errors
///
/// `NotFound` if the playlist or track is absent, `Conflict` if `voter`
/// already voted and the policy disallows repeat votes.
pub async fn cast(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
    voter: &UserId,
    policy: VotePolicy,
) -> Result<VoteOutcome> {
    let now = millis(Utc::now());
    let mut tx = pool.begin().await?;

    lock_for_update(&mut tx, playlist_id, now).await?;
    let track = fetch_required(&mut tx, playlist_id, track_id).await?;

    record_vote(&mut tx, track_id, voter, policy, now).await?;

    let vote_count: i64 = sqlx::query_scalar(
        "UPDATE tracks SET vote_count = vote_count + 1 WHERE id = ? RETURNING vote_count",
    )
    .bind(track_id.as_str())
    .fetch_one(&mut *tx)
    .await?;

    let reordered = if track.status == TrackStatus::Queued {
        Some(reorder_queue(&mut tx, playlist_id).await?)
    } else {
        None
    };

    tx.commit().await?;

    tracing::debug!(
        playlist = %playlist_id,
        track = %track_id,
        voter = %voter,
        vote_count,
        reordered = reordered.is_some(),
        "vote cast"
    );

    Ok(VoteOutcome {
        track_id: track.id,
        vote_count,
        reordered,
    })
}

async fn record_vote(
    conn: &mut SqliteConnection,
    track_id: &TrackId,
    voter: &UserId,
    policy: VotePolicy,
    now_ms: i64,
) -> Result<()> {
    if policy.allow_repeat_votes {
        sqlx::query(
            r#"
            INSERT INTO track_votes (track_id, user_id, votes, voted_at)
            VALUES (?, ?, 1, ?)
            ON CONFLICT (track_id, user_id)
            DO UPDATE SET votes = votes + 1, voted_at = excluded.voted_at
            "#,
        )
        .bind(track_id.as_str())
        .bind(voter.as_str())
        .bind(now_ms)
        .execute(&mut *conn)
        .await?;

        return Ok(());
    }

    let result = sqlx::query(
        r#"
        INSERT INTO track_votes (track_id, user_id, votes, voted_at)
        VALUES (?, ?, 1, ?)
        ON CONFLICT (track_id, user_id) DO NOTHING
        "#,
    )
    .bind(track_id.as_str())
    .bind(voter.as_str())
    .bind(now_ms)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(JukeboxError::conflict(format!(
            "user {voter} already voted for track {track_id}"
        )));
    }

    Ok(())
}

/// Reorder the queued segment by votes
///
/// Queued tracks are sorted by vote count (highest first), ties keep
/// insertion order, and the result is laid out right after the last
/// playing/played track. Returns the queued track ids in their new order.
pub(crate) async fn reorder_queue(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
) -> Result<Vec<TrackId>> {
    let rows = sqlx::query(
        r#"
        SELECT id, vote_count FROM tracks
        WHERE playlist_id = ? AND status = 'queued'
        ORDER BY created_at, rowid
        "#,
    )
    .bind(playlist_id.as_str())
    .fetch_all(&mut *conn)
    .await?;

    let mut queued = rows
        .iter()
        .map(|row| -> Result<(TrackId, i64)> {
            Ok((
                TrackId::new(row.try_get::<String, _>("id")?),
                row.try_get::<i64, _>("vote_count")?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    sort_by_votes(&mut queued);

    let ordered: Vec<TrackId> = queued.into_iter().map(|(id, _)| id).collect();
    let start = positions::queue_start(conn, playlist_id).await?;

    positions::assign(conn, &ordered, start).await?;

    Ok(ordered)
}

/// Stable sort, most votes first
///
/// Input must already be in insertion order.
fn sort_by_votes(queued: &mut [(TrackId, i64)]) {
    queued.sort_by_key(|(_, votes)| Reverse(*votes));
}
