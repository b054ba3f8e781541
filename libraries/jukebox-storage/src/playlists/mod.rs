use crate::rows::{millis, playlist_from_row, PLAYLIST_COLUMNS};
use chrono::Utc;
use jukebox_core::{error::Result, types::*, JukeboxError};
use sqlx::{SqliteConnection, SqlitePool};

/// Create new playlist
///
/// Playlists start stopped with no tracks.
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    let playlist = playlist.validate()?;
    let id = PlaylistId::generate();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO playlists (id, owner_id, name, visibility, edit_mode, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.as_str())
    .bind(playlist.owner_id.as_str())
    .bind(&playlist.name)
    .bind(playlist.visibility.as_str())
    .bind(playlist.edit_mode.as_str())
    .bind(millis(now))
    .bind(millis(now))
    .execute(pool)
    .await?;

    get_by_id(pool, &id)
        .await?
        .ok_or_else(|| JukeboxError::internal("Failed to retrieve created playlist"))
}

/// Get playlist by ID
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = ?"
    ))
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(playlist_from_row).transpose()
}

/// Whether `user_id` holds an invitation to the playlist
pub async fn is_invited(pool: &SqlitePool, id: &PlaylistId, user_id: &UserId) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM playlist_invites WHERE playlist_id = ? AND user_id = ?",
    )
    .bind(id.as_str())
    .bind(user_id.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(found.is_some())
}

/// Invite a user to the playlist
///
/// Inviting the same user twice is a no-op.
pub async fn invite(pool: &SqlitePool, id: &PlaylistId, user_id: &UserId) -> Result<()> {
    let now = millis(Utc::now());
    let mut tx = pool.begin().await?;

    lock_for_update(&mut tx, id, now).await?;

    sqlx::query(
        r#"
        INSERT INTO playlist_invites (playlist_id, user_id, invited_at)
        VALUES (?, ?, ?)
        ON CONFLICT (playlist_id, user_id) DO NOTHING
        "#,
    )
    .bind(id.as_str())
    .bind(user_id.as_str())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}

/// Take the playlist's write lock for the rest of the transaction
///
/// Must be the first statement of every mutating transaction. Writing the
/// playlist row promotes the transaction to a writer before anything is
/// read, so concurrent mutations of the same playlist run one after another.
///
/// # Errors
///
/// `NotFound` if the playlist does not exist.
pub(crate) async fn lock_for_update(
    conn: &mut SqliteConnection,
    id: &PlaylistId,
    now_ms: i64,
) -> Result<()> {
    let result = sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
        .bind(now_ms)
        .bind(id.as_str())
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(JukeboxError::not_found("Playlist", id.as_str()));
    }

    Ok(())
}

/// Read the playlist row inside an open transaction
pub(crate) async fn fetch_locked(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<Playlist> {
    let row = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = ?"
    ))
    .bind(id.as_str())
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => playlist_from_row(&row),
        None => Err(JukeboxError::not_found("Playlist", id.as_str())),
    }
}
