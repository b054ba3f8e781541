//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! so migrations, constraints and the WAL locking behave as in production.

#![allow(dead_code)]

use jukebox_core::types::*;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = jukebox_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        jukebox_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: Create a public, everyone-editable playlist
pub async fn create_test_playlist(pool: &SqlitePool, owner: &str) -> Playlist {
    jukebox_storage::playlists::create(
        pool,
        CreatePlaylist {
            owner_id: UserId::new(owner),
            name: "Party".to_string(),
            visibility: Visibility::Public,
            edit_mode: EditMode::Everyone,
        },
    )
    .await
    .expect("Failed to create playlist")
}

/// Test fixture: Append tracks titled after `titles`, in order
pub async fn add_tracks(pool: &SqlitePool, playlist_id: &PlaylistId, titles: &[&str]) -> Vec<Track> {
    let mut tracks = Vec::with_capacity(titles.len());
    for title in titles {
        let track = jukebox_storage::tracks::insert(pool, playlist_id, NewTrack::new(*title, "Artist"))
            .await
            .expect("Failed to insert track");
        tracks.push(track);
    }
    tracks
}

/// Test fixture: Append one track with a duration
pub async fn add_timed_track(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    title: &str,
    duration_ms: i64,
) -> Track {
    jukebox_storage::tracks::insert(
        pool,
        playlist_id,
        NewTrack::new(title, "Artist").with_duration_ms(duration_ms),
    )
    .await
    .expect("Failed to insert track")
}

/// Titles in position order
pub async fn titles(pool: &SqlitePool, playlist_id: &PlaylistId) -> Vec<String> {
    jukebox_storage::tracks::list(pool, playlist_id)
        .await
        .expect("Failed to list tracks")
        .into_iter()
        .map(|t| t.title)
        .collect()
}

/// Positions in position order
pub async fn positions(pool: &SqlitePool, playlist_id: &PlaylistId) -> Vec<i64> {
    jukebox_storage::tracks::list(pool, playlist_id)
        .await
        .expect("Failed to list tracks")
        .into_iter()
        .map(|t| t.position)
        .collect()
}

/// Find a track by title
pub async fn track_named(pool: &SqlitePool, playlist_id: &PlaylistId, title: &str) -> Track {
    jukebox_storage::tracks::list(pool, playlist_id)
        .await
        .expect("Failed to list tracks")
        .into_iter()
        .find(|t| t.title == title)
        .unwrap_or_else(|| panic!("no track titled {title}"))
}

/// Fail the test if any ordering or playback invariant is broken
pub async fn assert_consistent(pool: &SqlitePool, playlist_id: &PlaylistId) {
    let violations = jukebox_storage::positions::audit(pool, playlist_id)
        .await
        .expect("Failed to audit playlist");
    assert!(violations.is_empty(), "invariants violated: {violations:#?}");
}
