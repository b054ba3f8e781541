use crate::locks::{PlaylistGuard, PlaylistLocks};
use crate::{playback, playlists, tracks, votes};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jukebox_core::{error::Result, storage::QueueStore, types::*};
use sqlx::SqlitePool;

/// Queue store backed by `SQLite`
///
/// Mutations queue on a per-playlist lock before opening their write
/// transaction. Clones share the pool and the lock table.
#[derive(Clone)]
pub struct SqliteQueueStore {
    pool: SqlitePool,
    locks: PlaylistLocks,
}

impl SqliteQueueStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            locks: PlaylistLocks::new(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Hold off every mutation of `id` made through this store until the
    /// guard drops
    pub async fn lock_playlist(&self, id: &PlaylistId) -> PlaylistGuard {
        self.locks.acquire(id).await
    }
}

#[async_trait]
impl QueueStore for SqliteQueueStore {
    // Playlists
    async fn create_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist> {
        playlists::create(&self.pool, playlist).await
    }

    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        playlists::get_by_id(&self.pool, id).await
    }

    async fn is_invited(&self, id: &PlaylistId, user_id: &UserId) -> Result<bool> {
        playlists::is_invited(&self.pool, id, user_id).await
    }

    async fn invite_user(&self, id: &PlaylistId, user_id: &UserId) -> Result<()> {
        let _guard = self.locks.acquire(id).await;
        playlists::invite(&self.pool, id, user_id).await
    }

    // Ordering
    async fn list_tracks(&self, id: &PlaylistId) -> Result<Vec<Track>> {
        tracks::list(&self.pool, id).await
    }

    async fn insert_track(&self, id: &PlaylistId, track: NewTrack) -> Result<Track> {
        let _guard = self.locks.acquire(id).await;
        tracks::insert(&self.pool, id, track).await
    }

    async fn delete_track(&self, id: &PlaylistId, track_id: &TrackId) -> Result<DeletedTrack> {
        let _guard = self.locks.acquire(id).await;
        tracks::delete(&self.pool, id, track_id).await
    }

    async fn move_track(
        &self,
        id: &PlaylistId,
        track_id: &TrackId,
        new_position: i64,
    ) -> Result<TrackMove> {
        let _guard = self.locks.acquire(id).await;
        tracks::move_to(&self.pool, id, track_id, new_position).await
    }

    // Votes
    async fn cast_vote(
        &self,
        id: &PlaylistId,
        track_id: &TrackId,
        voter: &UserId,
        policy: VotePolicy,
    ) -> Result<VoteOutcome> {
        let _guard = self.locks.acquire(id).await;
        votes::cast(&self.pool, id, track_id, voter, policy).await
    }

    // Playback
    async fn next_track(
        &self,
        id: &PlaylistId,
        expected_current: Option<&TrackId>,
        now: DateTime<Utc>,
    ) -> Result<Advance> {
        let _guard = self.locks.acquire(id).await;
        playback::next_track(&self.pool, id, expected_current, now).await
    }

    async fn player_state(&self, id: &PlaylistId) -> Result<PlayerState> {
        playback::state(&self.pool, id).await
    }

    async fn due_playlists(&self, now: DateTime<Utc>) -> Result<Vec<DueAdvance>> {
        playback::due(&self.pool, now).await
    }
}
