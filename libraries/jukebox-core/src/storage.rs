//! Storage trait for the playlist engine

use crate::error::Result;
use crate::types::{
    Advance, CreatePlaylist, DeletedTrack, DueAdvance, NewTrack, PlayerState, Playlist,
    PlaylistId, Track, TrackId, TrackMove, UserId, VoteOutcome, VotePolicy,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable, transactional store behind the ordering and playback engine
///
/// Every mutating method runs in its own transaction and serializes against
/// other mutations of the same playlist. Nothing is cached in process: each
/// call observes the authoritative state.
#[async_trait]
pub trait QueueStore: Send + Sync {
    // ========================================================================
    // Playlists
    // ========================================================================

    /// Create a playlist in the stopped state
    async fn create_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist>;

    /// Get playlist by ID
    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>>;

    /// Whether `user_id` has been invited to the playlist
    async fn is_invited(&self, id: &PlaylistId, user_id: &UserId) -> Result<bool>;

    /// Record an invitation (idempotent)
    async fn invite_user(&self, id: &PlaylistId, user_id: &UserId) -> Result<()>;

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Tracks in position order
    async fn list_tracks(&self, id: &PlaylistId) -> Result<Vec<Track>>;

    /// Append a queued track at position `count`
    async fn insert_track(&self, id: &PlaylistId, track: NewTrack) -> Result<Track>;

    /// Remove a track and close the gap it leaves
    async fn delete_track(&self, id: &PlaylistId, track_id: &TrackId) -> Result<DeletedTrack>;

    /// Move a track to `new_position` (clamped), shifting the tracks in between
    async fn move_track(
        &self,
        id: &PlaylistId,
        track_id: &TrackId,
        new_position: i64,
    ) -> Result<TrackMove>;

    // ========================================================================
    // Votes
    // ========================================================================

    /// Count a vote and, for queued tracks, reorder the queued segment
    async fn cast_vote(
        &self,
        id: &PlaylistId,
        track_id: &TrackId,
        voter: &UserId,
        policy: VotePolicy,
    ) -> Result<VoteOutcome>;

    // ========================================================================
    // Playback
    // ========================================================================

    /// The `NextTrack` transition
    ///
    /// With `expected_current` set, the transition only fires while that
    /// track is still the current one; otherwise it returns the present
    /// state with `advanced == false`.
    async fn next_track(
        &self,
        id: &PlaylistId,
        expected_current: Option<&TrackId>,
        now: DateTime<Utc>,
    ) -> Result<Advance>;

    /// Current player state
    async fn player_state(&self, id: &PlaylistId) -> Result<PlayerState>;

    /// Playlists whose playing track has outlived its duration at `now`
    async fn due_playlists(&self, now: DateTime<Utc>) -> Result<Vec<DueAdvance>>;
}
