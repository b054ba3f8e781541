/// Playlist queue service
///
/// Sits between the HTTP handlers (and the advancement scheduler) and the
/// store: applies the access policy, runs the transactional operation and
/// publishes the resulting change events once it has committed.
use chrono::Utc;
use jukebox_core::{
    error::Result, types::*, ChangeEvent, EventPublisher, JukeboxError, QueueStore,
};
use std::sync::Arc;

pub struct QueueService {
    store: Arc<dyn QueueStore>,
    events: Arc<dyn EventPublisher>,
    vote_policy: VotePolicy,
}

impl QueueService {
    pub fn new(
        store: Arc<dyn QueueStore>,
        events: Arc<dyn EventPublisher>,
        vote_policy: VotePolicy,
    ) -> Self {
        Self {
            store,
            events,
            vote_policy,
        }
    }

    // ========================================================================
    // Playlists
    // ========================================================================

    pub async fn create_playlist(&self, request: CreatePlaylist) -> Result<Playlist> {
        let playlist = self.store.create_playlist(request.validate()?).await?;
        tracing::info!(playlist = %playlist.id, owner = %playlist.owner_id, "playlist created");
        Ok(playlist)
    }

    pub async fn get_playlist(&self, requester: &UserId, id: &PlaylistId) -> Result<PlaylistDetails> {
        let playlist = self.viewable(requester, id).await?;
        let tracks = self.store.list_tracks(id).await?;
        Ok(PlaylistDetails { playlist, tracks })
    }

    /// Invite `user` to the playlist; owner only
    pub async fn invite(&self, requester: &UserId, id: &PlaylistId, user: &UserId) -> Result<()> {
        let playlist = self.load(id).await?;
        if !playlist.is_owner(requester) {
            return Err(JukeboxError::forbidden(format!(
                "only the owner may invite to playlist {id}"
            )));
        }

        self.store.invite_user(id, user).await?;
        tracing::info!(playlist = %id, user = %user, "user invited");
        Ok(())
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    pub async fn list_tracks(&self, requester: &UserId, id: &PlaylistId) -> Result<Vec<Track>> {
        self.viewable(requester, id).await?;
        self.store.list_tracks(id).await
    }

    pub async fn insert_track(
        &self,
        requester: &UserId,
        id: &PlaylistId,
        track: NewTrack,
    ) -> Result<Track> {
        let track = track.validate()?;
        self.editable(requester, id).await?;

        let created = self.store.insert_track(id, track).await?;

        self.events.publish(ChangeEvent::TrackAdded {
            playlist_id: id.clone(),
            track: created.clone(),
        });

        Ok(created)
    }

    pub async fn move_track(
        &self,
        requester: &UserId,
        id: &PlaylistId,
        track_id: &TrackId,
        new_position: i64,
    ) -> Result<TrackMove> {
        if new_position < 0 {
            return Err(JukeboxError::validation("newPosition must not be negative"));
        }
        self.editable(requester, id).await?;

        let moved = self.store.move_track(id, track_id, new_position).await?;

        if !moved.is_noop() {
            self.events.publish(ChangeEvent::TrackMoved {
                playlist_id: id.clone(),
                track_id: moved.track_id.clone(),
                from: moved.from,
                to: moved.to,
            });
        }

        Ok(moved)
    }

    pub async fn delete_track(
        &self,
        requester: &UserId,
        id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<DeletedTrack> {
        self.editable(requester, id).await?;

        let deleted = self.store.delete_track(id, track_id).await?;

        self.events.publish(ChangeEvent::TrackDeleted {
            playlist_id: id.clone(),
            track_id: deleted.track_id.clone(),
            position: deleted.position,
        });
        if deleted.stopped_playback {
            self.events.publish(PlayerState::stopped(id.clone()).into());
        }

        Ok(deleted)
    }

    // ========================================================================
    // Votes
    // ========================================================================

    pub async fn vote(
        &self,
        requester: &UserId,
        id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<VoteOutcome> {
        self.viewable(requester, id).await?;

        let outcome = self
            .store
            .cast_vote(id, track_id, requester, self.vote_policy)
            .await?;

        self.events.publish(ChangeEvent::TrackUpdated {
            playlist_id: id.clone(),
            track_id: outcome.track_id.clone(),
            vote_count: outcome.vote_count,
        });
        if let Some(track_ids) = &outcome.reordered {
            self.events.publish(ChangeEvent::PlaylistReordered {
                playlist_id: id.clone(),
                track_ids: track_ids.clone(),
            });
        }

        Ok(outcome)
    }

    // ========================================================================
    // Playback
    // ========================================================================

    pub async fn player_state(&self, requester: &UserId, id: &PlaylistId) -> Result<PlayerState> {
        self.viewable(requester, id).await?;
        self.store.player_state(id).await
    }

    /// Manual skip requested by a user
    pub async fn next_track(&self, requester: &UserId, id: &PlaylistId) -> Result<PlayerState> {
        self.editable(requester, id).await?;
        Ok(self.advance(id, None).await?.state)
    }

    /// The `NextTrack` transition shared by manual skips and the scheduler
    ///
    /// Publishes `player.state_changed` only when the player actually moved.
    pub async fn advance(&self, id: &PlaylistId, expected_current: Option<&TrackId>) -> Result<Advance> {
        let advance = self.store.next_track(id, expected_current, Utc::now()).await?;

        if advance.advanced {
            self.events.publish(advance.state.clone().into());
        }

        Ok(advance)
    }

    /// Playlists whose current track has finished
    pub async fn due_playlists(&self) -> Result<Vec<DueAdvance>> {
        self.store.due_playlists(Utc::now()).await
    }

    // ========================================================================
    // Access
    // ========================================================================

    async fn load(&self, id: &PlaylistId) -> Result<Playlist> {
        self.store
            .get_playlist(id)
            .await?
            .ok_or_else(|| JukeboxError::not_found("Playlist", id.as_str()))
    }

    async fn invited(&self, playlist: &Playlist, requester: &UserId) -> Result<bool> {
        if playlist.is_owner(requester) {
            return Ok(false);
        }
        self.store.is_invited(&playlist.id, requester).await
    }

    async fn viewable(&self, requester: &UserId, id: &PlaylistId) -> Result<Playlist> {
        let playlist = self.load(id).await?;
        let invited = self.invited(&playlist, requester).await?;
        playlist.ensure_can_view(requester, invited)?;
        Ok(playlist)
    }

    async fn editable(&self, requester: &UserId, id: &PlaylistId) -> Result<Playlist> {
        let playlist = self.load(id).await?;
        let invited = self.invited(&playlist, requester).await?;
        playlist.ensure_can_edit(requester, invited)?;
        Ok(playlist)
    }
}
