//! Change events
//!
//! Events are published after a mutation commits and are consumed by an
//! external fan-out transport. Delivery is best-effort: the mutation is
//! already durable whatever happens to the event.
//!
//! On the wire every event is `{"type": <name>, "payload": {...}}`:
//!
//! ```rust
//! use jukebox_core::events::ChangeEvent;
//! use jukebox_core::types::{PlaylistId, TrackId};
//!
//! let event = ChangeEvent::TrackMoved {
//!     playlist_id: PlaylistId::new("p-1"),
//!     track_id: TrackId::new("t-1"),
//!     from: 2,
//!     to: 0,
//! };
//!
//! let json = serde_json::to_value(&event).unwrap();
//! assert_eq!(json["type"], "track.moved");
//! assert_eq!(json["payload"]["trackId"], "t-1");
//! ```

use crate::types::{PlayerState, PlayerStatus, PlaylistId, Track, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Externally observable change to a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ChangeEvent {
    /// A track was inserted at the end of the playlist
    #[serde(rename = "track.added", rename_all = "camelCase")]
    TrackAdded {
        /// Owning playlist
        playlist_id: PlaylistId,
        /// The created track
        track: Track,
    },

    /// A track was moved manually
    #[serde(rename = "track.moved", rename_all = "camelCase")]
    TrackMoved {
        /// Owning playlist
        playlist_id: PlaylistId,
        /// Moved track
        track_id: TrackId,
        /// Old position
        from: i64,
        /// New position
        to: i64,
    },

    /// A track was removed
    #[serde(rename = "track.deleted", rename_all = "camelCase")]
    TrackDeleted {
        /// Owning playlist
        playlist_id: PlaylistId,
        /// Removed track
        track_id: TrackId,
        /// Position it occupied
        position: i64,
    },

    /// A track's vote count changed
    #[serde(rename = "track.updated", rename_all = "camelCase")]
    TrackUpdated {
        /// Owning playlist
        playlist_id: PlaylistId,
        /// Voted track
        track_id: TrackId,
        /// New vote count
        vote_count: i64,
    },

    /// The queued segment was reordered by votes
    #[serde(rename = "playlist.reordered", rename_all = "camelCase")]
    PlaylistReordered {
        /// Reordered playlist
        playlist_id: PlaylistId,
        /// Queued tracks in their new order
        track_ids: Vec<TrackId>,
    },

    /// The player advanced or stopped
    #[serde(rename = "player.state_changed", rename_all = "camelCase")]
    PlayerStateChanged {
        /// Playlist whose player changed
        playlist_id: PlaylistId,
        /// Current track, if playing
        current_track_id: Option<TrackId>,
        /// When the current track started
        playing_started_at: Option<DateTime<Utc>>,
        /// Playing or stopped
        status: PlayerStatus,
    },
}

impl ChangeEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::TrackAdded { .. } => "track.added",
            Self::TrackMoved { .. } => "track.moved",
            Self::TrackDeleted { .. } => "track.deleted",
            Self::TrackUpdated { .. } => "track.updated",
            Self::PlaylistReordered { .. } => "playlist.reordered",
            Self::PlayerStateChanged { .. } => "player.state_changed",
        }
    }

    /// Playlist the event concerns
    pub fn playlist_id(&self) -> &PlaylistId {
        match self {
            Self::TrackAdded { playlist_id, .. }
            | Self::TrackMoved { playlist_id, .. }
            | Self::TrackDeleted { playlist_id, .. }
            | Self::TrackUpdated { playlist_id, .. }
            | Self::PlaylistReordered { playlist_id, .. }
            | Self::PlayerStateChanged { playlist_id, .. } => playlist_id,
        }
    }
}

impl From<PlayerState> for ChangeEvent {
    fn from(state: PlayerState) -> Self {
        Self::PlayerStateChanged {
            playlist_id: state.playlist_id,
            current_track_id: state.current_track_id,
            playing_started_at: state.playing_started_at,
            status: state.status,
        }
    }
}

/// Receives post-commit change notifications
///
/// Implementations must not block and must swallow their own failures:
/// a failed publish never affects an already-committed mutation.
pub trait EventPublisher: Send + Sync {
    /// Hand an event to the fan-out transport
    fn publish(&self, event: ChangeEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_state_event_uses_snake_case_type_name() {
        let event: ChangeEvent = PlayerState::stopped(PlaylistId::new("p-1")).into();
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "player.state_changed");
        assert_eq!(json["payload"]["playlistId"], "p-1");
        assert_eq!(json["payload"]["status"], "stopped");
        assert!(json["payload"]["currentTrackId"].is_null());
    }

    #[test]
    fn name_matches_serialized_type() {
        let event = ChangeEvent::PlaylistReordered {
            playlist_id: PlaylistId::new("p-1"),
            track_ids: vec![TrackId::new("b"), TrackId::new("a")],
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], event.name());
        assert_eq!(json["payload"]["trackIds"][0], "b");
    }

    #[test]
    fn events_round_trip_through_json() {
        let event = ChangeEvent::TrackUpdated {
            playlist_id: PlaylistId::new("p-1"),
            track_id: TrackId::new("t-1"),
            vote_count: 3,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ChangeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.playlist_id().as_str(), "p-1");
    }
}
