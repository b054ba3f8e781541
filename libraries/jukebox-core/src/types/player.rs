//! Playback state machine types

use crate::types::{PlaylistId, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Externally visible player status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    /// A track is playing
    Playing,
    /// Nothing is playing
    Stopped,
}

/// Playback state of a playlist
///
/// Either `Stopped` (no current track, no start time) or `Playing(track,
/// started_at)`; the constructors keep the two fields consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Playlist this state belongs to
    pub playlist_id: PlaylistId,
    /// Current track, if playing
    pub current_track_id: Option<TrackId>,
    /// When the current track started
    pub playing_started_at: Option<DateTime<Utc>>,
    /// Playing or stopped
    pub status: PlayerStatus,
}

impl PlayerState {
    /// Stopped state
    pub fn stopped(playlist_id: PlaylistId) -> Self {
        Self {
            playlist_id,
            current_track_id: None,
            playing_started_at: None,
            status: PlayerStatus::Stopped,
        }
    }

    /// Playing state
    pub fn playing(playlist_id: PlaylistId, track_id: TrackId, started_at: DateTime<Utc>) -> Self {
        Self {
            playlist_id,
            current_track_id: Some(track_id),
            playing_started_at: Some(started_at),
            status: PlayerStatus::Playing,
        }
    }

    /// Build from the nullable playlist columns
    pub fn from_columns(
        playlist_id: PlaylistId,
        current_track_id: Option<TrackId>,
        playing_started_at: Option<DateTime<Utc>>,
    ) -> Self {
        match (current_track_id, playing_started_at) {
            (Some(track_id), Some(started_at)) => Self::playing(playlist_id, track_id, started_at),
            _ => Self::stopped(playlist_id),
        }
    }

    /// Whether a track is playing
    pub fn is_playing(&self) -> bool {
        self.status == PlayerStatus::Playing
    }
}

/// Outcome of a `NextTrack` transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// State after the transition
    pub state: PlayerState,
    /// False when a guarded call found the state already moved on
    pub advanced: bool,
}

/// A playlist whose current track has run past its duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueAdvance {
    /// Playlist to advance
    pub playlist_id: PlaylistId,
    /// Track observed as playing when the check ran
    pub track_id: TrackId,
}
