//! Track domain types

use crate::error::{JukeboxError, Result};
use crate::types::{PlaylistId, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum title/artist length, in characters
pub const MAX_TEXT_LEN: usize = 200;

/// Maximum provider/provider track id length, in characters
pub const MAX_PROVIDER_LEN: usize = 100;

/// Maximum thumbnail URL length, in characters
pub const MAX_URL_LEN: usize = 2048;

/// Lifecycle of a track with respect to playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackStatus {
    /// Waiting to be played
    #[default]
    Queued,
    /// The playlist's current track
    Playing,
    /// Already played
    Played,
}

impl TrackStatus {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Playing => "playing",
            Self::Played => "played",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "playing" => Some(Self::Playing),
            "played" => Some(Self::Played),
            _ => None,
        }
    }
}

/// A track in a playlist's ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Owning playlist
    pub playlist_id: PlaylistId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Streaming provider (e.g. "youtube")
    pub provider: Option<String>,

    /// Identifier of the track at the provider
    pub provider_track_id: Option<String>,

    /// Artwork URL
    pub thumbnail_url: Option<String>,

    /// Duration in milliseconds; 0 when unknown
    pub duration_ms: i64,

    /// Zero-based contiguous rank within the playlist
    pub position: i64,

    /// Number of votes received
    pub vote_count: i64,

    /// Playback lifecycle
    pub status: TrackStatus,

    /// Insertion timestamp
    pub created_at: DateTime<Utc>,
}

/// Request to insert a track at the end of a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrack {
    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Streaming provider
    #[serde(default)]
    pub provider: Option<String>,

    /// Identifier of the track at the provider
    #[serde(default)]
    pub provider_track_id: Option<String>,

    /// Artwork URL
    #[serde(default)]
    pub thumbnail_url: Option<String>,

    /// Duration in milliseconds
    #[serde(default)]
    pub duration_ms: i64,
}

impl NewTrack {
    /// Create a request with only the required fields
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            provider: None,
            provider_track_id: None,
            thumbnail_url: None,
            duration_ms: 0,
        }
    }

    /// Set the duration
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: i64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Trim text fields and enforce length bounds
    ///
    /// Blank optional fields collapse to `None`.
    pub fn validate(mut self) -> Result<Self> {
        self.title = required_text("title", &self.title, MAX_TEXT_LEN)?;
        self.artist = required_text("artist", &self.artist, MAX_TEXT_LEN)?;
        self.provider = optional_text("provider", self.provider, MAX_PROVIDER_LEN)?;
        self.provider_track_id =
            optional_text("providerTrackId", self.provider_track_id, MAX_PROVIDER_LEN)?;
        self.thumbnail_url = optional_text("thumbnailUrl", self.thumbnail_url, MAX_URL_LEN)?;

        if self.duration_ms < 0 {
            return Err(JukeboxError::validation("durationMs must not be negative"));
        }

        Ok(self)
    }
}

fn required_text(field: &str, value: &str, max: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(JukeboxError::validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max {
        return Err(JukeboxError::validation(format!(
            "{field} exceeds {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn optional_text(field: &str, value: Option<String>, max: usize) -> Result<Option<String>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > max => Err(JukeboxError::validation(format!(
            "{field} exceeds {max} characters"
        ))),
        Some(v) => Ok(Some(v.to_string())),
    }
}

/// Result of a successful move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMove {
    /// Moved track
    pub track_id: TrackId,
    /// Position before the move
    pub from: i64,
    /// Position after the move (after clamping)
    pub to: i64,
}

impl TrackMove {
    /// Whether the move left every position unchanged
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Result of a successful delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTrack {
    /// Removed track
    pub track_id: TrackId,
    /// Position it occupied
    pub position: i64,
    /// True when the removed track was playing and playback stopped
    pub stopped_playback: bool,
}

/// Whether a user may vote for the same track more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotePolicy {
    /// Allow unlimited re-voting by the same user
    pub allow_repeat_votes: bool,
}

impl Default for VotePolicy {
    fn default() -> Self {
        Self {
            allow_repeat_votes: true,
        }
    }
}

/// Result of a successful vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    /// Voted track
    pub track_id: TrackId,
    /// New vote count
    pub vote_count: i64,
    /// New order of the queued segment, when the vote triggered a reorder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reordered: Option<Vec<TrackId>>,
}
