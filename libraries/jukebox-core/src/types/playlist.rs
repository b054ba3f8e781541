//! Playlist domain types and access policy

use crate::error::{JukeboxError, Result};
use crate::types::{PlaylistId, Track, TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum playlist name length, in characters
pub const MAX_PLAYLIST_NAME_LEN: usize = 100;

/// Who can see a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Anyone authenticated can view
    #[default]
    Public,
    /// Only the owner and invited users can view
    Private,
}

impl Visibility {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

/// Which non-owners may mutate track ordering and playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditMode {
    /// Every viewer may edit
    #[default]
    Everyone,
    /// Only invited users (and the owner) may edit
    #[serde(alias = "invited")]
    InvitedOnly,
}

impl EditMode {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Everyone => "everyone",
            Self::InvitedOnly => "invited",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "everyone" => Some(Self::Everyone),
            "invited" => Some(Self::InvitedOnly),
            _ => None,
        }
    }
}

/// Playlist with its playback state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Owner user ID
    pub owner_id: UserId,

    /// Display name
    pub name: String,

    /// Public or private
    pub visibility: Visibility,

    /// Edit policy for non-owners
    pub edit_mode: EditMode,

    /// Track currently playing, if any
    pub current_track_id: Option<TrackId>,

    /// When the current track started playing
    pub playing_started_at: Option<DateTime<Utc>>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    /// Whether `user` owns this playlist
    pub fn is_owner(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }

    /// Whether `user` may read this playlist
    pub fn can_view(&self, user: &UserId, invited: bool) -> bool {
        self.visibility == Visibility::Public || self.is_owner(user) || invited
    }

    /// Whether `user` may insert, move, delete, or advance playback
    pub fn can_edit(&self, user: &UserId, invited: bool) -> bool {
        if !self.can_view(user, invited) {
            return false;
        }

        match self.edit_mode {
            EditMode::Everyone => true,
            EditMode::InvitedOnly => self.is_owner(user) || invited,
        }
    }

    /// Fail with `Forbidden` unless `user` may view
    pub fn ensure_can_view(&self, user: &UserId, invited: bool) -> Result<()> {
        if self.can_view(user, invited) {
            Ok(())
        } else {
            Err(JukeboxError::forbidden(format!(
                "playlist {} is private",
                self.id
            )))
        }
    }

    /// Fail with `Forbidden` unless `user` may edit
    pub fn ensure_can_edit(&self, user: &UserId, invited: bool) -> Result<()> {
        if self.can_edit(user, invited) {
            Ok(())
        } else {
            Err(JukeboxError::forbidden(format!(
                "user {} may not edit playlist {}",
                user, self.id
            )))
        }
    }
}

/// Playlist together with its tracks in position order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetails {
    /// The playlist row
    #[serde(flatten)]
    pub playlist: Playlist,

    /// Tracks ordered by position
    pub tracks: Vec<Track>,
}

/// Request to create a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePlaylist {
    /// Owner user ID
    pub owner_id: UserId,

    /// Display name
    pub name: String,

    /// Public or private
    pub visibility: Visibility,

    /// Edit policy for non-owners
    pub edit_mode: EditMode,
}

impl CreatePlaylist {
    /// Trim and bound-check the name
    pub fn validate(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();

        if self.name.is_empty() {
            return Err(JukeboxError::validation("playlist name must not be empty"));
        }

        if self.name.chars().count() > MAX_PLAYLIST_NAME_LEN {
            return Err(JukeboxError::validation(format!(
                "playlist name exceeds {MAX_PLAYLIST_NAME_LEN} characters"
            )));
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(visibility: Visibility, edit_mode: EditMode) -> Playlist {
        Playlist {
            id: PlaylistId::new("p-1"),
            owner_id: UserId::new("owner"),
            name: "Test".to_string(),
            visibility,
            edit_mode,
            current_track_id: None,
            playing_started_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_can_always_edit() {
        let owner = UserId::new("owner");
        for visibility in [Visibility::Public, Visibility::Private] {
            for mode in [EditMode::Everyone, EditMode::InvitedOnly] {
                assert!(playlist(visibility, mode).can_edit(&owner, false));
            }
        }
    }

    #[test]
    fn everyone_mode_lets_any_viewer_edit() {
        let guest = UserId::new("guest");
        assert!(playlist(Visibility::Public, EditMode::Everyone).can_edit(&guest, false));
    }

    #[test]
    fn invited_mode_requires_invitation() {
        let guest = UserId::new("guest");
        let p = playlist(Visibility::Public, EditMode::InvitedOnly);

        assert!(p.can_view(&guest, false));
        assert!(!p.can_edit(&guest, false));
        assert!(p.can_edit(&guest, true));
    }

    #[test]
    fn private_playlist_hidden_from_strangers() {
        let guest = UserId::new("guest");
        let p = playlist(Visibility::Private, EditMode::Everyone);

        assert!(!p.can_view(&guest, false));
        assert!(!p.can_edit(&guest, false));
        assert!(matches!(
            p.ensure_can_view(&guest, false),
            Err(JukeboxError::Forbidden(_))
        ));
        assert!(p.can_edit(&guest, true));
    }

    #[test]
    fn mode_string_conversion() {
        assert_eq!(EditMode::InvitedOnly.as_str(), "invited");
        assert_eq!(EditMode::from_str("everyone"), Some(EditMode::Everyone));
        assert_eq!(Visibility::from_str("private"), Some(Visibility::Private));
        assert_eq!(Visibility::from_str("secret"), None);
    }

    #[test]
    fn create_playlist_rejects_blank_name() {
        let req = CreatePlaylist {
            owner_id: UserId::new("owner"),
            name: "   ".to_string(),
            visibility: Visibility::Public,
            edit_mode: EditMode::Everyone,
        };
        assert!(matches!(req.validate(), Err(JukeboxError::Validation(_))));
    }
}
