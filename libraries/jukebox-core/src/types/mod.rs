//! Domain types

mod ids;
mod player;
mod playlist;
mod track;

pub use ids::{PlaylistId, TrackId, UserId};
pub use player::{Advance, DueAdvance, PlayerState, PlayerStatus};
pub use playlist::{
    CreatePlaylist, EditMode, Playlist, PlaylistDetails, Visibility, MAX_PLAYLIST_NAME_LEN,
};
pub use track::{
    DeletedTrack, NewTrack, Track, TrackMove, TrackStatus, VoteOutcome, VotePolicy,
    MAX_PROVIDER_LEN, MAX_TEXT_LEN, MAX_URL_LEN,
};
