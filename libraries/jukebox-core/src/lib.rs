//! Jukebox Core
//!
//! Storage-agnostic types, traits, and error handling for the collaborative
//! playlist engine.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Playlist`, `Track`, `PlayerState`, and their ids
//! - **Access Policy**: who may view, edit, and vote on a playlist
//! - **Change Events**: the `{"type", "payload"}` wire model published after commit
//! - **Core Traits**: `QueueStore` (persistence seam) and `EventPublisher` (fan-out seam)
//! - **Error Handling**: unified `JukeboxError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use jukebox_core::types::{CreatePlaylist, EditMode, NewTrack, UserId, Visibility};
//!
//! let owner = UserId::new("alice");
//! let playlist = CreatePlaylist {
//!     owner_id: owner,
//!     name: "Friday night".to_string(),
//!     visibility: Visibility::Public,
//!     edit_mode: EditMode::Everyone,
//! }
//! .validate()
//! .unwrap();
//!
//! let track = NewTrack::new("Neutron Dance", "Pointer Sisters").validate().unwrap();
//! assert_eq!(playlist.name, "Friday night");
//! assert_eq!(track.duration_ms, 0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{JukeboxError, Result};
pub use events::{ChangeEvent, EventPublisher};
pub use storage::QueueStore;

pub use types::{
    Advance, CreatePlaylist, DeletedTrack, DueAdvance, EditMode, NewTrack, PlayerState,
    PlayerStatus, Playlist, PlaylistDetails, PlaylistId, Track, TrackId, TrackMove, TrackStatus,
    UserId, Visibility, VoteOutcome, VotePolicy,
};
