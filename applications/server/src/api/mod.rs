/// API route modules
pub mod health;
pub mod playback;
pub mod playlists;
pub mod tracks;
