//! Per-playlist mutation locks
//!
//! SQLite only has a database-wide writer lock. Waiting for a playlist in
//! there would make every other playlist wait too, so mutations first queue
//! on an in-process mutex for their playlist and open the write transaction
//! only once they own it. The write lock is then held for a single short
//! transaction at a time.

use jukebox_core::types::PlaylistId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Guard for one playlist; mutations of that playlist wait until it drops
pub type PlaylistGuard = OwnedMutexGuard<()>;

/// Lock table keyed by playlist
#[derive(Debug, Clone, Default)]
pub struct PlaylistLocks {
    inner: Arc<Mutex<HashMap<PlaylistId, Arc<AsyncMutex<()>>>>>,
}

impl PlaylistLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`
    ///
    /// Different playlists never wait on each other.
    pub async fn acquire(&self, id: &PlaylistId) -> PlaylistGuard {
        let lock = {
            let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

            // Entries nobody holds or waits on are only referenced by the table
            table.retain(|_, lock| Arc::strong_count(lock) > 1);

            Arc::clone(table.entry(id.clone()).or_default())
        };

        lock.lock_owned().await
    }

    /// Playlists currently held or waited on
    pub fn active(&self) -> usize {
        let table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        table
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}
