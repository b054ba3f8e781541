//! Jukebox Storage
//!
//! `SQLite` persistence for the playlist ordering & playback engine.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each concern owns its queries (`playlists`,
//!   `tracks`, `votes`, `playback`); `positions` holds the shared
//!   gap-free reposition primitives they build on
//! - **Per-playlist locking**: `SqliteQueueStore` queues mutations on an
//!   in-process lock per playlist, then opens a transaction whose first
//!   statement writes the owning playlist row. The row write also orders
//!   writers from other processes; those share SQLite's single writer
//!   lock and give up after [`BUSY_TIMEOUT`]
//! - **No caching**: every call reads the authoritative rows
//!
//! # Example
//!
//! ```rust,no_run
//! use jukebox_storage::{SqliteQueueStore, create_pool, run_migrations};
//! use jukebox_core::QueueStore;
//! use jukebox_core::types::PlaylistId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://jukebox.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteQueueStore::new(pool);
//! let tracks = store.list_tracks(&PlaylistId::new("p-1")).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod locks;
mod rows;

// Vertical slices
pub mod playback;
pub mod playlists;
pub mod positions;
pub mod tracks;
pub mod votes;

pub use context::SqliteQueueStore;
pub use error::StorageError;
pub use locks::{PlaylistGuard, PlaylistLocks};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;

/// How long a write waits for SQLite's database-wide writer lock
///
/// Waiting for a playlist happens on [`PlaylistLocks`], so this only
/// covers another connection's transaction in flight.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://jukebox.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal) // readers never block the single writer
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    tracing::debug!("Pool created");

    Ok(pool)
}
