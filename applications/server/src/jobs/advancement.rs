/// Automatic advancement of finished tracks
use crate::services::QueueService;
use std::{sync::Arc, time::Duration};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Periodically advances every playlist whose playing track has run out
///
/// Goes through [`QueueService::advance`], the same transition a manual
/// skip uses, guarded by the track it saw as due so a skip that lands in
/// between is not followed by a second one. Due playlists advance
/// concurrently, and a tick in progress is abandoned on shutdown.
pub struct AdvancementScheduler {
    queue: Arc<QueueService>,
    interval: Duration,
}

impl AdvancementScheduler {
    pub fn new(queue: Arc<QueueService>, interval: Duration) -> Self {
        Self { queue, interval }
    }

    /// Start the scheduler on its own task
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Tick until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(interval_ms = self.interval.as_millis(), "Advancement scheduler started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    tokio::select! {
                        () = shutdown.cancelled() => break,
                        _ = self.tick() => {}
                    }
                }
            }
        }

        tracing::info!("Advancement scheduler stopped");
    }

    /// Advance every due playlist once; returns how many advanced
    ///
    /// Each playlist advances on its own task, so one slow playlist does not
    /// hold up the rest. Failures are logged and skipped; the playlist is
    /// reconsidered on the next tick. Dropping the returned future aborts
    /// the advances still running, which rolls their transactions back.
    pub async fn tick(&self) -> usize {
        let due = match self.queue.due_playlists().await {
            Ok(due) => due,
            Err(e) => {
                tracing::warn!("Failed to query due playlists: {}", e);
                return 0;
            }
        };

        let mut tasks = JoinSet::new();
        for item in due {
            let queue = Arc::clone(&self.queue);
            tasks.spawn(async move {
                let result = queue
                    .advance(&item.playlist_id, Some(&item.track_id))
                    .await;
                (item, result)
            });
        }

        let mut advanced = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((item, Ok(result))) if result.advanced => {
                    advanced += 1;
                    tracing::debug!(
                        playlist = %item.playlist_id,
                        finished = %item.track_id,
                        next = ?result.state.current_track_id,
                        "auto-advanced"
                    );
                }
                Ok((item, Ok(_))) => {
                    tracing::debug!(playlist = %item.playlist_id, "already advanced elsewhere");
                }
                Ok((item, Err(e))) => {
                    tracing::error!(
                        "Failed to advance playlist {}: {}",
                        item.playlist_id,
                        e
                    );
                }
                Err(e) => {
                    tracing::error!("Advance task failed: {}", e);
                }
            }
        }

        advanced
    }
}
