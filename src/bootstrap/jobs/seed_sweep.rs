//! Job that runs a task on intervals to remove stale seeds.
//!
//! **Stale seeds** are seeds that have not sent an `UPDATE` for more than
//! `seed_timeout` milliseconds. Without this job they are only removed from
//! a file when its sources are requested.
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::core;
use crate::servers::signals::global_shutdown_signal;

/// It starts a job removing stale seeds every `interval`.
///
/// The job stops on `ctrl_c`, `SIGTERM` or when the tracker is dropped.
#[must_use]
pub fn start_job(interval: Duration, tracker: &Arc<core::Tracker>) -> JoinHandle<()> {
    let weak_tracker = std::sync::Arc::downgrade(tracker);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(interval);
        interval.tick().await;

        loop {
            tokio::select! {
                () = global_shutdown_signal() => {
                    tracing::info!("Stopping stale seed sweep job..");
                    break;
                }
                _ = interval.tick() => {
                    if let Some(tracker) = weak_tracker.upgrade() {
                        let start_time = Utc::now().time();
                        tracing::info!("Removing stale seeds..");
                        let removed = tracker.remove_inactive_seeds();
                        tracing::info!("Removed {removed} stale seeds in: {}ms", (Utc::now().time() - start_time).num_milliseconds());
                    } else {
                        break;
                    }
                }
            }
        }
    })
}
