use std::time::Duration;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::DEFAULT_SEED_TIMEOUT;

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Core {
    /// File where the tracker keeps its catalog and seed lists between runs.
    /// It's read when the tracker starts and rewritten when it stops.
    #[serde(default = "Core::default_snapshot_path")]
    pub snapshot_path: Utf8PathBuf,

    /// Maximum time in milliseconds a seed can go without an `UPDATE` before
    /// it stops being reported by `SOURCES`.
    #[serde(default = "Core::default_seed_timeout")]
    pub seed_timeout: u64,

    /// Interval in seconds of the job removing stale seeds from every file.
    /// When absent or `0`, stale seeds are only removed when their file is
    /// queried.
    #[serde(default = "Core::default_inactive_seed_cleanup_interval")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive_seed_cleanup_interval: Option<u64>,
}

impl Default for Core {
    fn default() -> Self {
        Self {
            snapshot_path: Self::default_snapshot_path(),
            seed_timeout: Self::default_seed_timeout(),
            inactive_seed_cleanup_interval: Self::default_inactive_seed_cleanup_interval(),
        }
    }
}

impl Core {
    fn default_snapshot_path() -> Utf8PathBuf {
        Utf8PathBuf::from("./storage/tracker/lib/snapshot.bin")
    }

    #[allow(clippy::cast_possible_truncation)]
    fn default_seed_timeout() -> u64 {
        DEFAULT_SEED_TIMEOUT.as_millis() as u64
    }

    fn default_inactive_seed_cleanup_interval() -> Option<u64> {
        None
    }

    #[must_use]
    pub fn seed_timeout(&self) -> Duration {
        Duration::from_millis(self.seed_timeout)
    }

    /// The period of the stale seed sweep, if it's enabled.
    #[must_use]
    pub fn seed_cleanup_interval(&self) -> Option<Duration> {
        self.inactive_seed_cleanup_interval
            .filter(|seconds| *seconds > 0)
            .map(Duration::from_secs)
    }
}
