//! filemesh application.
//!
//! The application has a global configuration for multiple jobs.
//! It's basically a container for other services.
//!
//! Jobs executed always:
//!
//! - Tracker server: it writes the snapshot when it stops.
//!
//! Optional jobs:
//!
//! - Peer data server: enabled with the `[peer_server]` section.
//! - Stale seed sweep: enabled with `core.inactive_seed_cleanup_interval`.
use std::sync::Arc;

use filemesh_configuration::Configuration;
use tokio::task::JoinHandle;
use tracing::info;

use crate::bootstrap::jobs::{peer_server, seed_sweep, tracker};
use crate::core;
use crate::core::chunks::ChunkStore;

/// It starts the application jobs. `store` holds the chunks the peer data
/// server hands out.
///
/// # Panics
///
/// Will panic if a server can't be started.
pub async fn start(config: &Configuration, tracker: Arc<core::Tracker>, store: Arc<dyn ChunkStore>) -> Vec<JoinHandle<()>> {
    let mut jobs: Vec<JoinHandle<()>> = Vec::new();

    // Start the stale seed sweep
    if let Some(interval) = config.core.seed_cleanup_interval() {
        jobs.push(seed_sweep::start_job(interval, &tracker));
    } else {
        info!("Stale seeds are only removed when their file sources are requested");
    }

    // Start the peer data server
    if let Some(peer_server_config) = &config.peer_server {
        jobs.push(peer_server::start_job(peer_server_config, store).await);
    } else {
        info!("No peer data server configured");
    }

    // Start the tracker server
    jobs.push(tracker::start_job(&config.tracker, tracker).await);

    jobs
}
