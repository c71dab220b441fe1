//! Tracker server job starter.
//!
//! The [`tracker::start_job`](crate::bootstrap::jobs::tracker::start_job)
//! function starts the tracker server and writes the snapshot when the
//! server stops.
use std::sync::Arc;

use filemesh_configuration::TrackerServer;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::core;
use crate::servers::tcp::spawner::Spawner;
use crate::servers::tcp::Server;
use crate::servers::tracker::{TrackerHandler, TRACKER_LOG_TARGET};

/// It starts a new tracker server with the provided configuration.
///
/// The returned job finishes once the server has stopped and the snapshot
/// has been written.
///
/// # Panics
///
/// It panics if the server can't be started.
pub async fn start_job(config: &TrackerServer, tracker: Arc<core::Tracker>) -> JoinHandle<()> {
    let bind_to = config.bind_address;

    let server = Server::new(Spawner::new(bind_to, TrackerHandler::new(tracker.clone())))
        .start()
        .await
        .expect("it should be able to start the tracker");

    info!(target: TRACKER_LOG_TARGET, "Tracker server listening on tcp://{}", server.state.binding);

    tokio::spawn(async move {
        if let Err(err) = server.state.task.await {
            error!(target: TRACKER_LOG_TARGET, %err, "the tracker server task failed");
        }

        match tracker.persist() {
            Ok(()) => info!(target: TRACKER_LOG_TARGET, "Tracker stopped, snapshot written"),
            Err(err) => error!(target: TRACKER_LOG_TARGET, %err, "Could not write the tracker snapshot"),
        }
    })
}
