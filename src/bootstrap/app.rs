//! Setup for the main application.
//!
//! The [`setup`] only builds the application and its dependencies but it
//! does not start the application. In fact, there is no such thing as the
//! main application process. When the application starts, the only thing it
//! does is starting a bunch of independent jobs. If you are looking for how
//! things are called when new jobs are started, you should read [`app::start`](crate::app::start).
//!
//! Setup steps:
//!
//! 1. Load the global application configuration.
//! 2. Initialize static variables.
//! 3. Initialize logging.
//! 4. Initialize the domain tracker and load the snapshot.
//!
//! The chunks the node seeds are loaded apart, with [`initialize_chunk_store`].
use std::sync::Arc;

use filemesh_clock::static_time;
use filemesh_configuration::Configuration;
use tracing::info;

use super::config::initialize_configuration;
use crate::bootstrap;
use crate::core::chunks::MemoryChunkStore;
use crate::core::services::tracker_factory;
use crate::core::Tracker;

/// It loads the configuration from the environment and builds the main domain [`Tracker`] struct.
#[must_use]
pub fn setup() -> (Arc<Configuration>, Arc<Tracker>) {
    let configuration = Arc::new(initialize_configuration());
    let tracker = initialize_with_configuration(&configuration);

    (configuration, tracker)
}

/// It initializes the application with the given configuration.
///
/// The configuration may be obtained from the environment (via config file or env vars).
#[must_use]
pub fn initialize_with_configuration(configuration: &Arc<Configuration>) -> Arc<Tracker> {
    initialize_static();
    initialize_logging(configuration);
    Arc::new(initialize_tracker(configuration))
}

/// It initializes the application static values.
///
/// These values are accessible throughout the entire life of the application.
pub fn initialize_static() {
    // Set the time of the application starting
    lazy_static::initialize(&static_time::TIME_AT_APP_START);
}

/// It builds the domain tracker and restores the snapshot, if any.
///
/// # Panics
///
/// Will panic if the snapshot can't be read or is corrupt. The tracker does
/// not start with a catalog it can't trust.
#[must_use]
pub fn initialize_tracker(config: &Configuration) -> Tracker {
    let tracker = tracker_factory(config);

    if let Err(err) = tracker.load_from_snapshot() {
        panic!("Could not load the tracker snapshot from {}: {err}", config.core.snapshot_path);
    }

    info!(files = tracker.list_files().len(), "Tracker initialized");

    tracker
}

/// It loads the files the node seeds from the working directory of the peer
/// data server. Without a peer data server the store is empty.
///
/// # Panics
///
/// Will panic if the manifest or a file it lists can't be read.
#[must_use]
pub fn initialize_chunk_store(config: &Configuration) -> Arc<MemoryChunkStore> {
    let Some(peer_server) = &config.peer_server else {
        return Arc::new(MemoryChunkStore::default());
    };

    let store = match MemoryChunkStore::load(&peer_server.current_dir, peer_server.chunk_size) {
        Ok(store) => store,
        Err(err) => panic!("Could not load the shared files from {}: {err}", peer_server.current_dir),
    };

    info!(files = store.file_ids().len(), current_dir = %peer_server.current_dir, "Chunk store initialized");

    Arc::new(store)
}

/// It initializes the log threshold, format and channel.
///
/// See [the logging setup](crate::bootstrap::logging::setup) for more info about logging.
pub fn initialize_logging(config: &Configuration) {
    bootstrap::logging::setup(config);
}
