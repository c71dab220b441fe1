//! The core `tracker` module contains the generic tracker logic which is
//! independent of the delivery layer.
//!
//! It contains the tracker services and their dependencies. It's a domain
//! layer which does not specify how the end user should connect to the
//! tracker.
//!
//! Typically this module is intended to be used by higher modules like:
//!
//! - The tracker TCP server, in [`servers::tracker`](crate::servers::tracker)
//! - Background jobs, like the [seed sweep](crate::bootstrap::jobs::seed_sweep)
//!
//! ```text
//! Delivery layer     Domain layer
//!
//!     TCP tracker |
//!      Sweep job  |> Core tracker -> Registry
//!                 |              \-> Persistence
//! ```
//!
//! # Tracker
//!
//! The tracker never transfers file bytes. It keeps:
//!
//! - The catalog of published files.
//! - The peers it has heard from.
//! - For each file, the seeds: peers that declared they hold the file.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use filemesh::core::{persistence, Tracker};
//! use filemesh_configuration::Configuration;
//!
//! let config = Configuration::default();
//! let persistence = Arc::new(persistence::build(&config.core.snapshot_path));
//!
//! let tracker = Tracker::new(&config.core, persistence);
//! ```
//!
//! # Seed liveness
//!
//! A seed is active while `now - last_seen <= seed_timeout`. Seeds refresh
//! themselves with `UPDATE`. Stale seeds are evicted from a file when its
//! sources are requested, and optionally by the
//! [seed sweep job](crate::bootstrap::jobs::seed_sweep).
//!
//! Timestamps are recorded with millisecond resolution, the resolution of
//! the snapshot.
//!
//! # Persistence
//!
//! The catalog and the active seeds are saved to a snapshot file when the
//! tracker stops and loaded when it starts. See [`persistence`].
pub mod chunks;
pub mod error;
pub mod persistence;
pub mod services;

use std::net::SocketAddrV4;
use std::sync::Arc;
use std::time::Duration;

use filemesh_clock::clock::Time as _;
use filemesh_clock::conv::convert_from_timestamp_to_epoch_millis;
use filemesh_configuration::Core;
use filemesh_primitives::file::{FileDescriptor, FileId};
use filemesh_primitives::peer::PeerIdentity;
use filemesh_primitives::DurationSinceUnixEpoch;
use filemesh_registry::repository::Repository as _;
use filemesh_registry::RegistryMutexStd;
use tracing::{debug, info};

use self::error::Error;
use self::persistence::Persistence;
use crate::CurrentClock;

/// The registry implementation used by the tracker.
pub type Registry = RegistryMutexStd;

/// The domain layer tracker service.
///
/// Its main responsibility is to handle the requests of the tracker
/// protocol: list the catalog, publish files, return the active seeds of a
/// file and refresh seeds.
pub struct Tracker {
    seed_timeout: Duration,
    registry: Arc<Registry>,
    persistence: Arc<Box<dyn Persistence>>,
}

impl Tracker {
    #[must_use]
    pub fn new(config: &Core, persistence: Arc<Box<dyn Persistence>>) -> Tracker {
        Tracker {
            seed_timeout: config.seed_timeout(),
            registry: Arc::new(Registry::default()),
            persistence,
        }
    }

    /// It returns the catalog, in the order files were published.
    #[must_use]
    pub fn list_files(&self) -> Vec<FileDescriptor> {
        self.registry.list_files()
    }

    /// It publishes a file. The uploader becomes its first seed.
    ///
    /// # Errors
    ///
    /// Will return an error if the file id space is exhausted.
    pub fn upload(&self, name: &str, size: u64, seed: SocketAddrV4) -> Result<FileDescriptor, Error> {
        let file = self.registry.upload(name, size, seed, Self::now())?;

        debug!(file_id = %file.id, name, size, %seed, "file published");

        Ok(file)
    }

    /// It returns the active seeds of a file.
    ///
    /// Stale seeds are evicted from the file as a side effect.
    ///
    /// # Errors
    ///
    /// Will return a not-found error if the file is not in the catalog.
    pub fn sources(&self, file_id: FileId) -> Result<Vec<PeerIdentity>, Error> {
        Ok(self.registry.active_seeds(file_id, self.current_cutoff())?)
    }

    /// It refreshes `seed` and registers it as a seed of every given file.
    /// Either all the files are updated or none.
    ///
    /// # Errors
    ///
    /// Will return a not-found error if any of the files is not in the
    /// catalog.
    pub fn update(&self, seed: SocketAddrV4, file_ids: &[FileId]) -> Result<(), Error> {
        self.registry.update(file_ids, seed, Self::now())?;

        Ok(())
    }

    /// It removes the stale seeds of every file.
    pub fn remove_inactive_seeds(&self) -> usize {
        self.registry.remove_inactive_seeds(self.current_cutoff())
    }

    /// It replaces the registry with the saved snapshot, if there is one.
    ///
    /// # Errors
    ///
    /// Will return an error if the snapshot can't be read or is corrupt.
    pub fn load_from_snapshot(&self) -> Result<(), Error> {
        let Some(persistent) = self.persistence.load()? else {
            info!("No snapshot found, starting with an empty catalog");
            return Ok(());
        };

        self.registry.import(&persistent)?;

        info!(files = persistent.len(), "Snapshot loaded");

        Ok(())
    }

    /// It saves the catalog and the active seeds.
    ///
    /// # Errors
    ///
    /// Will return an error if the snapshot can't be written.
    pub fn persist(&self) -> Result<(), Error> {
        let persistent = self.registry.export(self.current_cutoff());

        self.persistence.save(&persistent)?;

        info!(files = persistent.len(), "Snapshot saved");

        Ok(())
    }

    fn now() -> DurationSinceUnixEpoch {
        let millis = convert_from_timestamp_to_epoch_millis(CurrentClock::now());

        Duration::from_millis(u64::try_from(millis).unwrap_or_default())
    }

    fn current_cutoff(&self) -> DurationSinceUnixEpoch {
        Self::now().checked_sub(self.seed_timeout).unwrap_or_default()
    }
}
