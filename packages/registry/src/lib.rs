//! The tracker registry.
//!
//! The registry owns three collections that form a single consistency domain:
//!
//! - The catalog: the append-only list of published files.
//! - The peer directory: every peer the tracker has heard from, keyed by its
//!   `(address, port)` value.
//! - The seed-sets: for each file, the peers that declared they hold it.
//!   Seed-sets store directory keys, so refreshing a peer is seen by every
//!   seed-set the peer belongs to.
//!
//! Every operation that touches more than one collection runs under one lock
//! acquisition. There are two lock backends:
//!
//! - [`RegistryMutexStd`]: `std::sync::Mutex`.
//! - [`RegistryMutexParkingLot`]: `parking_lot::Mutex`.
//!
//! Both implement [`Repository`](crate::repository::Repository).
//!
//! The registry does not read the clock. Callers pass the current time and
//! the cutoff (`now - timeout`) under which seeds are considered stale.
use std::panic::Location;

use filemesh_clock::clock;
use filemesh_primitives::file::FileId;
use thiserror::Error;

pub mod repository;
pub mod state;

pub use repository::mutex_parking_lot::RegistryMutexParkingLot;
pub use repository::mutex_std::RegistryMutexStd;

/// Errors returned by registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("file {file_id} is not in the catalog, {location}")]
    FileNotFound {
        file_id: FileId,
        location: &'static Location<'static>,
    },

    #[error("the file id space is exhausted, {location}")]
    FileIdSpaceExhausted { location: &'static Location<'static> },

    #[error("file {file_id} appears more than once, {location}")]
    DuplicateFileId {
        file_id: FileId,
        location: &'static Location<'static>,
    },
}

impl Error {
    #[track_caller]
    pub(crate) fn file_not_found(file_id: FileId) -> Self {
        Self::FileNotFound {
            file_id,
            location: Location::caller(),
        }
    }

    /// The unknown file id, when this is a not-found error.
    #[must_use]
    pub fn not_found_file_id(&self) -> Option<FileId> {
        match self {
            Self::FileNotFound { file_id, .. } => Some(*file_id),
            _ => None,
        }
    }
}

/// This code needs to be copied into each crate.
/// Working version, for production.
#[cfg(not(test))]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Working;

/// Stopped version, for testing.
#[cfg(test)]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Stopped;
