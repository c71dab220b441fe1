//! Errors returned by the core `Tracker`.
//!
//! Error | Context | Description
//! ---|---|---
//! `Registry` | Catalog | The file is unknown, or no file id is left.
//! `Persistence` | Snapshot | The snapshot can't be read, written or decoded.
use std::panic::Location;

use crate::core::persistence;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("registry error: {source}")]
    Registry { source: filemesh_registry::Error },

    #[error("persistence error: {source}, {location}")]
    Persistence {
        source: persistence::error::Error,
        location: &'static Location<'static>,
    },
}

impl From<filemesh_registry::Error> for Error {
    fn from(err: filemesh_registry::Error) -> Self {
        Self::Registry { source: err }
    }
}

impl From<persistence::error::Error> for Error {
    #[track_caller]
    fn from(err: persistence::error::Error) -> Self {
        Self::Persistence {
            source: err,
            location: Location::caller(),
        }
    }
}

impl Error {
    /// The unknown file id, when the error is a not-found condition.
    #[must_use]
    pub fn not_found_file_id(&self) -> Option<filemesh_primitives::file::FileId> {
        match self {
            Self::Registry { source } => source.not_found_file_id(),
            Self::Persistence { .. } => None,
        }
    }
}
