//! Persistence errors.
use std::io;
use std::panic::Location;

use camino::Utf8PathBuf;

use super::snapshot::Corruption;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The snapshot exists but can't be read.
    #[error("unable to read the snapshot {path}: {source}, {location}")]
    Read {
        path: Utf8PathBuf,
        source: io::Error,
        location: &'static Location<'static>,
    },

    /// The snapshot can't be written.
    #[error("unable to write the snapshot {path}: {source}, {location}")]
    Write {
        path: Utf8PathBuf,
        source: io::Error,
        location: &'static Location<'static>,
    },

    /// The snapshot content does not follow the layout.
    #[error("the snapshot {path} is corrupt: {source}, {location}")]
    Corrupt {
        path: Utf8PathBuf,
        source: Corruption,
        location: &'static Location<'static>,
    },
}
