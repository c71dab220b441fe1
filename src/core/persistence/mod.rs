//! The persistence module.
//!
//! The tracker keeps its catalog and its seed-sets in memory. They are saved
//! to a binary snapshot file when the tracker stops and loaded back when it
//! starts.
//!
//! Persistence is implemented with one [`Persistence`] trait. There is one
//! implementation: [`SnapshotFile`].
//!
//! # Snapshot layout
//!
//! All integers are big-endian. Strings are a `u16` byte length followed by
//! UTF-8 bytes.
//!
//! Field | Type | Description
//! ---|---|---
//! `file_count` | `int32` | Number of catalog entries
//! `name` | `string` | File name, for each entry
//! `id` | `int32` | File id
//! `size` | `int64` | File size in bytes
//! `seed_count` | `int32` | Number of active seeds of the file
//! `address` | `4 bytes` | Seed IPv4 address, for each seed
//! `port` | `int16` | Seed port
//! `last_seen` | `int64` | Milliseconds since the Unix Epoch
//!
//! > **NOTICE**: the peer directory is not saved as such. It's rebuilt from
//! > the seeds, keeping the most recent `last_seen` of each peer.
pub mod error;
pub mod snapshot;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write as _};
use std::panic::Location;

use camino::{Utf8Path, Utf8PathBuf};
use filemesh_registry::state::PersistentRegistry;

use self::error::Error;

pub trait Persistence: Sync + Send {
    /// It loads the saved registry.
    ///
    /// # Errors
    ///
    /// Will return an error if the snapshot exists but can't be read or is
    /// corrupt. A missing snapshot is not an error: it returns `Ok(None)`.
    fn load(&self) -> Result<Option<PersistentRegistry>, Error>;

    /// It saves the registry, replacing the previous snapshot.
    ///
    /// # Errors
    ///
    /// Will return an error if the snapshot can't be written. The previous
    /// snapshot is kept in that case.
    fn save(&self, registry: &PersistentRegistry) -> Result<(), Error>;
}

/// A snapshot stored in a single file.
///
/// It's written to `<path>.tmp` first and then renamed over `<path>`, so a
/// crash while saving never leaves a partial snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: Utf8PathBuf,
}

impl SnapshotFile {
    #[must_use]
    pub fn new(path: &Utf8Path) -> Self {
        Self { path: path.to_owned() }
    }

    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn temp_path(&self) -> Utf8PathBuf {
        let mut temp = self.path.clone().into_string();
        temp.push_str(".tmp");
        Utf8PathBuf::from(temp)
    }

    fn write_temp(&self, registry: &PersistentRegistry) -> Result<Utf8PathBuf, io::Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();

        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);

        snapshot::encode(registry, &mut writer)?;

        writer.flush()?;
        writer.get_ref().sync_all()?;

        Ok(temp_path)
    }
}

impl Persistence for SnapshotFile {
    fn load(&self) -> Result<Option<PersistentRegistry>, Error> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(Error::Read {
                    path: self.path.clone(),
                    source: err,
                    location: Location::caller(),
                })
            }
        };

        let registry = snapshot::decode(&bytes).map_err(|source| Error::Corrupt {
            path: self.path.clone(),
            source,
            location: Location::caller(),
        })?;

        Ok(Some(registry))
    }

    fn save(&self, registry: &PersistentRegistry) -> Result<(), Error> {
        let temp_path = self.write_temp(registry).map_err(|source| Error::Write {
            path: self.temp_path(),
            source,
            location: Location::caller(),
        })?;

        fs::rename(&temp_path, &self.path).map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
            location: Location::caller(),
        })?;

        Ok(())
    }
}

/// It builds the persistence for the configured snapshot path.
#[must_use]
pub fn build(path: &Utf8Path) -> Box<dyn Persistence> {
    Box::new(SnapshotFile::new(path))
}
