use std::net::SocketAddrV4;

use filemesh_primitives::file::{FileDescriptor, FileId};
use filemesh_primitives::peer::PeerIdentity;
use filemesh_primitives::DurationSinceUnixEpoch;

use crate::state::PersistentRegistry;
use crate::Error;

pub mod mutex_parking_lot;
pub mod mutex_std;

/// A registry shared by concurrent connection handlers.
///
/// Each method holds the registry lock for its whole duration, so composite
/// operations (`upload`, `update`) are seen either fully applied or not at
/// all.
pub trait Repository: Default + 'static {
    /// It appends a file to the catalog with a fresh id and no seeds.
    ///
    /// # Errors
    ///
    /// Will return `FileIdSpaceExhausted` when no id is left.
    fn add_file(&self, name: &str, size: u64) -> Result<FileDescriptor, Error>;

    /// It inserts the peer or refreshes its `last_seen` to `now`.
    fn touch_peer(&self, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> PeerIdentity;

    /// It touches the peer and adds it to the file's seed-set if it's not
    /// already there.
    ///
    /// # Errors
    ///
    /// Will return `FileNotFound` if the file is not in the catalog.
    fn register_seed(&self, file_id: FileId, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<(), Error>;

    /// It adds a file and registers `address` as its first seed.
    ///
    /// # Errors
    ///
    /// Will return `FileIdSpaceExhausted` when no id is left.
    fn upload(&self, name: &str, size: u64, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<FileDescriptor, Error>;

    /// It registers `address` as a seed of every file, or of none.
    ///
    /// # Errors
    ///
    /// Will return `FileNotFound` if any of the files is not in the catalog.
    fn update(&self, file_ids: &[FileId], address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<(), Error>;

    fn list_files(&self) -> Vec<FileDescriptor>;

    /// It evicts the file's seeds last seen before `current_cutoff` and
    /// returns the remaining ones.
    ///
    /// # Errors
    ///
    /// Will return `FileNotFound` if the file is not in the catalog.
    fn active_seeds(&self, file_id: FileId, current_cutoff: DurationSinceUnixEpoch) -> Result<Vec<PeerIdentity>, Error>;

    /// It evicts stale seeds from every file. Returns how many seed-set
    /// entries were removed.
    fn remove_inactive_seeds(&self, current_cutoff: DurationSinceUnixEpoch) -> usize;

    /// The catalog and the seeds still active at `current_cutoff`.
    fn export(&self, current_cutoff: DurationSinceUnixEpoch) -> PersistentRegistry;

    /// It replaces the registry contents with a snapshot.
    ///
    /// # Errors
    ///
    /// Will return `DuplicateFileId` if the snapshot lists an id twice. The
    /// registry is left untouched in that case.
    fn import(&self, persistent: &PersistentRegistry) -> Result<(), Error>;
}
