use std::net::SocketAddrV4;

use filemesh_primitives::file::{FileDescriptor, FileId};
use filemesh_primitives::peer::PeerIdentity;
use filemesh_primitives::DurationSinceUnixEpoch;
use filemesh_registry::repository::Repository as _;
use filemesh_registry::state::PersistentRegistry;
use filemesh_registry::{Error, RegistryMutexParkingLot, RegistryMutexStd};

#[derive(Debug)]
pub(crate) enum Repo {
    MutexStd(RegistryMutexStd),
    MutexParkingLot(RegistryMutexParkingLot),
}

impl Repo {
    pub(crate) fn upload(&self, name: &str, size: u64, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<FileDescriptor, Error> {
        match self {
            Repo::MutexStd(repo) => repo.upload(name, size, address, now),
            Repo::MutexParkingLot(repo) => repo.upload(name, size, address, now),
        }
    }

    pub(crate) fn add_file(&self, name: &str, size: u64) -> Result<FileDescriptor, Error> {
        match self {
            Repo::MutexStd(repo) => repo.add_file(name, size),
            Repo::MutexParkingLot(repo) => repo.add_file(name, size),
        }
    }

    pub(crate) fn register_seed(&self, file_id: FileId, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<(), Error> {
        match self {
            Repo::MutexStd(repo) => repo.register_seed(file_id, address, now),
            Repo::MutexParkingLot(repo) => repo.register_seed(file_id, address, now),
        }
    }

    pub(crate) fn update(&self, file_ids: &[FileId], address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<(), Error> {
        match self {
            Repo::MutexStd(repo) => repo.update(file_ids, address, now),
            Repo::MutexParkingLot(repo) => repo.update(file_ids, address, now),
        }
    }

    pub(crate) fn list_files(&self) -> Vec<FileDescriptor> {
        match self {
            Repo::MutexStd(repo) => repo.list_files(),
            Repo::MutexParkingLot(repo) => repo.list_files(),
        }
    }

    pub(crate) fn active_seeds(&self, file_id: FileId, current_cutoff: DurationSinceUnixEpoch) -> Result<Vec<PeerIdentity>, Error> {
        match self {
            Repo::MutexStd(repo) => repo.active_seeds(file_id, current_cutoff),
            Repo::MutexParkingLot(repo) => repo.active_seeds(file_id, current_cutoff),
        }
    }

    pub(crate) fn remove_inactive_seeds(&self, current_cutoff: DurationSinceUnixEpoch) -> usize {
        match self {
            Repo::MutexStd(repo) => repo.remove_inactive_seeds(current_cutoff),
            Repo::MutexParkingLot(repo) => repo.remove_inactive_seeds(current_cutoff),
        }
    }

    pub(crate) fn export(&self, current_cutoff: DurationSinceUnixEpoch) -> PersistentRegistry {
        match self {
            Repo::MutexStd(repo) => repo.export(current_cutoff),
            Repo::MutexParkingLot(repo) => repo.export(current_cutoff),
        }
    }

    pub(crate) fn import(&self, persistent: &PersistentRegistry) -> Result<(), Error> {
        match self {
            Repo::MutexStd(repo) => repo.import(persistent),
            Repo::MutexParkingLot(repo) => repo.import(persistent),
        }
    }
}
