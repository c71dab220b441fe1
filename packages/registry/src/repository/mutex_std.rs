use std::net::SocketAddrV4;
use std::sync::{Mutex, MutexGuard};

use filemesh_primitives::file::{FileDescriptor, FileId};
use filemesh_primitives::peer::PeerIdentity;
use filemesh_primitives::DurationSinceUnixEpoch;

use super::Repository;
use crate::state::{PersistentRegistry, State};
use crate::Error;

#[derive(Default, Debug)]
pub struct RegistryMutexStd {
    state: Mutex<State>,
}

impl RegistryMutexStd {
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("it should get the registry lock")
    }
}

impl Repository for RegistryMutexStd {
    fn add_file(&self, name: &str, size: u64) -> Result<FileDescriptor, Error> {
        self.lock().add_file(name, size)
    }

    fn touch_peer(&self, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> PeerIdentity {
        self.lock().touch_peer(address, now)
    }

    fn register_seed(&self, file_id: FileId, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<(), Error> {
        self.lock().register_seed(file_id, address, now)
    }

    fn upload(&self, name: &str, size: u64, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<FileDescriptor, Error> {
        self.lock().upload(name, size, address, now)
    }

    fn update(&self, file_ids: &[FileId], address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<(), Error> {
        self.lock().register_seeds(file_ids, address, now)
    }

    fn list_files(&self) -> Vec<FileDescriptor> {
        self.lock().list_files()
    }

    fn active_seeds(&self, file_id: FileId, current_cutoff: DurationSinceUnixEpoch) -> Result<Vec<PeerIdentity>, Error> {
        self.lock().active_seeds(file_id, current_cutoff)
    }

    fn remove_inactive_seeds(&self, current_cutoff: DurationSinceUnixEpoch) -> usize {
        self.lock().remove_inactive_seeds(current_cutoff)
    }

    fn export(&self, current_cutoff: DurationSinceUnixEpoch) -> PersistentRegistry {
        self.lock().export(current_cutoff)
    }

    fn import(&self, persistent: &PersistentRegistry) -> Result<(), Error> {
        let state = State::import(persistent)?;

        *self.lock() = state;

        Ok(())
    }
}
