use std::net::SocketAddrV4;

use filemesh_primitives::file::{FileDescriptor, FileId};
use filemesh_primitives::peer::PeerIdentity;
use filemesh_primitives::DurationSinceUnixEpoch;
use parking_lot::Mutex;

use super::Repository;
use crate::state::{PersistentRegistry, State};
use crate::Error;

#[derive(Default, Debug)]
pub struct RegistryMutexParkingLot {
    state: Mutex<State>,
}

impl Repository for RegistryMutexParkingLot {
    fn add_file(&self, name: &str, size: u64) -> Result<FileDescriptor, Error> {
        self.state.lock().add_file(name, size)
    }

    fn touch_peer(&self, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> PeerIdentity {
        self.state.lock().touch_peer(address, now)
    }

    fn register_seed(&self, file_id: FileId, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<(), Error> {
        self.state.lock().register_seed(file_id, address, now)
    }

    fn upload(&self, name: &str, size: u64, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<FileDescriptor, Error> {
        self.state.lock().upload(name, size, address, now)
    }

    fn update(&self, file_ids: &[FileId], address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<(), Error> {
        self.state.lock().register_seeds(file_ids, address, now)
    }

    fn list_files(&self) -> Vec<FileDescriptor> {
        self.state.lock().list_files()
    }

    fn active_seeds(&self, file_id: FileId, current_cutoff: DurationSinceUnixEpoch) -> Result<Vec<PeerIdentity>, Error> {
        self.state.lock().active_seeds(file_id, current_cutoff)
    }

    fn remove_inactive_seeds(&self, current_cutoff: DurationSinceUnixEpoch) -> usize {
        self.state.lock().remove_inactive_seeds(current_cutoff)
    }

    fn export(&self, current_cutoff: DurationSinceUnixEpoch) -> PersistentRegistry {
        self.state.lock().export(current_cutoff)
    }

    fn import(&self, persistent: &PersistentRegistry) -> Result<(), Error> {
        let state = State::import(persistent)?;

        *self.state.lock() = state;

        Ok(())
    }
}
