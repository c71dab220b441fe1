//! The registry data, without synchronization.
//!
//! [`State`] is what the lock backends in [`repository`](crate::repository)
//! guard. Its methods take `&mut self`, so any sequence of calls made while
//! holding the lock is atomic for other handlers.
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::net::SocketAddrV4;

use filemesh_primitives::file::{FileDescriptor, FileId};
use filemesh_primitives::peer::PeerIdentity;
use filemesh_primitives::DurationSinceUnixEpoch;

use crate::Error;

/// A catalog entry together with its active seeds, as written to and read
/// from the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFile {
    pub descriptor: FileDescriptor,
    pub seeds: Vec<PeerIdentity>,
}

/// The whole registry in catalog order.
pub type PersistentRegistry = Vec<PersistedFile>;

#[derive(Debug, Clone)]
pub struct State {
    files: Vec<FileDescriptor>,
    peers: HashMap<SocketAddrV4, PeerIdentity>,
    seeds: HashMap<FileId, Vec<SocketAddrV4>>,
    next_id: Option<FileId>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            files: Vec::default(),
            peers: HashMap::default(),
            seeds: HashMap::default(),
            next_id: Some(FileId::FIRST),
        }
    }
}

impl State {
    /// It appends a new file to the catalog with a fresh id and an empty
    /// seed-set.
    ///
    /// # Errors
    ///
    /// Will return `FileIdSpaceExhausted` when every id has been handed out.
    #[track_caller]
    pub fn add_file(&mut self, name: &str, size: u64) -> Result<FileDescriptor, Error> {
        let Some(id) = self.next_id else {
            return Err(Error::FileIdSpaceExhausted {
                location: std::panic::Location::caller(),
            });
        };

        self.next_id = id.next();

        let file = FileDescriptor::new(id, name.to_owned(), size);

        self.files.push(file.clone());
        self.seeds.insert(id, Vec::new());

        Ok(file)
    }

    /// It returns the peer at `address` with `last_seen` set to `now`,
    /// inserting it into the directory if it was unknown.
    pub fn touch_peer(&mut self, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> PeerIdentity {
        let peer = self
            .peers
            .entry(address)
            .and_modify(|peer| peer.last_seen = now)
            .or_insert_with(|| PeerIdentity::from((address, now)));

        *peer
    }

    /// It touches the peer and adds it to the file's seed-set unless it is
    /// already there.
    ///
    /// # Errors
    ///
    /// Will return `FileNotFound` if the file is not in the catalog. The peer
    /// directory is not modified in that case.
    #[track_caller]
    pub fn register_seed(&mut self, file_id: FileId, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<(), Error> {
        if !self.seeds.contains_key(&file_id) {
            return Err(Error::file_not_found(file_id));
        }

        self.touch_peer(address, now);

        if let Some(seeds) = self.seeds.get_mut(&file_id) {
            if !seeds.contains(&address) {
                seeds.push(address);
            }
        }

        Ok(())
    }

    /// It registers the peer as a seed of every file, or of none of them.
    ///
    /// # Errors
    ///
    /// Will return `FileNotFound` for the first unknown file, before any
    /// change is made.
    #[track_caller]
    pub fn register_seeds(&mut self, file_ids: &[FileId], address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<(), Error> {
        if let Some(unknown) = file_ids.iter().find(|file_id| !self.seeds.contains_key(file_id)) {
            return Err(Error::file_not_found(*unknown));
        }

        for file_id in file_ids {
            self.register_seed(*file_id, address, now)?;
        }

        Ok(())
    }

    /// It publishes a file with `address` as its first seed.
    ///
    /// # Errors
    ///
    /// Will return `FileIdSpaceExhausted` when no id is left.
    #[track_caller]
    pub fn upload(&mut self, name: &str, size: u64, address: SocketAddrV4, now: DurationSinceUnixEpoch) -> Result<FileDescriptor, Error> {
        let file = self.add_file(name, size)?;

        self.register_seed(file.id, address, now)?;

        Ok(file)
    }

    #[must_use]
    pub fn list_files(&self) -> Vec<FileDescriptor> {
        self.files.clone()
    }

    /// It removes the stale seeds of a file and returns the remaining ones in
    /// seed-set order.
    ///
    /// This is not a pure query: eviction is a side effect of the read.
    ///
    /// # Errors
    ///
    /// Will return `FileNotFound` if the file is not in the catalog.
    #[track_caller]
    pub fn active_seeds(&mut self, file_id: FileId, current_cutoff: DurationSinceUnixEpoch) -> Result<Vec<PeerIdentity>, Error> {
        let peers = &self.peers;

        let Some(seeds) = self.seeds.get_mut(&file_id) else {
            return Err(Error::file_not_found(file_id));
        };

        seeds.retain(|address| peers.get(address).is_some_and(|peer| !peer.is_stale(current_cutoff)));

        Ok(seeds.iter().filter_map(|address| peers.get(address).copied()).collect())
    }

    /// It removes stale seeds from every seed-set and returns how many
    /// entries were removed. Peers stay in the directory.
    pub fn remove_inactive_seeds(&mut self, current_cutoff: DurationSinceUnixEpoch) -> usize {
        let peers = &self.peers;
        let mut removed = 0;

        for seeds in self.seeds.values_mut() {
            let before = seeds.len();
            seeds.retain(|address| peers.get(address).is_some_and(|peer| !peer.is_stale(current_cutoff)));
            removed += before - seeds.len();
        }

        removed
    }

    /// It returns the catalog with the seeds that are still active, without
    /// evicting anything.
    #[must_use]
    pub fn export(&self, current_cutoff: DurationSinceUnixEpoch) -> PersistentRegistry {
        self.files
            .iter()
            .map(|file| {
                let seeds = self
                    .seeds
                    .get(&file.id)
                    .map(|seeds| {
                        seeds
                            .iter()
                            .filter_map(|address| self.peers.get(address))
                            .filter(|peer| !peer.is_stale(current_cutoff))
                            .copied()
                            .collect()
                    })
                    .unwrap_or_default();

                PersistedFile {
                    descriptor: file.clone(),
                    seeds,
                }
            })
            .collect()
    }

    /// It builds the state from a snapshot. The id counter resumes after the
    /// highest id. A peer listed under several files keeps its most recent
    /// `last_seen`.
    ///
    /// # Errors
    ///
    /// Will return `DuplicateFileId` if two entries share an id.
    #[track_caller]
    pub fn import(persistent: &PersistentRegistry) -> Result<Self, Error> {
        let mut state = Self::default();

        for persisted in persistent {
            let id = persisted.descriptor.id;

            let Entry::Vacant(entry) = state.seeds.entry(id) else {
                return Err(Error::DuplicateFileId {
                    file_id: id,
                    location: std::panic::Location::caller(),
                });
            };

            let seeds = entry.insert(Vec::with_capacity(persisted.seeds.len()));

            for seed in &persisted.seeds {
                let address = seed.key();

                if !seeds.contains(&address) {
                    seeds.push(address);
                }

                state
                    .peers
                    .entry(address)
                    .and_modify(|peer| peer.last_seen = peer.last_seen.max(seed.last_seen))
                    .or_insert(*seed);
            }

            state.files.push(persisted.descriptor.clone());
        }

        state.next_id = match state.files.iter().map(|file| file.id).max() {
            Some(max) => max.next(),
            None => Some(FileId::FIRST),
        };

        Ok(state)
    }
}
