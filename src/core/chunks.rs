//! Chunk storage of a node.
//!
//! A node splits each file it holds into fixed-size chunks. Any chunk can be
//! present or absent: a node that is still downloading a file only has some
//! of them. The peer data server answers `STAT` and `GET` from a
//! [`ChunkStore`].
//!
//! On startup the node loads the files it seeds from the manifest in its
//! working directory, [`MANIFEST_FILE_NAME`]:
//!
//! ```toml
//! [[files]]
//! id = 1
//! path = "movie.mp4"
//! ```
//!
//! Paths are relative to the working directory. The ids are the ones the
//! tracker returned when the files were uploaded.
//!
//! ```rust
//! use filemesh::core::chunks::FileContents;
//!
//! let contents = FileContents::split(b"abcdefg", 3);
//!
//! assert_eq!(contents.present_chunks(), vec![0, 1, 2]);
//! assert_eq!(contents.chunk(2), Some(&b"g"[..]));
//! ```
use std::collections::HashMap;
use std::fs;
use std::io;
use std::panic::Location;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use filemesh_primitives::file::FileId;
use filemesh_primitives::ChunkIndex;
#[cfg(test)]
use mockall::automock;
use parking_lot::RwLock;
use serde::Deserialize;

/// Name of the manifest listing the files a node seeds, in its working
/// directory.
pub const MANIFEST_FILE_NAME: &str = "shared.toml";

/// Error loading the files of a node working directory.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("the chunk size should be greater than zero, {location}")]
    ZeroChunkSize { location: &'static Location<'static> },

    #[error("unable to read {path}: {source}, {location}")]
    Read {
        path: Utf8PathBuf,
        source: io::Error,
        location: &'static Location<'static>,
    },

    #[error("the manifest {path} is malformed: {source}, {location}")]
    Manifest {
        path: Utf8PathBuf,
        source: toml::de::Error,
        location: &'static Location<'static>,
    },
}

#[derive(Deserialize, Debug, Default)]
struct Manifest {
    #[serde(default)]
    files: Vec<SharedFile>,
}

#[derive(Deserialize, Debug)]
struct SharedFile {
    id: u32,
    path: Utf8PathBuf,
}

/// The chunks of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileContents {
    /// The file size in bytes.
    pub contents_size: u64,
    /// One slot per chunk, in file order. `None` is an absent chunk.
    pub contents: Vec<Option<Vec<u8>>>,
}

impl FileContents {
    /// It splits a whole file in chunks of `chunk_size` bytes. The last chunk
    /// holds the remaining bytes.
    ///
    /// # Panics
    ///
    /// Will panic if `chunk_size` is zero.
    #[must_use]
    pub fn split(bytes: &[u8], chunk_size: u32) -> Self {
        assert!(chunk_size > 0, "the chunk size should be greater than zero");

        Self {
            contents_size: bytes.len() as u64,
            contents: bytes.chunks(chunk_size as usize).map(|chunk| Some(chunk.to_vec())).collect(),
        }
    }

    /// It returns the contents of a file of `contents_size` bytes with every
    /// chunk absent, ready to be filled while downloading.
    ///
    /// # Panics
    ///
    /// Will panic if `chunk_size` is zero.
    #[must_use]
    pub fn empty(contents_size: u64, chunk_size: u32) -> Self {
        assert!(chunk_size > 0, "the chunk size should be greater than zero");

        let chunks = contents_size.div_ceil(u64::from(chunk_size));

        Self {
            contents_size,
            contents: vec![None; usize::try_from(chunks).unwrap_or(usize::MAX)],
        }
    }

    /// The indices of the present chunks, ascending.
    #[must_use]
    pub fn present_chunks(&self) -> Vec<ChunkIndex> {
        self.contents
            .iter()
            .enumerate()
            .filter(|(_, chunk)| chunk.is_some())
            .filter_map(|(index, _)| ChunkIndex::try_from(index).ok())
            .collect()
    }

    #[must_use]
    pub fn chunk(&self, index: ChunkIndex) -> Option<&[u8]> {
        self.contents.get(usize::try_from(index).ok()?)?.as_deref()
    }

    /// It stores a chunk. Returns `false` if the index is beyond the last
    /// chunk of the file.
    pub fn put_chunk(&mut self, index: ChunkIndex, bytes: Vec<u8>) -> bool {
        let Some(slot) = usize::try_from(index).ok().and_then(|index| self.contents.get_mut(index)) else {
            return false;
        };

        *slot = Some(bytes);

        true
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.contents.iter().all(Option::is_some)
    }

    /// It joins the chunks back into the file, if every chunk is present.
    #[must_use]
    pub fn assemble(&self) -> Option<Vec<u8>> {
        if !self.is_complete() {
            return None;
        }

        Some(self.contents.iter().flatten().flatten().copied().collect())
    }
}

/// The chunks a node owns, by file.
///
/// Every method reads a consistent view of one file: a chunk being stored
/// concurrently is either fully visible or not at all.
#[cfg_attr(test, automock)]
pub trait ChunkStore: Send + Sync {
    /// The present chunk indices of a file, ascending. `None` if the node
    /// does not own the file.
    fn present_chunks(&self, file_id: FileId) -> Option<Vec<ChunkIndex>>;

    /// A copy of a present chunk.
    fn chunk(&self, file_id: FileId, index: ChunkIndex) -> Option<Vec<u8>>;
}

/// A [`ChunkStore`] kept in memory.
#[derive(Debug, Default)]
pub struct MemoryChunkStore {
    files: RwLock<HashMap<FileId, FileContents>>,
}

impl MemoryChunkStore {
    /// It loads the files listed in the manifest of `current_dir`, split in
    /// chunks of `chunk_size` bytes. A directory without a manifest gives an
    /// empty store.
    ///
    /// # Errors
    ///
    /// Will return an error if `chunk_size` is zero, or if the manifest or a
    /// file it lists can't be read.
    #[track_caller]
    pub fn load(current_dir: &Utf8Path, chunk_size: u32) -> Result<Self, Error> {
        if chunk_size == 0 {
            return Err(Error::ZeroChunkSize {
                location: Location::caller(),
            });
        }

        let store = Self::default();

        let manifest_path = current_dir.join(MANIFEST_FILE_NAME);

        let manifest = match fs::read_to_string(&manifest_path) {
            Ok(text) => toml::from_str::<Manifest>(&text).map_err(|source| Error::Manifest {
                path: manifest_path.clone(),
                source,
                location: Location::caller(),
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Manifest::default(),
            Err(source) => {
                return Err(Error::Read {
                    path: manifest_path,
                    source,
                    location: Location::caller(),
                })
            }
        };

        for shared in manifest.files {
            let path = current_dir.join(&shared.path);

            let bytes = fs::read(&path).map_err(|source| Error::Read {
                path: path.clone(),
                source,
                location: Location::caller(),
            })?;

            store.insert(FileId(shared.id), FileContents::split(&bytes, chunk_size));
        }

        Ok(store)
    }

    /// It adds or replaces the contents of a file.
    pub fn insert(&self, file_id: FileId, contents: FileContents) {
        self.files.write().insert(file_id, contents);
    }

    /// It stores one chunk of a file the node already owns. Returns `false`
    /// if the file is unknown or the index is out of range.
    pub fn put_chunk(&self, file_id: FileId, index: ChunkIndex, bytes: Vec<u8>) -> bool {
        self.files
            .write()
            .get_mut(&file_id)
            .is_some_and(|contents| contents.put_chunk(index, bytes))
    }

    #[must_use]
    pub fn contents(&self, file_id: FileId) -> Option<FileContents> {
        self.files.read().get(&file_id).cloned()
    }

    #[must_use]
    pub fn file_ids(&self) -> Vec<FileId> {
        let mut file_ids = self.files.read().keys().copied().collect::<Vec<_>>();
        file_ids.sort();
        file_ids
    }
}

impl ChunkStore for MemoryChunkStore {
    fn present_chunks(&self, file_id: FileId) -> Option<Vec<ChunkIndex>> {
        self.files.read().get(&file_id).map(FileContents::present_chunks)
    }

    fn chunk(&self, file_id: FileId, index: ChunkIndex) -> Option<Vec<u8>> {
        self.files.read().get(&file_id)?.chunk(index).map(<[u8]>::to_vec)
    }
}

/// What one connection to the peer data server sees: the chunks the node
/// owns.
///
/// It's built for every incoming connection and is read-only for it.
#[derive(Clone)]
pub struct ClientState {
    store: Arc<dyn ChunkStore>,
}

impl ClientState {
    #[must_use]
    pub fn new(store: Arc<dyn ChunkStore>) -> Self {
        Self { store }
    }

    /// The present chunks of a file, ascending. `None` for a file the node
    /// does not own.
    #[must_use]
    pub fn present_chunks(&self, file_id: FileId) -> Option<Vec<ChunkIndex>> {
        self.store.present_chunks(file_id)
    }

    /// A present chunk. A negative index names no chunk.
    #[must_use]
    pub fn chunk(&self, file_id: FileId, index: i32) -> Option<Vec<u8>> {
        let index = ChunkIndex::try_from(index).ok()?;

        self.store.chunk(file_id, index)
    }
}
