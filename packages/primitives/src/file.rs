//! Files published in the tracker catalog.
//!
//! A sample descriptor:
//!
//! ```rust
//! use filemesh_primitives::file::{FileDescriptor, FileId};
//!
//! let file = FileDescriptor::new(FileId(1), "movie.mp4".to_owned(), 1_000_000);
//!
//! assert_eq!(file.id, FileId(1));
//! ```
use derive_more::{Constructor, Display, From, Into};

/// Identifier the tracker assigns to a file when it is uploaded.
///
/// Identifiers are unique within a tracker and never reused. The value `0` is
/// never assigned. They are `int32` fields on the wire and in the snapshot,
/// so no identifier above [`FileId::MAX`] is assigned either.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
pub struct FileId(pub u32);

impl FileId {
    /// The first identifier handed out by an empty catalog.
    pub const FIRST: FileId = FileId(1);

    /// The last identifier that can be handed out.
    pub const MAX: FileId = FileId(0x7fff_ffff);

    /// The identifier following this one, or `None` when the id space is
    /// exhausted.
    #[must_use]
    pub fn next(self) -> Option<FileId> {
        if self >= Self::MAX {
            return None;
        }

        Some(FileId(self.0 + 1))
    }
}

/// An entry in the tracker catalog. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Constructor)]
pub struct FileDescriptor {
    pub id: FileId,
    /// The file name as published by the uploader.
    pub name: String,
    /// The file size in bytes.
    pub size: u64,
}
