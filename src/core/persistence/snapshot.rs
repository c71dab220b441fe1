//! Snapshot encoding.
//!
//! See the [module documentation](super) for the layout.
use std::io::{self, Cursor, Read as _, Write};
use std::net::Ipv4Addr;

use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use filemesh_clock::conv::{convert_from_epoch_millis_to_timestamp, convert_from_timestamp_to_epoch_millis};
use filemesh_primitives::file::{FileDescriptor, FileId};
use filemesh_primitives::peer::PeerIdentity;
use filemesh_registry::state::{PersistedFile, PersistentRegistry};
use thiserror::Error;

/// Why a snapshot could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Corruption {
    #[error("the snapshot ends in the middle of a record")]
    Truncated,

    #[error("negative {field}: {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("a file name is not valid UTF-8")]
    InvalidUtf8,

    #[error("{count} bytes follow the last record")]
    TrailingBytes { count: u64 },
}

impl From<io::Error> for Corruption {
    fn from(_: io::Error) -> Self {
        // A cursor over a byte slice only fails when it runs out of bytes.
        Self::Truncated
    }
}

/// It writes the registry in the snapshot layout.
///
/// # Errors
///
/// Will return an error if the writer fails or a value does not fit its
/// field.
pub fn encode<W: Write>(registry: &PersistentRegistry, writer: &mut W) -> io::Result<()> {
    writer.write_i32::<NetworkEndian>(to_count(registry.len())?)?;

    for persisted in registry {
        let file = &persisted.descriptor;

        let name = file.name.as_bytes();
        let name_length = u16::try_from(name.len()).map_err(|_| invalid_data("file name too long"))?;
        writer.write_u16::<NetworkEndian>(name_length)?;
        writer.write_all(name)?;

        writer.write_u32::<NetworkEndian>(file.id.0)?;
        writer.write_i64::<NetworkEndian>(i64::try_from(file.size).map_err(|_| invalid_data("file size too big"))?)?;
        writer.write_i32::<NetworkEndian>(to_count(persisted.seeds.len())?)?;

        for seed in &persisted.seeds {
            writer.write_all(&seed.address.octets())?;
            writer.write_u16::<NetworkEndian>(seed.port)?;
            writer.write_i64::<NetworkEndian>(convert_from_timestamp_to_epoch_millis(seed.last_seen))?;
        }
    }

    Ok(())
}

/// It reads a whole snapshot. Bytes after the last record are corruption.
///
/// # Errors
///
/// Will return the reason why the bytes are not a valid snapshot.
pub fn decode(bytes: &[u8]) -> Result<PersistentRegistry, Corruption> {
    let mut reader = Cursor::new(bytes);

    let file_count = read_count(&mut reader, "file count")?;

    let mut registry = PersistentRegistry::new();

    for _ in 0..file_count {
        let name_length = reader.read_u16::<NetworkEndian>()?;
        let mut name = vec![0; usize::from(name_length)];
        reader.read_exact(&mut name)?;
        let name = String::from_utf8(name).map_err(|_| Corruption::InvalidUtf8)?;

        let id = reader.read_i32::<NetworkEndian>()?;
        let id = FileId(u32::try_from(id).map_err(|_| Corruption::Negative {
            field: "file id",
            value: i64::from(id),
        })?);

        let size = reader.read_i64::<NetworkEndian>()?;
        let size = u64::try_from(size).map_err(|_| Corruption::Negative {
            field: "file size",
            value: size,
        })?;

        let seed_count = read_count(&mut reader, "seed count")?;

        let mut seeds = Vec::new();
        for _ in 0..seed_count {
            let address = Ipv4Addr::from(reader.read_u32::<NetworkEndian>()?);
            let port = reader.read_u16::<NetworkEndian>()?;

            let last_seen = reader.read_i64::<NetworkEndian>()?;
            let last_seen = convert_from_epoch_millis_to_timestamp(last_seen).ok_or(Corruption::Negative {
                field: "last seen",
                value: last_seen,
            })?;

            seeds.push(PeerIdentity::new(address, port, last_seen));
        }

        registry.push(PersistedFile {
            descriptor: FileDescriptor::new(id, name, size),
            seeds,
        });
    }

    let trailing = u64::try_from(bytes.len()).unwrap_or(u64::MAX).saturating_sub(reader.position());
    if trailing > 0 {
        return Err(Corruption::TrailingBytes { count: trailing });
    }

    Ok(registry)
}

fn read_count(reader: &mut Cursor<&[u8]>, field: &'static str) -> Result<usize, Corruption> {
    let count = reader.read_i32::<NetworkEndian>()?;

    usize::try_from(count).map_err(|_| Corruption::Negative {
        field,
        value: i64::from(count),
    })
}

fn to_count(len: usize) -> io::Result<i32> {
    i32::try_from(len).map_err(|_| invalid_data("too many records"))
}

fn invalid_data(message: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
