//! Tracker protocol messages.
//!
//! The tag is the first byte of the connection. Each connection carries one
//! request and one response.
//!
//! Tag | Request | Request fields | Response fields
//! ---|---|---|---
//! `1` | `LIST` | | `int32 count`, `count × (int32 id, string name, int64 size)`
//! `2` | `UPLOAD` | `string name, int64 size` | `int32 id` (`0` when the file was not published)
//! `3` | `SOURCES` | `int32 file_id` | `int32 count`, `count × (4 bytes IPv4, int16 port)`
//! `4` | `UPDATE` | `int32 seed_port, int32 count, count × int32 file_id` | `bool success`
use std::net::{Ipv4Addr, SocketAddrV4};

use filemesh_primitives::file::{FileDescriptor, FileId};
use tokio::io::{AsyncRead, AsyncReadExt as _, AsyncWrite, AsyncWriteExt as _};

use super::{read_count, read_size, read_string, read_tag, read_u32, write_count, write_size, write_string, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Kind {
    List = 1,
    Upload = 2,
    Sources = 3,
    Update = 4,
}

impl TryFrom<u8> for Kind {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Self::List),
            2 => Ok(Self::Upload),
            3 => Ok(Self::Sources),
            4 => Ok(Self::Update),
            tag => Err(Error::UnknownTag { tag }),
        }
    }
}

impl Kind {
    /// # Errors
    ///
    /// Will return an error if the stream ends or the tag is unknown.
    pub async fn read_from<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Self, Error> {
        Self::try_from(read_tag(reader).await?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List,
    Upload { name: String, size: u64 },
    Sources { file_id: FileId },
    Update { seed_port: u16, file_ids: Vec<FileId> },
}

impl Request {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Request::List => Kind::List,
            Request::Upload { .. } => Kind::Upload,
            Request::Sources { .. } => Kind::Sources,
            Request::Update { .. } => Kind::Update,
        }
    }

    /// It reads a whole request, tag included.
    ///
    /// # Errors
    ///
    /// Will return a framing error if the request is malformed.
    pub async fn read_from<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Self, Error> {
        let kind = Kind::read_from(reader).await?;

        Self::read_body(kind, reader).await
    }

    /// It reads the fields following the tag.
    ///
    /// # Errors
    ///
    /// Will return a framing error if the fields are malformed.
    pub async fn read_body<R: AsyncRead + Unpin>(kind: Kind, reader: &mut R) -> Result<Self, Error> {
        match kind {
            Kind::List => Ok(Request::List),
            Kind::Upload => {
                let name = read_string(reader).await?;
                let size = read_size(reader, "file size").await?;
                Ok(Request::Upload { name, size })
            }
            Kind::Sources => Ok(Request::Sources {
                file_id: FileId(read_u32(reader).await?),
            }),
            Kind::Update => {
                let seed_port = reader.read_i32().await?;
                let seed_port = u16::try_from(seed_port).map_err(|_| Error::OutOfRange {
                    field: "seed port",
                    value: i64::from(seed_port),
                })?;

                let count = read_count(reader, "file count").await?;

                // The count comes from the peer: grow as ids arrive.
                let mut file_ids = Vec::new();
                for _ in 0..count {
                    file_ids.push(FileId(read_u32(reader).await?));
                }

                Ok(Request::Update { seed_port, file_ids })
            }
        }
    }

    /// # Errors
    ///
    /// Will return an error if the request can't be encoded or written.
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_u8(self.kind() as u8).await?;

        match self {
            Request::List => {}
            Request::Upload { name, size } => {
                write_string(writer, name).await?;
                write_size(writer, *size, "file size").await?;
            }
            Request::Sources { file_id } => {
                writer.write_u32(file_id.0).await?;
            }
            Request::Update { seed_port, file_ids } => {
                writer.write_i32(i32::from(*seed_port)).await?;
                write_count(writer, file_ids.len(), "file count").await?;
                for file_id in file_ids {
                    writer.write_u32(file_id.0).await?;
                }
            }
        }

        writer.flush().await?;

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    List { files: Vec<FileDescriptor> },
    /// `None` is sent as id `0`: the file was not published.
    Upload { file_id: Option<FileId> },
    Sources { seeds: Vec<SocketAddrV4> },
    Update { success: bool },
}

impl Response {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Response::List { .. } => Kind::List,
            Response::Upload { .. } => Kind::Upload,
            Response::Sources { .. } => Kind::Sources,
            Response::Update { .. } => Kind::Update,
        }
    }

    /// It reads the response to a request of the given kind.
    ///
    /// # Errors
    ///
    /// Will return a framing error if the response is malformed.
    pub async fn read_from<R: AsyncRead + Unpin>(kind: Kind, reader: &mut R) -> Result<Self, Error> {
        match kind {
            Kind::List => {
                let count = read_count(reader, "file count").await?;

                let mut files = Vec::new();
                for _ in 0..count {
                    let id = FileId(read_u32(reader).await?);
                    let name = read_string(reader).await?;
                    let size = read_size(reader, "file size").await?;
                    files.push(FileDescriptor::new(id, name, size));
                }

                Ok(Response::List { files })
            }
            Kind::Upload => {
                let id = read_u32(reader).await?;
                Ok(Response::Upload {
                    file_id: (id != 0).then_some(FileId(id)),
                })
            }
            Kind::Sources => {
                let count = read_count(reader, "seed count").await?;

                let mut seeds = Vec::new();
                for _ in 0..count {
                    let ip = Ipv4Addr::from(reader.read_u32().await?);
                    let port = reader.read_u16().await?;
                    seeds.push(SocketAddrV4::new(ip, port));
                }

                Ok(Response::Sources { seeds })
            }
            Kind::Update => Ok(Response::Update {
                success: super::read_bool(reader).await?,
            }),
        }
    }

    /// # Errors
    ///
    /// Will return an error if the response can't be encoded or written.
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<(), Error> {
        match self {
            Response::List { files } => {
                write_count(writer, files.len(), "file count").await?;
                for file in files {
                    writer.write_u32(file.id.0).await?;
                    write_string(writer, &file.name).await?;
                    write_size(writer, file.size, "file size").await?;
                }
            }
            Response::Upload { file_id } => {
                writer.write_u32(file_id.map_or(0, |id| id.0)).await?;
            }
            Response::Sources { seeds } => {
                write_count(writer, seeds.len(), "seed count").await?;
                for seed in seeds {
                    writer.write_all(&seed.ip().octets()).await?;
                    writer.write_u16(seed.port()).await?;
                }
            }
            Response::Update { success } => {
                writer.write_u8(u8::from(*success)).await?;
            }
        }

        writer.flush().await?;

        Ok(())
    }
}
