//! Peer data protocol messages.
//!
//! Tag | Request | Request fields | Response
//! ---|---|---|---
//! `1` | `STAT` | `int32 file_id` | `int32 count`, `count × int32 chunk_index`, ascending
//! `2` | `GET` | `int32 file_id, int32 chunk_index` | the chunk bytes, until the server closes the connection
//!
//! A `GET` for an unknown file or an absent chunk is answered with zero
//! bytes.
use filemesh_primitives::file::FileId;
use filemesh_primitives::ChunkIndex;
use tokio::io::{AsyncRead, AsyncReadExt as _, AsyncWrite, AsyncWriteExt as _};

use super::{read_count, read_i32, read_tag, read_u32, write_count, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Kind {
    Stat = 1,
    Get = 2,
}

impl TryFrom<u8> for Kind {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Self::Stat),
            2 => Ok(Self::Get),
            tag => Err(Error::UnknownTag { tag }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Stat { file_id: FileId },
    /// The index is kept as sent: a negative index names no chunk.
    Get { file_id: FileId, chunk_index: i32 },
}

impl Request {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Request::Stat { .. } => Kind::Stat,
            Request::Get { .. } => Kind::Get,
        }
    }

    /// # Errors
    ///
    /// Will return a framing error if the request is malformed.
    pub async fn read_from<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Self, Error> {
        let kind = Kind::try_from(read_tag(reader).await?)?;

        let file_id = FileId(read_u32(reader).await?);

        match kind {
            Kind::Stat => Ok(Request::Stat { file_id }),
            Kind::Get => Ok(Request::Get {
                file_id,
                chunk_index: read_i32(reader).await?,
            }),
        }
    }

    /// # Errors
    ///
    /// Will return an error if the request can't be written.
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_u8(self.kind() as u8).await?;

        match self {
            Request::Stat { file_id } => {
                writer.write_u32(file_id.0).await?;
            }
            Request::Get { file_id, chunk_index } => {
                writer.write_u32(file_id.0).await?;
                writer.write_i32(*chunk_index).await?;
            }
        }

        writer.flush().await?;

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Stat { chunks: Vec<ChunkIndex> },
    /// Empty when the chunk is not available.
    Get { bytes: Vec<u8> },
}

impl Response {
    /// It reads the response to a request of the given kind. A `GET`
    /// response is read until the end of the stream.
    ///
    /// # Errors
    ///
    /// Will return a framing error if the response is malformed.
    pub async fn read_from<R: AsyncRead + Unpin>(kind: Kind, reader: &mut R) -> Result<Self, Error> {
        match kind {
            Kind::Stat => {
                let count = read_count(reader, "chunk count").await?;

                let mut chunks = Vec::new();
                for _ in 0..count {
                    chunks.push(read_u32(reader).await?);
                }

                Ok(Response::Stat { chunks })
            }
            Kind::Get => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes).await?;

                Ok(Response::Get { bytes })
            }
        }
    }

    /// # Errors
    ///
    /// Will return an error if the response can't be written.
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<(), Error> {
        match self {
            Response::Stat { chunks } => {
                write_count(writer, chunks.len(), "chunk count").await?;
                for index in chunks {
                    writer.write_u32(*index).await?;
                }
            }
            Response::Get { bytes } => {
                writer.write_all(bytes).await?;
            }
        }

        writer.flush().await?;

        Ok(())
    }
}
