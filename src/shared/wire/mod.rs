//! Binary framing shared by the tracker protocol and the peer data protocol.
//!
//! Every request starts with one tag byte naming its kind. The fields that
//! follow have a fixed order:
//!
//! - Integers are big-endian.
//! - Strings are a `u16` big-endian byte length followed by UTF-8 bytes.
//! - Booleans are one byte, `0` is `false`.
//!
//! Decoding is strict. An unexpected end of stream, an unknown tag or an
//! invalid value is a framing error: the connection is closed without a
//! response.
//!
//! See [`tracker`] and [`peer`] for the message layouts.
use std::io;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt as _, AsyncWrite, AsyncWriteExt as _};

pub mod peer;
pub mod tracker;

/// Longest string the framing can carry.
pub const MAX_STRING_LENGTH: usize = u16::MAX as usize;

#[derive(Error, Debug)]
pub enum Error {
    #[error("the stream ended in the middle of a message")]
    UnexpectedEof,

    #[error("unknown message tag: {tag}")]
    UnknownTag { tag: u8 },

    #[error("invalid UTF-8 string: {source}")]
    InvalidUtf8 { source: std::string::FromUtf8Error },

    #[error("the string is {length} bytes long, the maximum is {MAX_STRING_LENGTH}")]
    StringTooLong { length: usize },

    #[error("negative {field}: {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("i/o error: {source}")]
    Io { source: io::Error },
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof
        } else {
            Self::Io { source: err }
        }
    }
}

pub async fn read_tag<R: AsyncRead + Unpin>(reader: &mut R) -> Result<u8, Error> {
    Ok(reader.read_u8().await?)
}

pub async fn read_i32<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32, Error> {
    Ok(reader.read_i32().await?)
}

pub async fn read_u32<R: AsyncRead + Unpin>(reader: &mut R) -> Result<u32, Error> {
    Ok(reader.read_u32().await?)
}

/// Reads an `int32` that must not be negative, like element counts.
pub async fn read_count<R: AsyncRead + Unpin>(reader: &mut R, field: &'static str) -> Result<usize, Error> {
    let value = reader.read_i32().await?;

    usize::try_from(value).map_err(|_| Error::Negative {
        field,
        value: i64::from(value),
    })
}

/// Reads an `int64` that must not be negative, like file sizes.
pub async fn read_size<R: AsyncRead + Unpin>(reader: &mut R, field: &'static str) -> Result<u64, Error> {
    let value = reader.read_i64().await?;

    u64::try_from(value).map_err(|_| Error::Negative { field, value })
}

pub async fn read_string<R: AsyncRead + Unpin>(reader: &mut R) -> Result<String, Error> {
    let length = reader.read_u16().await?;

    let mut bytes = vec![0; usize::from(length)];
    reader.read_exact(&mut bytes).await?;

    String::from_utf8(bytes).map_err(|source| Error::InvalidUtf8 { source })
}

pub async fn read_bool<R: AsyncRead + Unpin>(reader: &mut R) -> Result<bool, Error> {
    Ok(reader.read_u8().await? != 0)
}

pub async fn write_string<W: AsyncWrite + Unpin>(writer: &mut W, value: &str) -> Result<(), Error> {
    let length = u16::try_from(value.len()).map_err(|_| Error::StringTooLong { length: value.len() })?;

    writer.write_u16(length).await?;
    writer.write_all(value.as_bytes()).await?;

    Ok(())
}

/// Writes a count as `int32`.
pub async fn write_count<W: AsyncWrite + Unpin>(writer: &mut W, count: usize, field: &'static str) -> Result<(), Error> {
    let count = i32::try_from(count).map_err(|_| Error::OutOfRange {
        field,
        value: i64::try_from(count).unwrap_or(i64::MAX),
    })?;

    writer.write_i32(count).await?;

    Ok(())
}

/// Writes a size as `int64`.
pub async fn write_size<W: AsyncWrite + Unpin>(writer: &mut W, size: u64, field: &'static str) -> Result<(), Error> {
    let size = i64::try_from(size).map_err(|_| Error::OutOfRange { field, value: i64::MAX })?;

    writer.write_i64(size).await?;

    Ok(())
}
