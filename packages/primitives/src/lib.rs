//! Primitive types for [filemesh](https://docs.rs/filemesh).
//!
//! This module contains the basic data structures shared by the tracker, the
//! registry and the peer data server: file descriptors, peer identities and
//! chunk indices.
use std::time::Duration;

pub mod file;
pub mod peer;

/// Duration since the Unix Epoch.
pub type DurationSinceUnixEpoch = Duration;

/// Zero-based position of a chunk inside a file.
pub type ChunkIndex = u32;
