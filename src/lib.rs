//! **filemesh** is a minimal peer-to-peer file distribution network.
//!
//! It has two services:
//!
//! - The **tracker**: a rendezvous service keeping the catalog of published
//!   files and, for each file, the set of nodes currently able to supply it
//!   (its seeds). It never transfers file bytes.
//! - The **peer data server**: run by every node to hand out the chunks of
//!   the files it owns directly to other nodes.
//!
//! # Data flow
//!
//! 1. A node publishes a file with `UPLOAD` and becomes its first seed.
//! 2. Other nodes discover files with `LIST` and candidate seeds with
//!    `SOURCES`.
//! 3. They connect to the data server of a seed, ask which chunks it has
//!    with `STAT` and fetch them one by one with `GET`.
//! 4. Seeds call `UPDATE` periodically. A seed that has not been heard from
//!    for longer than the seed timeout is not reported by `SOURCES` anymore.
//!
//! # Layout
//!
//! - [`core`]: the domain tracker, the snapshot persistence and the chunk
//!   store of a node.
//! - [`servers`]: the TCP servers of both protocols.
//! - [`shared`]: the wire codec and the clients.
//! - [`bootstrap`]: configuration, logging and jobs.
//!
//! # Configuration
//!
//! The configuration is loaded from `./share/default/config/filemesh.toml`
//! or from the file in `FILEMESH_CONFIG_TOML_PATH`. The whole TOML document
//! can also be given in `FILEMESH_CONFIG_TOML`.
//!
//! ```toml
//! [logging]
//! threshold = "info"
//!
//! [core]
//! snapshot_path = "./storage/tracker/lib/snapshot.bin"
//! seed_timeout = 60000
//!
//! [tracker]
//! bind_address = "0.0.0.0:8081"
//!
//! [peer_server]
//! bind_address = "0.0.0.0:8082"
//! chunk_size = 1048576
//! current_dir = "."
//! ```
//!
//! The peer data server seeds the files listed in `shared.toml` in its
//! `current_dir`. See [`core::chunks`].
//!
//! # Shutdown
//!
//! On `ctrl_c` or `SIGTERM` the servers stop accepting connections, drop the
//! connections still in flight and the tracker writes its snapshot. The
//! process exits once the snapshot is on disk.
use filemesh_clock::clock;

pub mod app;
pub mod bootstrap;
pub mod core;
pub mod servers;
pub mod shared;

/// This code needs to be copied into each crate.
/// Working version, for production.
#[cfg(not(test))]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Working;

/// Stopped version, for testing.
#[cfg(test)]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Stopped;
