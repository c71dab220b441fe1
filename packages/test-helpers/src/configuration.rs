//! Configurations for testing.
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use camino::Utf8PathBuf;
use filemesh_configuration::{Configuration, PeerServer, Threshold};

use crate::random;

/// This configuration is used for testing. It generates random config values
/// so they do not collide if you run more than one tracker at the same time.
///
/// - Logging is off. Change the threshold to `debug` for tests debugging.
/// - The tracker and the peer data server bind to a random port on
///   `127.0.0.1`.
/// - The snapshot goes to a new file in the temp directory.
///
/// # Panics
///
/// Will panic if the temp directory path is not valid UTF-8.
#[must_use]
pub fn ephemeral() -> Configuration {
    let mut config = Configuration::default();

    config.logging.threshold = Threshold::Off;

    // Ephemeral socket address for the tracker
    config.tracker.bind_address = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);

    // Ephemeral socket address for the peer data server
    config.peer_server = Some(PeerServer {
        bind_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
        ..Default::default()
    });

    // Ephemeral snapshot file
    let temp_directory = Utf8PathBuf::from_path_buf(env::temp_dir()).expect("the temp directory should be valid UTF-8");
    config.core.snapshot_path = temp_directory.join(format!("filemesh_snapshot_{}.bin", random::alphanumeric(16)));

    config
}

/// An ephemeral configuration without a peer data server.
#[must_use]
pub fn ephemeral_tracker_only() -> Configuration {
    let mut config = ephemeral();

    config.peer_server = None;

    config
}

/// An ephemeral configuration whose peer data server splits files in chunks
/// of `chunk_size` bytes.
#[must_use]
pub fn ephemeral_with_chunk_size(chunk_size: u32) -> Configuration {
    let mut config = ephemeral();

    if let Some(peer_server) = config.peer_server.as_mut() {
        peer_server.chunk_size = chunk_size;
    }

    config
}
