use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct PeerServer {
    /// The address the peer data server will bind to. Other nodes fetch
    /// chunks from this address, so its port is the one the node declares
    /// to the tracker as its seed port.
    #[serde(default = "PeerServer::default_bind_address")]
    pub bind_address: SocketAddr,

    /// Size in bytes of every chunk but the last one of a file.
    #[serde(default = "PeerServer::default_chunk_size")]
    pub chunk_size: u32,

    /// Working directory of the node. The files it seeds are listed in the
    /// `shared.toml` manifest of this directory and loaded on startup.
    #[serde(default = "PeerServer::default_current_dir")]
    pub current_dir: Utf8PathBuf,
}

impl Default for PeerServer {
    fn default() -> Self {
        Self {
            bind_address: Self::default_bind_address(),
            chunk_size: Self::default_chunk_size(),
            current_dir: Self::default_current_dir(),
        }
    }
}

impl PeerServer {
    fn default_bind_address() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8082)
    }

    fn default_chunk_size() -> u32 {
        1024 * 1024
    }

    fn default_current_dir() -> Utf8PathBuf {
        Utf8PathBuf::from(".")
    }
}
