use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use derive_more::Constructor;
use serde::{Deserialize, Serialize};

use crate::TRACKER_PORT;

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Constructor)]
pub struct TrackerServer {
    /// The address the tracker will bind to.
    /// The format is `ip:port`, for example `0.0.0.0:8081`. If you want to
    /// listen to all interfaces, use `0.0.0.0`. If you want the operating
    /// system to choose a random port, use port `0`.
    #[serde(default = "TrackerServer::default_bind_address")]
    pub bind_address: SocketAddr,
}

impl Default for TrackerServer {
    fn default() -> Self {
        Self {
            bind_address: Self::default_bind_address(),
        }
    }
}

impl TrackerServer {
    fn default_bind_address() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), TRACKER_PORT)
    }
}
