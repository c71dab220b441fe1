//! Peer identity used by the tracker registry.
//!
//! A peer is a node reachable at an IPv4 address and a data-plane port.
//!
//! ```rust
//! use std::net::Ipv4Addr;
//! use std::time::Duration;
//!
//! use filemesh_primitives::peer::PeerIdentity;
//!
//! let a = PeerIdentity::new(Ipv4Addr::new(126, 0, 0, 1), 8080, Duration::from_secs(1));
//! let b = PeerIdentity::new(Ipv4Addr::new(126, 0, 0, 1), 8080, Duration::from_secs(2));
//!
//! // Identity is the `(address, port)` value, not the last time it was seen.
//! assert_eq!(a, b);
//! ```
use std::hash::{Hash, Hasher};
use std::net::{Ipv4Addr, SocketAddrV4};

use derive_more::Constructor;

use crate::DurationSinceUnixEpoch;

/// One reachable node.
///
/// Two identities are equal when their `(address, port)` values are equal.
/// `last_seen` does not take part in equality or hashing.
#[derive(Debug, Clone, Copy, Constructor)]
pub struct PeerIdentity {
    pub address: Ipv4Addr,
    pub port: u16,
    /// The last time the tracker heard from this peer (timestamp).
    pub last_seen: DurationSinceUnixEpoch,
}

impl PeerIdentity {
    /// The value the peer directory is keyed by.
    #[must_use]
    pub fn key(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.address, self.port)
    }

    /// A peer is stale when it was last seen before `current_cutoff`, that
    /// is, when `now - last_seen > timeout` for `current_cutoff = now - timeout`.
    #[must_use]
    pub fn is_stale(&self, current_cutoff: DurationSinceUnixEpoch) -> bool {
        self.last_seen < current_cutoff
    }
}

impl From<(SocketAddrV4, DurationSinceUnixEpoch)> for PeerIdentity {
    fn from((addr, last_seen): (SocketAddrV4, DurationSinceUnixEpoch)) -> Self {
        Self::new(*addr.ip(), addr.port(), last_seen)
    }
}

impl PartialEq for PeerIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PeerIdentity {}

impl Hash for PeerIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
