//! Peer data server.
//!
//! Every node runs one to hand out the chunks it owns to other nodes:
//!
//! Tag | Request | Description
//! ---|---|---
//! `1` | `STAT` | The present chunk indices of a file, ascending.
//! `2` | `GET` | The bytes of one chunk. Empty if the chunk is not present.
//!
//! See [`wire::peer`](crate::shared::wire::peer) for the message layouts.
//! A `GET` response is not length-prefixed: the server closes the connection
//! after the last byte.
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpStream;

use super::tcp::Handler;
use crate::core::chunks::{ChunkStore, ClientState};

pub mod handlers;

pub const PEER_SERVER_LOG_TARGET: &str = "PEER SERVER";

/// Serves the peer data protocol from the chunks of the node.
#[derive(Clone)]
pub struct PeerHandler {
    store: Arc<dyn ChunkStore>,
}

impl PeerHandler {
    #[must_use]
    pub fn new(store: Arc<dyn ChunkStore>) -> Self {
        Self { store }
    }
}

impl Handler for PeerHandler {
    const SERVICE: &'static str = PEER_SERVER_LOG_TARGET;

    fn handle(self, mut stream: TcpStream, remote: SocketAddr) -> impl Future<Output = ()> + Send {
        async move {
            let state = ClientState::new(self.store);

            handlers::handle_connection(&state, &mut stream, remote).await;
        }
    }
}
