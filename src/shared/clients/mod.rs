//! Clients for the tracker protocol and the peer data protocol.
//!
//! Every request opens its own connection, writes the request, reads the
//! response and closes the connection. Every step is bounded by the client
//! timeout.
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::shared::wire;

pub mod peer;
pub mod tracker;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to connect to {address}: {source}")]
    Connect { address: SocketAddr, source: std::io::Error },

    #[error("the request to {address} timed out after {timeout:?}")]
    Timeout { address: SocketAddr, timeout: Duration },

    #[error("invalid exchange with {address}: {source}")]
    Wire { address: SocketAddr, source: wire::Error },

    #[error("unexpected response from {address}: {response}")]
    UnexpectedResponse { address: SocketAddr, response: String },
}

/// It runs `exchange` over a new connection to `address`, within `timeout`.
pub(crate) async fn with_connection<T, F, Fut>(address: SocketAddr, timeout: Duration, exchange: F) -> Result<T, Error>
where
    F: FnOnce(tokio::net::TcpStream) -> Fut,
    Fut: std::future::Future<Output = Result<T, wire::Error>>,
{
    let run = async {
        let stream = tokio::net::TcpStream::connect(address)
            .await
            .map_err(|source| Error::Connect { address, source })?;

        exchange(stream).await.map_err(|source| Error::Wire { address, source })
    };

    tokio::time::timeout(timeout, run)
        .await
        .map_err(|_| Error::Timeout { address, timeout })?
}
