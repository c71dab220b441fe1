//! Peer data protocol client.
use std::net::SocketAddr;
use std::time::Duration;

use filemesh_configuration::DEFAULT_TIMEOUT;
use filemesh_primitives::file::FileId;
use filemesh_primitives::ChunkIndex;
use tokio::io::AsyncWriteExt as _;
use tracing::debug;

use super::{with_connection, Error};
use crate::shared::wire::peer::{Request, Response};

/// A client of the data server of one seed.
#[derive(Debug, Clone)]
pub struct PeerClient {
    address: SocketAddr,
    timeout: Duration,
}

impl PeerClient {
    #[must_use]
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The chunks the seed has of a file, ascending.
    ///
    /// # Errors
    ///
    /// Will return an error if the exchange fails.
    pub async fn stat(&self, file_id: FileId) -> Result<Vec<ChunkIndex>, Error> {
        match self.send(Request::Stat { file_id }).await? {
            Response::Stat { chunks } => Ok(chunks),
            response => Err(self.unexpected(&response)),
        }
    }

    /// The bytes of one chunk. Empty if the seed does not have it.
    ///
    /// # Errors
    ///
    /// Will return an error if the exchange fails.
    pub async fn get(&self, file_id: FileId, chunk_index: ChunkIndex) -> Result<Vec<u8>, Error> {
        let chunk_index = i32::try_from(chunk_index).unwrap_or(-1);

        match self.send(Request::Get { file_id, chunk_index }).await? {
            Response::Get { bytes } => Ok(bytes),
            response => Err(self.unexpected(&response)),
        }
    }

    async fn send(&self, request: Request) -> Result<Response, Error> {
        debug!(target: "PEER CLIENT", address = %self.address, ?request, "sending request");

        let kind = request.kind();

        with_connection(self.address, self.timeout, |mut stream| async move {
            request.write_to(&mut stream).await?;

            // The server reads exactly one request; the `GET` response ends
            // when it closes the connection.
            let _ = stream.shutdown().await;

            Response::read_from(kind, &mut stream).await
        })
        .await
    }

    fn unexpected(&self, response: &Response) -> Error {
        Error::UnexpectedResponse {
            address: self.address,
            response: format!("{response:?}"),
        }
    }
}
