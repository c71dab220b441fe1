//! Tracker protocol client.
use std::net::{SocketAddr, SocketAddrV4};
use std::time::Duration;

use filemesh_configuration::DEFAULT_TIMEOUT;
use filemesh_primitives::file::{FileDescriptor, FileId};
use tokio::io::AsyncWriteExt as _;
use tracing::debug;

use super::{with_connection, Error};
use crate::shared::wire;
use crate::shared::wire::tracker::{Request, Response};

/// A client of one tracker.
///
/// ```rust,no_run
/// use filemesh::shared::clients::tracker::TrackerClient;
///
/// # async fn run() -> Result<(), filemesh::shared::clients::Error> {
/// let client = TrackerClient::new("127.0.0.1:8081".parse().unwrap());
///
/// for file in client.list().await? {
///     println!("{} {} {}", file.id, file.name, file.size);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TrackerClient {
    address: SocketAddr,
    timeout: Duration,
}

impl TrackerClient {
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

    #[must_use]
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// # Errors
    ///
    /// Will return an error if the exchange fails.
    pub async fn list(&self) -> Result<Vec<FileDescriptor>, Error> {
        match self.send(Request::List).await? {
            Response::List { files } => Ok(files),
            response => Err(self.unexpected(&response)),
        }
    }

    /// It publishes a file. Returns `None` if the tracker did not publish it.
    ///
    /// # Errors
    ///
    /// Will return an error if the exchange fails.
    pub async fn upload(&self, name: &str, size: u64) -> Result<Option<FileId>, Error> {
        match self
            .send(Request::Upload {
                name: name.to_owned(),
                size,
            })
            .await?
        {
            Response::Upload { file_id } => Ok(file_id),
            response => Err(self.unexpected(&response)),
        }
    }

    /// # Errors
    ///
    /// Will return an error if the exchange fails.
    pub async fn sources(&self, file_id: FileId) -> Result<Vec<SocketAddrV4>, Error> {
        match self.send(Request::Sources { file_id }).await? {
            Response::Sources { seeds } => Ok(seeds),
            response => Err(self.unexpected(&response)),
        }
    }

    /// It declares this node as a seed of `file_ids` on its data-plane port.
    ///
    /// # Errors
    ///
    /// Will return an error if the exchange fails.
    pub async fn update(&self, seed_port: u16, file_ids: &[FileId]) -> Result<bool, Error> {
        match self
            .send(Request::Update {
                seed_port,
                file_ids: file_ids.to_vec(),
            })
            .await?
        {
            Response::Update { success } => Ok(success),
            response => Err(self.unexpected(&response)),
        }
    }

    async fn send(&self, request: Request) -> Result<Response, Error> {
        debug!(target: "TRACKER CLIENT", address = %self.address, ?request, "sending request");

        let kind = request.kind();

        with_connection(self.address, self.timeout, |mut stream| async move {
            request.write_to(&mut stream).await?;

            let response = Response::read_from(kind, &mut stream).await?;

            let _ = stream.shutdown().await;

            Ok::<_, wire::Error>(response)
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
