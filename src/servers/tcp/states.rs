use std::fmt::Debug;
use std::net::SocketAddr;

use derive_more::Constructor;
use tokio::task::JoinHandle;

use super::spawner::Spawner;
use super::{Error, Handler, Server, TCP_SERVER_LOG_TARGET};
use crate::bootstrap::jobs::Started;
use crate::servers::signals::Halted;

/// A TCP server instance controller with no instance running.
#[allow(clippy::module_name_repetitions)]
pub type StoppedTcpServer<H> = Server<Stopped<H>>;

/// A TCP server instance controller with a running instance.
#[allow(clippy::module_name_repetitions)]
pub type RunningTcpServer<H> = Server<Running<H>>;

/// A stopped TCP server state.
pub struct Stopped<H: Handler> {
    pub spawner: Spawner<H>,
}

/// A running TCP server state.
#[derive(Debug, Constructor)]
pub struct Running<H: Handler> {
    /// The address where the server is bound.
    pub binding: SocketAddr,
    pub halt_task: tokio::sync::oneshot::Sender<Halted>,
    pub task: JoinHandle<Spawner<H>>,
}

impl<H: Handler> Server<Stopped<H>> {
    /// Creates a new server instance in `stopped` state.
    #[must_use]
    pub fn new(spawner: Spawner<H>) -> Self {
        Self {
            state: Stopped { spawner },
        }
    }

    /// It starts the server and returns a controller in `running` state.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the server can't bind to the given address.
    pub async fn start(self) -> Result<Server<Running<H>>, Error> {
        let (tx_start, rx_start) = tokio::sync::oneshot::channel::<Started>();
        let (tx_halt, rx_halt) = tokio::sync::oneshot::channel::<Halted>();

        let bind_to = self.state.spawner.bind_to;

        let task = self.state.spawner.spawn_launcher(tx_start, rx_halt);

        // The launcher drops the start channel when it can't bind.
        let binding = rx_start
            .await
            .map_err(|_| Error::Start {
                service: H::SERVICE,
                bind_to,
            })?
            .address;

        tracing::trace!(target: TCP_SERVER_LOG_TARGET, service = H::SERVICE, %binding, "Server<Stopped>::start (running)");

        Ok(Server {
            state: Running {
                binding,
                halt_task: tx_halt,
                task,
            },
        })
    }
}

impl<H: Handler> Server<Running<H>> {
    /// It stops the server and returns a controller in `stopped` state.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the halt signal can't be sent or the server task
    /// failed.
    pub async fn stop(self) -> Result<Server<Stopped<H>>, Error> {
        self.state
            .halt_task
            .send(Halted::Normal)
            .map_err(|_| Error::Halt { service: H::SERVICE })?;

        let spawner = self.state.task.await.map_err(|err| Error::Task {
            service: H::SERVICE,
            message: err.to_string(),
        })?;

        Ok(Server {
            state: Stopped { spawner },
        })
    }
}

impl<H: Handler> Debug for Stopped<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stopped").field("bind_to", &self.spawner.bind_to).finish()
    }
}
