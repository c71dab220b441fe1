//! A thin wrapper for tokio spawn to launch the TCP server launcher as a new task.
use std::net::SocketAddr;

use derive_more::Constructor;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::launcher::Launcher;
use super::Handler;
use crate::bootstrap::jobs::Started;
use crate::servers::signals::Halted;

#[derive(Constructor, Clone, Debug)]
pub struct Spawner<H> {
    pub bind_to: SocketAddr,
    pub handler: H,
}

impl<H: Handler> Spawner<H> {
    /// It spawns a new task to run the TCP server instance.
    pub fn spawn_launcher(self, tx_start: oneshot::Sender<Started>, rx_halt: oneshot::Receiver<Halted>) -> JoinHandle<Spawner<H>> {
        tokio::spawn(async move {
            Launcher::run_with_graceful_shutdown(self.handler.clone(), self.bind_to, tx_start, rx_halt).await;
            self
        })
    }
}
