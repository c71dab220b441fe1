//! Peer data server job starter.
use std::sync::Arc;

use filemesh_configuration::PeerServer;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::core::chunks::ChunkStore;
use crate::servers::peer::{PeerHandler, PEER_SERVER_LOG_TARGET};
use crate::servers::tcp::spawner::Spawner;
use crate::servers::tcp::Server;

/// It starts the peer data server serving the chunks in `store`.
///
/// # Panics
///
/// It panics if the server can't be started.
pub async fn start_job(config: &PeerServer, store: Arc<dyn ChunkStore>) -> JoinHandle<()> {
    let handler = PeerHandler::new(store);

    let server = Server::new(Spawner::new(config.bind_address, handler))
        .start()
        .await
        .expect("it should be able to start the peer data server");

    info!(target: PEER_SERVER_LOG_TARGET, "Peer data server listening on tcp://{}", server.state.binding);

    tokio::spawn(async move {
        if let Err(err) = server.state.task.await {
            error!(target: PEER_SERVER_LOG_TARGET, %err, "the peer data server task failed");
        }
    })
}
