use std::net::SocketAddr;
use std::sync::Arc;

use filemesh::bootstrap::app::initialize_logging;
use filemesh::core::chunks::MemoryChunkStore;
use filemesh::servers::peer::PeerHandler;
use filemesh::servers::tcp::spawner::Spawner;
use filemesh::servers::tcp::states::{Running, Stopped};
use filemesh::servers::tcp::Server;
use filemesh::shared::clients::peer::PeerClient;
use filemesh_configuration::{Configuration, PeerServer, DEFAULT_TIMEOUT};

pub struct Environment<S> {
    pub config: Arc<PeerServer>,
    pub store: Arc<MemoryChunkStore>,
    pub server: Server<S>,
}

impl Environment<Stopped<PeerHandler>> {
    #[allow(dead_code)]
    pub fn new(configuration: &Arc<Configuration>) -> Self {
        initialize_logging(configuration);

        let config = Arc::new(configuration.peer_server.clone().expect("missing peer data server configuration"));

        let store = Arc::new(MemoryChunkStore::default());

        let server = Server::new(Spawner::new(config.bind_address, PeerHandler::new(store.clone())));

        Self { config, store, server }
    }

    #[allow(dead_code)]
    pub async fn start(self) -> Environment<Running<PeerHandler>> {
        Environment {
            config: self.config,
            store: self.store,
            server: self.server.start().await.unwrap(),
        }
    }
}

impl Environment<Running<PeerHandler>> {
    pub async fn new(configuration: &Arc<Configuration>) -> Self {
        tokio::time::timeout(DEFAULT_TIMEOUT, Environment::<Stopped<PeerHandler>>::new(configuration).start())
            .await
            .expect("it should create an environment within the timeout")
    }

    #[allow(dead_code)]
    pub async fn stop(self) -> Environment<Stopped<PeerHandler>> {
        let stopped = tokio::time::timeout(DEFAULT_TIMEOUT, self.server.stop())
            .await
            .expect("it should stop the environment within the timeout");

        Environment {
            config: self.config,
            store: self.store,
            server: stopped.expect("it should stop the peer data server"),
        }
    }

    pub fn bind_address(&self) -> SocketAddr {
        self.server.state.binding
    }

    pub fn client(&self) -> PeerClient {
        PeerClient::new(self.bind_address())
    }
}
