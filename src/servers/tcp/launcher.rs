use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::select;
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::instrument;

use super::{Handler, TCP_SERVER_LOG_TARGET};
use crate::bootstrap::jobs::Started;
use crate::servers::logging::STARTED_ON;
use crate::servers::signals::{shutdown_signal_with_message, Halted};

const BIND_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause after a failed `accept`, for example when the process runs out of
/// file descriptors.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(10);

/// A TCP server instance launcher.
pub struct Launcher;

impl Launcher {
    /// It starts the TCP server instance with graceful shutdown.
    ///
    /// It returns without sending the `Started` message if it can't bind to
    /// `bind_to`.
    #[instrument(skip(handler, bind_to, tx_start, rx_halt))]
    pub async fn run_with_graceful_shutdown<H: Handler>(
        handler: H,
        bind_to: SocketAddr,
        tx_start: oneshot::Sender<Started>,
        rx_halt: oneshot::Receiver<Halted>,
    ) {
        tracing::info!(target: TCP_SERVER_LOG_TARGET, service = H::SERVICE, "Starting on: {bind_to}");

        let listener = match tokio::time::timeout(BIND_TIMEOUT, TcpListener::bind(bind_to)).await {
            Ok(Ok(listener)) => listener,
            Ok(Err(err)) => {
                tracing::error!(target: TCP_SERVER_LOG_TARGET, service = H::SERVICE, addr = %bind_to, %err, "could not bind to socket");
                return;
            }
            Err(_) => {
                tracing::error!(target: TCP_SERVER_LOG_TARGET, service = H::SERVICE, addr = %bind_to, "timed out binding to socket");
                return;
            }
        };

        let address = match listener.local_addr() {
            Ok(address) => address,
            Err(err) => {
                tracing::error!(target: TCP_SERVER_LOG_TARGET, service = H::SERVICE, addr = %bind_to, %err, "could not get the bound address");
                return;
            }
        };

        let local_addr = format!("tcp://{address}");

        tracing::info!(target: TCP_SERVER_LOG_TARGET, service = H::SERVICE, "{STARTED_ON}: {local_addr}");

        if tx_start.send(Started { address }).is_err() {
            tracing::error!(target: TCP_SERVER_LOG_TARGET, service = H::SERVICE, local_addr, "nobody is waiting for the server to start");
            return;
        }

        let halt_task = tokio::task::spawn(shutdown_signal_with_message(
            rx_halt,
            format!("Halting {} bound to socket: {address}", H::SERVICE),
        ));

        // A failed halt task also halts the server.
        let halted = async {
            let _ = halt_task.await;
        };

        Self::run_accept_loop(listener, handler, halted).await;

        tracing::debug!(target: TCP_SERVER_LOG_TARGET, service = H::SERVICE, local_addr, "Tcp::run_with_graceful_shutdown (stopped)");
    }

    /// It serves every accepted connection in its own task until `halted`
    /// resolves.
    ///
    /// On halt it stops accepting and aborts the connections still being
    /// served, so no response is sent once it returns.
    async fn run_accept_loop<H: Handler>(listener: TcpListener, handler: H, halted: impl Future<Output = ()>) {
        let mut connections = JoinSet::new();

        tokio::pin!(halted);

        loop {
            select! {
                () = &mut halted => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        tracing::trace!(target: TCP_SERVER_LOG_TARGET, service = H::SERVICE, %remote, "connection accepted");

                        connections.spawn(handler.clone().handle(stream, remote));
                    }
                    Err(err) => {
                        tracing::warn!(target: TCP_SERVER_LOG_TARGET, service = H::SERVICE, %err, "failed to accept a connection");

                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                },
                Some(joined) = connections.join_next() => {
                    if let Err(err) = joined {
                        tracing::warn!(target: TCP_SERVER_LOG_TARGET, service = H::SERVICE, %err, "a connection task failed");
                    }
                }
            }
        }

        drop(listener);

        let in_flight = connections.len();
        connections.shutdown().await;

        tracing::debug!(target: TCP_SERVER_LOG_TARGET, service = H::SERVICE, in_flight, "aborted the connections in flight");
    }
}
