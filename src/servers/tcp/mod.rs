//! Generic TCP server.
//!
//! It accepts connections on one listening socket and hands every accepted
//! connection to a new task running the [`Handler`]. The handler reads one
//! request, writes one response and closes the connection.
//!
//! The server is a state machine: [`Server<Stopped>`](states::Stopped) and
//! [`Server<Running>`](states::Running). Starting it returns the address it
//! is bound to, so it can be bound to port `0`.
use std::future::Future;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpStream;

pub mod launcher;
pub mod spawner;
pub mod states;

/// Log target of the TCP listener itself.
pub const TCP_SERVER_LOG_TARGET: &str = "TCP SERVER";

/// Serves one accepted connection.
///
/// A copy of the handler is moved into the task of every connection.
pub trait Handler: Clone + Send + Sync + 'static {
    /// The name of the service, used in logs.
    const SERVICE: &'static str;

    fn handle(self, stream: TcpStream, remote: SocketAddr) -> impl Future<Output = ()> + Send;
}

/// Error that can occur when starting or stopping the server.
#[derive(Error, Debug)]
pub enum Error {
    #[error("the {service} server could not start on {bind_to}")]
    Start { service: &'static str, bind_to: SocketAddr },

    #[error("the {service} server is not running anymore, it can't be halted")]
    Halt { service: &'static str },

    #[error("the {service} server task failed: {message}")]
    Task { service: &'static str, message: String },
}

/// A TCP server.
///
/// Configurations cannot be changed. This struct represents a concrete
/// configuration and state. It allows to start and stop the server keeping
/// the same configuration.
#[allow(clippy::module_name_repetitions)]
pub struct Server<S> {
    /// The state of the server: `running` or `stopped`.
    pub state: S,
}
