//! Tracker protocol server.
//!
//! It answers the control-plane requests of the nodes:
//!
//! Tag | Request | Description
//! ---|---|---
//! `1` | `LIST` | The catalog, in publication order.
//! `2` | `UPLOAD` | Publish a file. The caller becomes its first seed.
//! `3` | `SOURCES` | The active seeds of a file. Stale seeds are evicted.
//! `4` | `UPDATE` | Refresh the caller as a seed of a set of files.
//!
//! See [`wire::tracker`](crate::shared::wire::tracker) for the message
//! layouts.
//!
//! Every connection carries exactly one request. A malformed request closes
//! the connection without a response, except for `UPDATE`, which is always
//! answered: a malformed `UPDATE` is answered with `false`.
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpStream;

use super::tcp::Handler;
use crate::core::Tracker;

pub mod handlers;

pub const TRACKER_LOG_TARGET: &str = "TRACKER SERVER";

/// Serves the tracker protocol on top of the core [`Tracker`].
#[derive(Clone)]
pub struct TrackerHandler {
    tracker: Arc<Tracker>,
}

impl TrackerHandler {
    #[must_use]
    pub fn new(tracker: Arc<Tracker>) -> Self {
        Self { tracker }
    }
}

impl Handler for TrackerHandler {
    const SERVICE: &'static str = TRACKER_LOG_TARGET;

    fn handle(self, mut stream: TcpStream, remote: SocketAddr) -> impl Future<Output = ()> + Send {
        async move {
            handlers::handle_connection(&self.tracker, &mut stream, remote).await;
        }
    }
}
