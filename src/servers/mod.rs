//! Servers. Services that can be started and stopped.
//!
//! - [`tracker`]: the tracker protocol (`LIST`, `UPLOAD`, `SOURCES`, `UPDATE`).
//! - [`peer`]: the peer data protocol (`STAT`, `GET`).
//!
//! Both run on the generic TCP [`Server`](tcp::Server): one request per
//! connection, one task per connection.
pub mod logging;
pub mod peer;
pub mod signals;
pub mod tcp;
pub mod tracker;
