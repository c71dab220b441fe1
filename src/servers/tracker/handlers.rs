//! Handlers for the tracker protocol requests.
use std::net::{SocketAddr, SocketAddrV4};

use filemesh_primitives::file::FileId;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt as _};
use tracing::{debug, instrument, warn};

use super::TRACKER_LOG_TARGET;
use crate::core::Tracker;
use crate::shared::wire::tracker::{Kind, Request, Response};

/// It serves one connection: one request, one response, then the
/// connection is closed.
///
/// It never fails. A framing error closes the connection without a
/// response, except for `UPDATE` which is answered with `false`.
#[instrument(skip(tracker, stream))]
pub async fn handle_connection<S: AsyncRead + AsyncWrite + Unpin>(tracker: &Tracker, stream: &mut S, remote: SocketAddr) {
    let kind = match Kind::read_from(stream).await {
        Ok(kind) => kind,
        Err(err) => {
            debug!(target: TRACKER_LOG_TARGET, %remote, %err, "invalid request tag");
            return;
        }
    };

    let response = match Request::read_body(kind, stream).await {
        Ok(request) => handle_request(tracker, request, remote),
        Err(err) if kind == Kind::Update => {
            warn!(target: TRACKER_LOG_TARGET, %remote, %err, "malformed UPDATE request");
            Response::Update { success: false }
        }
        Err(err) => {
            debug!(target: TRACKER_LOG_TARGET, %remote, ?kind, %err, "malformed request");
            return;
        }
    };

    if let Err(err) = response.write_to(stream).await {
        debug!(target: TRACKER_LOG_TARGET, %remote, ?kind, %err, "failed to write the response");
        return;
    }

    if let Err(err) = stream.shutdown().await {
        debug!(target: TRACKER_LOG_TARGET, %remote, ?kind, %err, "failed to close the connection");
    }
}

/// It dispatches a decoded request. Every request gets a response.
#[must_use]
pub fn handle_request(tracker: &Tracker, request: Request, remote: SocketAddr) -> Response {
    match request {
        Request::List => handle_list(tracker),
        Request::Upload { name, size } => handle_upload(tracker, &name, size, remote),
        Request::Sources { file_id } => handle_sources(tracker, file_id),
        Request::Update { seed_port, file_ids } => handle_update(tracker, seed_port, &file_ids, remote),
    }
}

#[must_use]
pub fn handle_list(tracker: &Tracker) -> Response {
    Response::List {
        files: tracker.list_files(),
    }
}

/// The connection source address becomes the first seed of the file.
#[must_use]
pub fn handle_upload(tracker: &Tracker, name: &str, size: u64, remote: SocketAddr) -> Response {
    let SocketAddr::V4(seed) = remote else {
        warn!(target: TRACKER_LOG_TARGET, %remote, name, "UPLOAD from a non-IPv4 address");
        return Response::Upload { file_id: None };
    };

    match tracker.upload(name, size, seed) {
        Ok(file) => Response::Upload { file_id: Some(file.id) },
        Err(err) => {
            warn!(target: TRACKER_LOG_TARGET, %remote, name, %err, "UPLOAD failed");
            Response::Upload { file_id: None }
        }
    }
}

/// An unknown file has no seeds.
#[must_use]
pub fn handle_sources(tracker: &Tracker, file_id: FileId) -> Response {
    match tracker.sources(file_id) {
        Ok(seeds) => Response::Sources {
            seeds: seeds.iter().map(filemesh_primitives::peer::PeerIdentity::key).collect(),
        },
        Err(err) => {
            warn!(target: TRACKER_LOG_TARGET, %file_id, %err, "SOURCES for an unknown file");
            Response::Sources { seeds: vec![] }
        }
    }
}

/// The seed is the connection source address with the declared data-plane
/// port, not the source port of the connection.
#[must_use]
pub fn handle_update(tracker: &Tracker, seed_port: u16, file_ids: &[FileId], remote: SocketAddr) -> Response {
    let SocketAddr::V4(remote_v4) = remote else {
        warn!(target: TRACKER_LOG_TARGET, %remote, "UPDATE from a non-IPv4 address");
        return Response::Update { success: false };
    };

    let seed = SocketAddrV4::new(*remote_v4.ip(), seed_port);

    match tracker.update(seed, file_ids) {
        Ok(()) => Response::Update { success: true },
        Err(err) => {
            warn!(target: TRACKER_LOG_TARGET, %seed, %err, "UPDATE rejected");
            Response::Update { success: false }
        }
    }
}
