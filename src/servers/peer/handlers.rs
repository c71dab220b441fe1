//! Handlers for the peer data protocol requests.
use std::net::SocketAddr;

use filemesh_primitives::file::FileId;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt as _};
use tracing::{debug, instrument, warn};

use super::PEER_SERVER_LOG_TARGET;
use crate::core::chunks::ClientState;
use crate::shared::wire::peer::{Request, Response};

/// It serves one connection: one request, one response, then the
/// connection is closed. A framing error closes the connection without a
/// response.
#[instrument(skip(state, stream))]
pub async fn handle_connection<S: AsyncRead + AsyncWrite + Unpin>(state: &ClientState, stream: &mut S, remote: SocketAddr) {
    let request = match Request::read_from(stream).await {
        Ok(request) => request,
        Err(err) => {
            debug!(target: PEER_SERVER_LOG_TARGET, %remote, %err, "malformed request");
            return;
        }
    };

    let response = handle_request(state, request);

    if let Err(err) = response.write_to(stream).await {
        debug!(target: PEER_SERVER_LOG_TARGET, %remote, %err, "failed to write the response");
        return;
    }

    if let Err(err) = stream.shutdown().await {
        debug!(target: PEER_SERVER_LOG_TARGET, %remote, %err, "failed to close the connection");
    }
}

#[must_use]
pub fn handle_request(state: &ClientState, request: Request) -> Response {
    match request {
        Request::Stat { file_id } => handle_stat(state, file_id),
        Request::Get { file_id, chunk_index } => handle_get(state, file_id, chunk_index),
    }
}

/// A file the node does not own has no chunks.
#[must_use]
pub fn handle_stat(state: &ClientState, file_id: FileId) -> Response {
    let chunks = state.present_chunks(file_id).unwrap_or_else(|| {
        warn!(target: PEER_SERVER_LOG_TARGET, %file_id, "STAT for a file the node does not own");
        vec![]
    });

    Response::Stat { chunks }
}

/// An absent chunk is answered with zero bytes.
#[must_use]
pub fn handle_get(state: &ClientState, file_id: FileId, chunk_index: i32) -> Response {
    let bytes = state.chunk(file_id, chunk_index).unwrap_or_else(|| {
        warn!(target: PEER_SERVER_LOG_TARGET, %file_id, chunk_index, "GET for an absent chunk");
        vec![]
    });

    Response::Get { bytes }
}
