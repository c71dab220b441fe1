//! A whole exchange between two nodes through the tracker.
//!
//! Node A publishes `movie.mp4` and serves its chunks. Node B finds the file
//! in the catalog, asks the tracker for its sources and downloads every chunk
//! from node A.
use std::net::SocketAddr;
use std::sync::Arc;

use filemesh::core::chunks::FileContents;
use filemesh::shared::clients::peer::PeerClient;
use filemesh_primitives::file::{FileDescriptor, FileId};
use filemesh_test_helpers::configuration;
use tracing::level_filters::LevelFilter;

use crate::common::logging::{tracing_stderr_init, INIT};
use crate::servers::{peer, tracker};

const FILE_SIZE: usize = 1_000_000;
const CHUNK_SIZE: u32 = 64 * 1024;

fn movie() -> Vec<u8> {
    (0..FILE_SIZE).map(|i| u8::try_from(i % 251).unwrap()).collect()
}

#[tokio::test]
async fn a_node_should_download_a_file_published_by_another_node() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let config = Arc::new(configuration::ephemeral_with_chunk_size(CHUNK_SIZE));

    let tracker = tracker::Started::new(&config).await;
    let node_a = peer::Started::new(&config).await;

    // Node A publishes the file and announces its data server port.
    let a_tracker = tracker.client();
    let file_id = a_tracker.upload("movie.mp4", FILE_SIZE as u64).await.unwrap().unwrap();
    assert_eq!(file_id, FileId(1));

    node_a.store.insert(file_id, FileContents::split(&movie(), node_a.config.chunk_size));
    assert!(a_tracker.update(node_a.bind_address().port(), &[file_id]).await.unwrap());

    // Node B discovers it.
    let b_tracker = tracker.client();

    assert_eq!(
        b_tracker.list().await.unwrap(),
        vec![FileDescriptor::new(FileId(1), "movie.mp4".to_owned(), FILE_SIZE as u64)]
    );

    let seed = b_tracker
        .sources(file_id)
        .await
        .unwrap()
        .into_iter()
        .map(SocketAddr::V4)
        .find(|seed| *seed == node_a.bind_address())
        .expect("node A should be a source of the file");

    // Node B downloads every chunk from node A.
    let seed = PeerClient::new(seed);

    let chunks = seed.stat(file_id).await.unwrap();
    assert_eq!(chunks.len(), FILE_SIZE.div_ceil(CHUNK_SIZE as usize));

    let mut download = FileContents::empty(FILE_SIZE as u64, CHUNK_SIZE);
    for index in chunks {
        let bytes = seed.get(file_id, index).await.unwrap();
        assert!(download.put_chunk(index, bytes));
    }

    assert_eq!(download.assemble(), Some(movie()));

    node_a.stop().await;
    tracker.stop().await;
}
