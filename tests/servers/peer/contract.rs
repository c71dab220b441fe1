// Peer data protocol: one request per connection, the first byte is the tag.
//
// STAT(1) GET(2)

use filemesh::core::chunks::FileContents;
use filemesh_primitives::file::FileId;

/// File `7` is split in chunks of four bytes. The node has chunk `3` but not
/// chunk `4`.
fn partially_downloaded_file() -> (FileId, FileContents) {
    let mut contents = FileContents::empty(6 * 4, 4);

    contents.put_chunk(0, b"abcd".to_vec());
    contents.put_chunk(3, b"mnop".to_vec());

    (FileId(7), contents)
}

mod receiving_a_stat_request {
    use filemesh_primitives::file::FileId;
    use filemesh_test_helpers::configuration;
    use tracing::level_filters::LevelFilter;

    use super::partially_downloaded_file;
    use crate::common::logging::{tracing_stderr_init, INIT};
    use crate::servers::peer::Started;

    #[tokio::test]
    async fn it_should_list_the_present_chunks_in_ascending_order() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;
        let (file_id, contents) = partially_downloaded_file();
        env.store.insert(file_id, contents);

        let chunks = env.client().stat(file_id).await.unwrap();

        assert_eq!(chunks, vec![0, 3]);
        assert!(!chunks.contains(&4));

        env.stop().await;
    }

    #[tokio::test]
    async fn it_should_list_no_chunks_for_a_file_the_node_does_not_own() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;

        assert!(env.client().stat(FileId(7)).await.unwrap().is_empty());

        env.stop().await;
    }
}

mod receiving_a_get_request {
    use filemesh_test_helpers::configuration;
    use tracing::level_filters::LevelFilter;

    use super::partially_downloaded_file;
    use crate::common::logging::{tracing_stderr_init, INIT};
    use crate::servers::peer::Started;

    #[tokio::test]
    async fn it_should_return_the_exact_bytes_of_a_present_chunk() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;
        let (file_id, contents) = partially_downloaded_file();
        env.store.insert(file_id, contents);

        assert_eq!(env.client().get(file_id, 3).await.unwrap(), b"mnop".to_vec());

        env.stop().await;
    }

    #[tokio::test]
    async fn it_should_return_an_empty_result_for_an_absent_chunk() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;
        let (file_id, contents) = partially_downloaded_file();
        env.store.insert(file_id, contents);

        let client = env.client();

        assert!(client.get(file_id, 4).await.unwrap().is_empty());
        assert!(client.get(file_id, 600).await.unwrap().is_empty());

        env.stop().await;
    }

    #[tokio::test]
    async fn it_should_serve_a_chunk_stored_while_the_server_is_running() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;
        let (file_id, contents) = partially_downloaded_file();
        env.store.insert(file_id, contents);

        assert!(env.store.put_chunk(file_id, 4, b"qrst".to_vec()));

        assert_eq!(env.client().stat(file_id).await.unwrap(), vec![0, 3, 4]);
        assert_eq!(env.client().get(file_id, 4).await.unwrap(), b"qrst".to_vec());

        env.stop().await;
    }
}
