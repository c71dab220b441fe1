// Tracker protocol: one request per connection, the first byte is the tag.
//
// LIST(1) UPLOAD(2) SOURCES(3) UPDATE(4)

use std::net::SocketAddr;

use filemesh::shared::wire::tracker::{Request, Response};
use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
use tokio::net::TcpStream;

/// It sends a request over a new connection and returns the local address
/// of the connection with the decoded response.
async fn send_from_own_connection(tracker: SocketAddr, request: &Request) -> (SocketAddr, Response) {
    let mut stream = TcpStream::connect(tracker).await.unwrap();
    let local = stream.local_addr().unwrap();

    request.write_to(&mut stream).await.unwrap();

    let response = Response::read_from(request.kind(), &mut stream).await.unwrap();

    (local, response)
}

/// It sends raw bytes and returns every byte the tracker answers with.
async fn send_raw(tracker: SocketAddr, bytes: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(tracker).await.unwrap();

    stream.write_all(bytes).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}

mod receiving_a_list_request {
    use filemesh_primitives::file::{FileDescriptor, FileId};
    use filemesh_test_helpers::configuration;
    use tracing::level_filters::LevelFilter;

    use crate::common::logging::{tracing_stderr_init, INIT};
    use crate::servers::tracker::Started;

    #[tokio::test]
    async fn it_should_return_an_empty_catalog_when_nothing_was_published() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;

        assert!(env.client().list().await.unwrap().is_empty());

        env.stop().await;
    }

    #[tokio::test]
    async fn it_should_return_the_files_in_the_order_they_were_published() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;
        let client = env.client();

        client.upload("movie.mp4", 1_000_000).await.unwrap();
        client.upload("notes.txt", 12).await.unwrap();

        assert_eq!(
            client.list().await.unwrap(),
            vec![
                FileDescriptor::new(FileId(1), "movie.mp4".to_owned(), 1_000_000),
                FileDescriptor::new(FileId(2), "notes.txt".to_owned(), 12),
            ]
        );

        env.stop().await;
    }
}

mod receiving_an_upload_request {
    use std::collections::HashSet;
    use std::net::SocketAddr;

    use filemesh::shared::wire::tracker::{Request, Response};
    use filemesh_primitives::file::FileId;
    use filemesh_test_helpers::configuration;
    use futures::future::join_all;
    use tracing::level_filters::LevelFilter;

    use super::send_from_own_connection;
    use crate::common::logging::{tracing_stderr_init, INIT};
    use crate::servers::tracker::Started;

    #[tokio::test]
    async fn the_uploader_should_be_a_source_of_the_file_right_away() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;

        let (uploader, response) = send_from_own_connection(
            env.bind_address(),
            &Request::Upload {
                name: "movie.mp4".to_owned(),
                size: 1_000_000,
            },
        )
        .await;

        let Response::Upload { file_id: Some(file_id) } = response else {
            panic!("the file should be published, got: {response:?}");
        };

        let SocketAddr::V4(uploader) = uploader else {
            panic!("the test connects over IPv4");
        };

        assert_eq!(env.client().sources(file_id).await.unwrap(), vec![uploader]);

        env.stop().await;
    }

    #[tokio::test]
    async fn concurrent_uploads_should_get_distinct_ids() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;
        let client = env.client();

        let uploads = (0..32).map(|i| {
            let client = client.clone();
            async move { client.upload("same-name.bin", i).await.unwrap() }
        });

        let ids = join_all(uploads).await.into_iter().collect::<Option<HashSet<FileId>>>().unwrap();

        assert_eq!(ids.len(), 32);
        assert!(!ids.contains(&FileId(0)));

        env.stop().await;
    }
}

mod receiving_a_sources_request {
    use filemesh_primitives::file::FileId;
    use filemesh_test_helpers::configuration;
    use tracing::level_filters::LevelFilter;

    use super::send_raw;
    use crate::common::logging::{tracing_stderr_init, INIT};
    use crate::servers::tracker::Started;

    #[tokio::test]
    async fn it_should_answer_an_unknown_file_with_no_seeds() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;

        assert!(env.client().sources(FileId(42)).await.unwrap().is_empty());

        // The response is complete: the connection does not hang.
        assert_eq!(send_raw(env.bind_address(), &[3, 0, 0, 0, 42]).await, vec![0, 0, 0, 0]);

        env.stop().await;
    }
}

mod receiving_an_update_request {
    use std::net::{Ipv4Addr, SocketAddrV4};

    use filemesh_primitives::file::FileId;
    use filemesh_test_helpers::configuration;
    use tracing::level_filters::LevelFilter;

    use super::send_raw;
    use crate::common::logging::{tracing_stderr_init, INIT};
    use crate::servers::tracker::Started;

    fn localhost(port: u16) -> SocketAddrV4 {
        SocketAddrV4::new(Ipv4Addr::LOCALHOST, port)
    }

    #[tokio::test]
    async fn it_should_register_the_caller_at_the_declared_seed_port() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;
        let client = env.client();

        let file_id = client.upload("movie.mp4", 1_000_000).await.unwrap().unwrap();

        assert!(client.update(9000, &[file_id]).await.unwrap());

        assert!(client.sources(file_id).await.unwrap().contains(&localhost(9000)));

        env.stop().await;
    }

    #[tokio::test]
    async fn updating_twice_should_leave_a_single_entry_for_the_seed() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;
        let client = env.client();

        let first = client.upload("movie.mp4", 1_000_000).await.unwrap().unwrap();
        let second = client.upload("notes.txt", 12).await.unwrap().unwrap();

        assert!(client.update(9000, &[first, second]).await.unwrap());
        assert!(client.update(9000, &[first, second]).await.unwrap());

        for file_id in [first, second] {
            let seeds = client.sources(file_id).await.unwrap();

            assert_eq!(seeds.iter().filter(|seed| **seed == localhost(9000)).count(), 1);
        }

        env.stop().await;
    }

    #[tokio::test]
    async fn it_should_fail_without_changes_when_a_file_is_unknown() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;
        let client = env.client();

        let file_id = client.upload("movie.mp4", 1_000_000).await.unwrap().unwrap();

        assert!(!client.update(9000, &[file_id, FileId(99)]).await.unwrap());

        assert!(!client.sources(file_id).await.unwrap().contains(&localhost(9000)));

        env.stop().await;
    }

    #[tokio::test]
    async fn it_should_answer_false_to_a_malformed_request() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;

        let mut negative_count = vec![4];
        negative_count.extend_from_slice(&9000_i32.to_be_bytes());
        negative_count.extend_from_slice(&(-3_i32).to_be_bytes());

        assert_eq!(send_raw(env.bind_address(), &negative_count).await, vec![0]);

        let mut port_out_of_range = vec![4];
        port_out_of_range.extend_from_slice(&70_000_i32.to_be_bytes());
        port_out_of_range.extend_from_slice(&0_i32.to_be_bytes());

        assert_eq!(send_raw(env.bind_address(), &port_out_of_range).await, vec![0]);

        env.stop().await;
    }
}

mod receiving_a_malformed_request {
    use filemesh_test_helpers::configuration;
    use tracing::level_filters::LevelFilter;

    use super::send_raw;
    use crate::common::logging::{tracing_stderr_init, INIT};
    use crate::servers::tracker::Started;

    #[tokio::test]
    async fn it_should_close_the_connection_without_a_response_and_keep_serving() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into()).await;

        assert!(send_raw(env.bind_address(), &[9]).await.is_empty());
        assert!(send_raw(env.bind_address(), &[]).await.is_empty());

        assert!(env.client().list().await.unwrap().is_empty());

        env.stop().await;
    }
}

mod seed_liveness {
    use std::net::{Ipv4Addr, SocketAddrV4};
    use std::sync::Arc;
    use std::time::Duration;

    use filemesh_test_helpers::configuration;
    use tokio::time::sleep;
    use tracing::level_filters::LevelFilter;

    use crate::common::logging::{tracing_stderr_init, INIT};
    use crate::servers::tracker::Started;

    const SEED_TIMEOUT: Duration = Duration::from_millis(1000);

    #[tokio::test]
    async fn a_seed_that_stops_updating_should_not_be_a_source_after_the_timeout() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let mut config = configuration::ephemeral();
        config.core.seed_timeout = u64::try_from(SEED_TIMEOUT.as_millis()).unwrap();

        let env = Started::new(&Arc::new(config)).await;
        let client = env.client();

        let file_id = client.upload("movie.mp4", 1_000_000).await.unwrap().unwrap();
        assert!(client.update(9000, &[file_id]).await.unwrap());

        sleep(SEED_TIMEOUT * 6 / 10).await;

        // Only the seed on port 9001 keeps updating.
        assert!(client.update(9001, &[file_id]).await.unwrap());

        sleep(SEED_TIMEOUT * 6 / 10).await;

        let seeds = client.sources(file_id).await.unwrap();

        assert_eq!(seeds, vec![SocketAddrV4::new(Ipv4Addr::LOCALHOST, 9001)]);

        env.stop().await;
    }
}

mod restarting {
    use std::net::{Ipv4Addr, SocketAddrV4};
    use std::sync::Arc;
    use std::time::Duration;

    use filemesh_primitives::file::{FileDescriptor, FileId};
    use filemesh_test_helpers::configuration;
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpStream;
    use tracing::level_filters::LevelFilter;

    use crate::common::logging::{tracing_stderr_init, INIT};
    use crate::servers::tracker::Started;

    #[tokio::test]
    async fn the_catalog_and_the_active_seeds_should_survive_a_restart() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let config = Arc::new(configuration::ephemeral());

        let env = Started::new(&config).await;
        let client = env.client();
        let file_id = client.upload("movie.mp4", 1_000_000).await.unwrap().unwrap();
        assert!(client.update(9000, &[file_id]).await.unwrap());
        let seeds_before = client.sources(file_id).await.unwrap();
        env.stop().await;

        let env = Started::new(&config).await;
        let client = env.client();

        assert_eq!(
            client.list().await.unwrap(),
            vec![FileDescriptor::new(FileId(1), "movie.mp4".to_owned(), 1_000_000)]
        );
        assert_eq!(client.sources(file_id).await.unwrap(), seeds_before);
        assert!(seeds_before.contains(&SocketAddrV4::new(Ipv4Addr::LOCALHOST, 9000)));

        // New files do not reuse the restored ids.
        assert_eq!(client.upload("notes.txt", 12).await.unwrap(), Some(FileId(2)));

        env.stop().await;
    }

    #[tokio::test]
    async fn an_upload_in_flight_when_the_tracker_stops_should_not_be_acknowledged() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let config = Arc::new(configuration::ephemeral());

        let env = Started::new(&config).await;

        // Only the tag is sent before the tracker stops.
        let mut stream = TcpStream::connect(env.bind_address()).await.unwrap();
        stream.write_u8(2).await.unwrap();
        stream.flush().await.unwrap();

        env.stop().await;

        let mut body = Vec::new();
        body.extend_from_slice(&5_u16.to_be_bytes());
        body.extend_from_slice(b"a.mp4");
        body.extend_from_slice(&10_i64.to_be_bytes());
        let _ = stream.write_all(&body).await;

        let mut response = Vec::new();
        let read = tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
            .await
            .expect("the tracker should close the connection");
        assert!(read.is_err() || response.is_empty(), "no id should be acknowledged after the snapshot");

        let env = Started::new(&config).await;
        let client = env.client();

        assert!(client.list().await.unwrap().is_empty());
        assert_eq!(client.upload("b.mp4", 20).await.unwrap(), Some(FileId(1)));

        env.stop().await;
    }
}
