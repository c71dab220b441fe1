use filemesh::servers::signals::global_shutdown_signal;
use filemesh::{app, bootstrap};

#[tokio::main]
async fn main() {
    let (config, tracker) = bootstrap::app::setup();

    let store = bootstrap::app::initialize_chunk_store(&config);

    let jobs = app::start(&config, tracker, store).await;

    // handle the signals
    tokio::select! {
        () = global_shutdown_signal() => {
            tracing::info!("filemesh shutting down..");

            // Await for all jobs to shutdown
            futures::future::join_all(jobs).await;
            tracing::info!("filemesh successfully shutdown.");
        }
    }
}
