//! Blob compression proof coordinator binary

use blob_coordinator_node::{dev::DevBlobProducer, BlobCoordinatorArgs, CoordinatorCollaborators};
use std::time::Duration;

#[tokio::main]
async fn main() {
    use clap::Parser;

    init_tracing_subscriber();

    // Enable backtraces unless a RUST_BACKTRACE value has already been explicitly provided.
    if std::env::var_os("RUST_BACKTRACE").is_none() {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    let args = BlobCoordinatorArgs::parse();
    if let Err(err) = run(args).await {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

async fn run(args: BlobCoordinatorArgs) -> eyre::Result<()> {
    args.validate().map_err(|err| eyre::eyre!(err))?;

    tracing::info!(target: "blob_coordinator::node", config = ?args.coordinator_config(), "Launching blob compression proof coordinator");
    let coordinator = args.build(CoordinatorCollaborators::mock()).await?;

    let producer = DevBlobProducer::new(&args.dev_args, &coordinator.cursor().await);
    let producer = tokio::spawn(producer.run(
        coordinator.handle(),
        Duration::from_millis(args.dev_args.blob_interval_ms),
        args.dev_args.blob_count,
    ));

    coordinator.start();
    tokio::signal::ctrl_c().await?;
    tracing::info!(target: "blob_coordinator::node", "Received shutdown signal");

    producer.abort();
    coordinator.stop();
    coordinator.wait_for_in_flight().await;

    Ok(())
}

/// Initialize the tracing subscriber, filtered by `RUST_LOG` and defaulting to `info`.
fn init_tracing_subscriber() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(false)
                .with_ansi(true),
        )
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("info"))
                .expect("Failed to create EnvFilter"),
        )
        .init();
}
