mod cli;

use crate::cli::{StoreBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use numbering_core::{CounterStore, Sequencer};
use numbering_gateway::{App, AppState};
use numbering_guid::{GuidGenerator, GuidSettings};
use numbering_sequence::{InMemoryCounterStore, RedisCounterStore, SequenceGenerator};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    numbering_telemetry::init(config.log_format.into())?;

    info!(
        listen_addr = %config.listen_addr,
        store_backend = %config.store,
        "starting numbering gateway"
    );

    let settings = GuidSettings::builder()
        .server_id(config.server_id.clone())
        .build();
    let guid = GuidGenerator::new(settings);
    info!(
        server_id = guid.server_id(),
        process_id = guid.process_id(),
        "guid generator ready"
    );

    let store: Arc<dyn CounterStore> = match config.store {
        StoreBackendArg::InMemory => {
            warn!("in-memory counter store: sequences are only unique within this process");
            Arc::new(InMemoryCounterStore::new())
        }
        StoreBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("redis url is required when store backend is redis")?;
            let store = RedisCounterStore::connect(redis_url, Some(config.redis_timeout()))
                .await
                .context("failed to connect to the counter store")?;
            Arc::new(store)
        }
    };
    let sequencer: Arc<dyn Sequencer> = Arc::new(SequenceGenerator::new(store));

    let state = AppState::new(Arc::new(guid), sequencer);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
