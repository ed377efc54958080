use anyhow::{Context, Result};
use simplesearch::{config::Config, query::QueryDispatcher, server::HttpServer};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

pub async fn serve(mut config: Config, listen: Option<String>) -> Result<()> {
    if let Some(addr) = listen {
        config.http.listen_addr = addr;
        config.validate()?;
    }

    let dispatcher = QueryDispatcher::from_config(&config)
        .context("Failed to initialize search dispatcher")?;

    info!(
        "Starting simplesearch: backend={}, default_limit={}, max_limit={}, rrf_k={}",
        config.backend.search_url(),
        config.retrieval.default_limit,
        config.retrieval.max_limit,
        config.retrieval.rrf_k
    );

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
        let _ = shutdown_tx.send(());
    });

    HttpServer::new(config.http.clone(), Arc::new(dispatcher))
        .run(shutdown_rx)
        .await
}
