use std::sync::Arc;

use tokio::sync::watch;

use crate::common::config::load_server_config;
use crate::server::cluster_heartbeat::run_heartbeat;
use crate::server::loader::load_membership;
use crate::sync::start_target_sync;

pub async fn server_start(config_path: &str) -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    log::info!("Starting Prometheus target synchronizer...");
    let server_config = load_server_config(config_path)?;
    let node_id = server_config.node_id();
    log::info!("Node {} running on {}", node_id, server_config.hostname);

    let membership = Arc::new(load_membership(&server_config).await?);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let heartbeat = tokio::spawn(run_heartbeat(
        membership.clone(),
        node_id.clone(),
        server_config.hostname.clone(),
        server_config.heartbeat_interval_ms,
        shutdown_rx,
    ));

    let target_sync = server_config.target_sync();
    let coalescer = start_target_sync(target_sync.as_ref(), membership.clone()).await;
    match &coalescer {
        Some(_) => log::info!("Node {} publishes the Prometheus target file", node_id),
        None => log::info!("Node {} runs without publishing Prometheus targets", node_id),
    }

    tokio::signal::ctrl_c().await?;
    log::info!("Shutting down...");
    if let Some(coalescer) = coalescer {
        coalescer.shutdown();
    }
    shutdown_tx.send_replace(true);
    if let Err(e) = heartbeat.await {
        log::warn!("Heartbeat task failed: {:?}", e);
    }
    Ok(())
}
