use std::sync::Arc;
use std::time::Duration;

use crate::common::cluster::NodeHeartbeat;
use crate::common::utils::{jittered_delay, now_millis};
use crate::membership::heartbeat::HeartbeatMembership;
use crate::membership::membership_impl::MembershipImpl;
use anyhow::Result;
use tokio::sync::watch;

pub async fn send_heartbeat(heartbeat: &NodeHeartbeat, membership: &HeartbeatMembership) -> Result<()> {
    match membership.send_heartbeat(heartbeat).await {
        Ok(()) => {
            log::debug!("Cluster Heartbeat sent successfully");
            Ok(())
        }
        Err(e) => {
            log::warn!("Failed to send heartbeat: {:?}", e);
            Err(e)
        }
    }
}

/// Heartbeats and refreshes the membership view until `shutdown` turns true or
/// its sender is dropped, then deletes this node's heartbeat file.
/// Returns immediately for non-heartbeat membership.
pub async fn run_heartbeat(
    membership: Arc<MembershipImpl>,
    node_id: String,
    hostname: String,
    interval_ms: u64,
    mut shutdown: watch::Receiver<bool>,
) {
    let MembershipImpl::Heartbeat(heartbeats) = membership.as_ref() else {
        return;
    };
    loop {
        let stopping = *shutdown.borrow();
        if stopping {
            break;
        }
        let heartbeat = NodeHeartbeat::new(node_id.clone(), hostname.clone(), now_millis());
        let _ = send_heartbeat(&heartbeat, heartbeats).await;
        if let Err(e) = heartbeats.refresh().await {
            log::warn!("Failed to refresh cluster membership: {:?}", e);
        }
        let delay = Duration::from_millis(jittered_delay(interval_ms));
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    match heartbeats.remove_heartbeat(&node_id).await {
        Ok(_) => log::info!("Removed heartbeat of node {}", node_id),
        Err(e) => log::warn!("Failed to remove heartbeat of node {}: {:?}", node_id, e),
    }
}
