pub mod capability;
pub mod coalescer;
pub mod publisher;

use std::sync::Arc;

use crate::common::config::TargetSyncConfig;
use crate::common::error::SyncError;
use crate::storage::file::file_target_store::FileTargetStore;
use crate::traits::membership::MembershipProvider;
use capability::probe;
use coalescer::ChangeCoalescer;
use publisher::TargetPublisher;

/// Logging boundary for everything the synchronizer can fail with.
pub fn report(err: &SyncError) {
    match err {
        SyncError::CapabilityDenied { .. } => {
            log::warn!("{}. This node will not publish Prometheus targets", err)
        }
        SyncError::SnapshotQueryFailure(_) | SyncError::WriteFailure { .. } => {
            log::warn!("{}. Keeping the previous target file", err)
        }
        SyncError::Encode(_) => log::error!("{}", err),
    }
}

/// Wires the capability gate, coalescer and publisher together.
///
/// Returns `None`, without subscribing to membership, when no target location is
/// configured or this node cannot write it. Otherwise an initial regeneration is
/// already scheduled.
pub async fn start_target_sync<M>(
    config: Option<&TargetSyncConfig>,
    membership: Arc<M>,
) -> Option<ChangeCoalescer>
where
    M: MembershipProvider + Send + Sync + 'static,
{
    log::info!("Registering Prometheus service discovery");
    let Some(config) = config else {
        log::error!("No Prometheus target file is configured, service discovery disabled");
        return None;
    };

    let store = FileTargetStore::new(config.path.clone());
    if !probe(&store).await.can_write() {
        return None;
    }

    let events = membership.subscribe();
    let publisher = TargetPublisher::new(membership, store, config.metrics_port);
    let coalescer = ChangeCoalescer::spawn(publisher, events);
    coalescer.request_regeneration();
    Some(coalescer)
}
