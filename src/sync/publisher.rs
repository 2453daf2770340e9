use std::sync::Arc;

use crate::common::error::SyncError;
use crate::common::target::{derive_targets, encode_targets};
use crate::storage::file::file_target_store::FileTargetStore;
use crate::traits::membership::MembershipProvider;

pub struct TargetPublisher<M> {
    membership: Arc<M>,
    store: FileTargetStore,
    metrics_port: u16,
}

impl<M: MembershipProvider + Sync> TargetPublisher<M> {
    pub fn new(membership: Arc<M>, store: FileTargetStore, metrics_port: u16) -> Self {
        Self {
            membership,
            store,
            metrics_port,
        }
    }

    pub fn store(&self) -> &FileTargetStore {
        &self.store
    }

    /// Rewrites the target file from the membership as it is right now.
    /// Returns the number of targets written. On error the file is left as it was.
    pub async fn publish(&self) -> Result<usize, SyncError> {
        let nodes = self
            .membership
            .list_available_nodes()
            .await
            .map_err(SyncError::SnapshotQueryFailure)?;
        let targets = derive_targets(&nodes, self.metrics_port);
        let json = encode_targets(&targets)?;
        self.store.replace(json).await?;
        Ok(targets.len())
    }
}
