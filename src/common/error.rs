use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("target file {path:?} is not writable from this node: {source}")]
    CapabilityDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to query cluster membership: {0:#}")]
    SnapshotQueryFailure(anyhow::Error),
    #[error("failed to write target file {path:?}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode targets: {0}")]
    Encode(#[from] serde_json::Error),
}
