use std::{
    fs::{self, create_dir_all},
    io::ErrorKind::NotFound,
    path::{Path, PathBuf},
};

use anyhow::Result;

use crate::common::cluster::NodeHeartbeat;
use crate::storage::file::atomic::write_atomic;

/// One `<node_id>.json` heartbeat record per node in a shared directory.
#[derive(Debug, Clone)]
pub struct FileHeartbeatStore {
    heartbeat_dir: PathBuf,
}

impl FileHeartbeatStore {
    pub fn new(heartbeat_dir: impl Into<PathBuf>) -> Self {
        Self {
            heartbeat_dir: heartbeat_dir.into(),
        }
    }

    pub async fn put(&self, heartbeat: &NodeHeartbeat) -> Result<()> {
        let path = self.heartbeat_path(&heartbeat.node_id)?;
        let json = serde_json::to_vec_pretty(heartbeat)?;
        let dir = self.heartbeat_dir.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            create_dir_all(&dir)?;
            write_atomic(&path, &json)?;
            log::debug!("Heartbeat written to {:?}", path);
            Ok(())
        })
        .await?
    }

    /// Returns false when there was no heartbeat file for `node_id`.
    pub async fn remove(&self, node_id: &str) -> Result<bool> {
        let path = self.heartbeat_path(node_id)?;
        tokio::task::spawn_blocking(move || -> Result<bool> {
            match fs::remove_file(&path) {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
        .await?
    }

    /// All readable heartbeats. Unparseable files are skipped.
    pub async fn list(&self) -> Result<Vec<NodeHeartbeat>> {
        let dir = self.heartbeat_dir.clone();
        tokio::task::spawn_blocking(move || list_blocking(&dir)).await?
    }

    fn heartbeat_path(&self, node_id: &str) -> Result<PathBuf> {
        if node_id.is_empty() || node_id.starts_with('.') || node_id.contains(['/', '\\']) {
            return Err(anyhow::anyhow!("Invalid node id for heartbeat file: {:?}", node_id));
        }
        Ok(self.heartbeat_dir.join(format!("{node_id}.json")))
    }
}

fn list_blocking(dir: &Path) -> Result<Vec<NodeHeartbeat>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == NotFound => return Ok(vec![]),
        Err(e) => return Err(e.into()),
    };

    let mut heartbeats = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || !name.ends_with(".json") || !entry.file_type()?.is_file() {
            continue;
        }
        let contents = match fs::read(&path) {
            Ok(c) => c,
            // removed between read_dir and read
            Err(e) if e.kind() == NotFound => continue,
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice::<NodeHeartbeat>(&contents) {
            Ok(hb) => heartbeats.push(hb),
            Err(e) => log::warn!("Skipping malformed heartbeat file {:?}: {}", path, e),
        }
    }
    Ok(heartbeats)
}
