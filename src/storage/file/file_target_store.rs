use std::{
    fs::{self, OpenOptions},
    io::{Error, ErrorKind, Result},
    path::{Path, PathBuf},
};

use fs2::FileExt;

use crate::common::error::SyncError;
use crate::storage::file::atomic::{lock_sibling, write_atomic};

const EMPTY_TARGETS: &[u8] = b"[]";

/// The Prometheus target file on local (or shared) disk.
#[derive(Debug, Clone)]
pub struct FileTargetStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileTargetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = lock_sibling(&path);
        Self { path, lock_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Returns `Ok(true)` when the file had to be created with an empty target list.
    /// Parent directories are never created.
    pub async fn ensure_exists(&self) -> std::result::Result<bool, SyncError> {
        let store = self.clone();
        let outcome = tokio::task::spawn_blocking(move || store.ensure_exists_blocking())
            .await
            .unwrap_or_else(|e| Err(Error::other(e)));
        outcome.map_err(|source| SyncError::CapabilityDenied {
            path: self.path.clone(),
            source,
        })
    }

    /// Atomically swaps in `bytes` as the new file contents.
    pub async fn replace(&self, bytes: Vec<u8>) -> std::result::Result<(), SyncError> {
        let store = self.clone();
        let outcome = tokio::task::spawn_blocking(move || store.replace_blocking(&bytes))
            .await
            .unwrap_or_else(|e| Err(Error::other(e)));
        outcome.map_err(|source| SyncError::WriteFailure {
            path: self.path.clone(),
            source,
        })
    }

    fn ensure_exists_blocking(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_file() && !meta.permissions().readonly() => Ok(false),
            Ok(meta) if meta.is_file() => Err(Error::new(
                ErrorKind::PermissionDenied,
                "target file is read-only",
            )),
            Ok(_) => Err(Error::new(
                ErrorKind::InvalidInput,
                "target path exists but is not a regular file",
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Creating empty target file: {:?}", self.path);
                self.replace_blocking(EMPTY_TARGETS)?;
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    fn replace_blocking(&self, bytes: &[u8]) -> Result<()> {
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?;
        lock_file.try_lock_exclusive().map_err(|e| {
            if e.kind() == ErrorKind::WouldBlock {
                Error::new(ErrorKind::WouldBlock, "target file is locked by another writer")
            } else {
                e
            }
        })?;

        log::debug!("Writing {} bytes to target file: {:?}", bytes.len(), self.path);
        write_atomic(&self.path, bytes)
        // lock released when lock_file drops
    }
}
