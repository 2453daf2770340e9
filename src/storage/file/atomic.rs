use std::{
    ffi::OsString,
    fs::{self, File, OpenOptions},
    io::{Error, ErrorKind, Result, Write},
    path::{Path, PathBuf},
};

/// Replaces `path` with `bytes` so that readers see either the old or the new
/// contents, never a partial file.
///
/// The data goes to a hidden sibling first, is synced, then renamed over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = temp_sibling(path)?;
    if let Err(e) = write_and_sync(&tmp_path, bytes).and_then(|_| fs::rename(&tmp_path, path)) {
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            if cleanup.kind() != ErrorKind::NotFound {
                log::debug!("Failed to remove temp file {:?}: {:?}", tmp_path, cleanup);
            }
        }
        return Err(e);
    }

    if let Some(dir) = parent_dir(path) {
        // best effort once the rename is done
        if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
            log::debug!("Failed to sync directory {:?}: {:?}", dir, e);
        }
    }
    Ok(())
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn temp_sibling(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| Error::new(ErrorKind::InvalidInput, format!("{path:?} has no file name")))?;
    let mut tmp_name = OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
    Ok(path.with_file_name(tmp_name))
}

fn parent_dir(path: &Path) -> Option<&Path> {
    match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Some(Path::new(".")),
        other => other,
    }
}

/// Hidden sibling used for advisory locking, e.g. `targets.json` -> `.targets.json.lock`.
pub fn lock_sibling(path: &Path) -> PathBuf {
    let mut lock_name = OsString::from(".");
    lock_name.push(path.file_name().unwrap_or(path.as_os_str()));
    lock_name.push(".lock");
    path.with_file_name(lock_name)
}
