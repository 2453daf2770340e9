use crate::storage::file::file_target_store::FileTargetStore;
use crate::sync::report;

/// Whether this process may write the target file. Decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterCapability {
    can_write: bool,
}

impl WriterCapability {
    pub const fn granted() -> Self {
        Self { can_write: true }
    }

    pub const fn denied() -> Self {
        Self { can_write: false }
    }

    pub fn can_write(&self) -> bool {
        self.can_write
    }
}

/// Finds or creates the target file. Never fails: any problem means `denied`.
pub async fn probe(store: &FileTargetStore) -> WriterCapability {
    log::info!("Looking for Prometheus target file at {:?}", store.path());
    match store.ensure_exists().await {
        Ok(created) => {
            if created {
                log::info!("Created empty Prometheus target file at {:?}", store.path());
            } else {
                log::info!("Found Prometheus target file at {:?}", store.path());
            }
            WriterCapability::granted()
        }
        Err(e) => {
            report(&e);
            WriterCapability::denied()
        }
    }
}
