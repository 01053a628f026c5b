//! Process-start wiring: build the configured engine and load the backing
//! store into it before anything else touches objects.

use std::sync::Arc;

use configs::{AppConfig, StorageBackend};
use tracing::info;

use crate::storage::{DbStorage, FileStorage, Storage};

pub async fn open_storage(cfg: &AppConfig) -> anyhow::Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match cfg.storage.backend {
        StorageBackend::File => {
            common::env::ensure_env(&configs::config_path(), &cfg.storage.file_path).await?;
            Arc::new(FileStorage::open(&cfg.storage.file_path))
        }
        StorageBackend::Db => Arc::new(DbStorage::connect(&cfg.database).await?),
    };
    let loaded = storage.reload().await?;
    info!(backend = ?cfg.storage.backend, loaded, "storage ready");
    Ok(storage)
}
