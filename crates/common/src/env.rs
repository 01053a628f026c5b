//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected paths exist at startup.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the directory holding the backing file exists; warn when the
/// config file is missing since defaults will be used instead.
pub async fn ensure_env(config_path: &str, storage_file: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(config_path).await.is_err() {
        warn!(%config_path, "config file not found; using defaults and environment");
    }
    match Path::new(storage_file).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
            debug!(dir = %dir.display(), "storage directory ready");
        }
        _ => {}
    }
    Ok(())
}
