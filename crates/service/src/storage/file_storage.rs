use std::{collections::BTreeMap, io::ErrorKind, path::{Path, PathBuf}, sync::Arc};
use async_trait::async_trait;
use models::{ClassRegistry, Object, Record};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, info, warn};

use crate::errors::ServiceError;
use crate::storage::{Registry, Storage};

/// JSON file-backed object registry.
///
/// The whole registry is written as one JSON object keyed by
/// `"<Class>.<id>"`. Every registry mutation that persists holds the same
/// lock across the write, so a save never sees a half-applied change.
#[derive(Clone)]
pub struct FileStorage {
    inner: Arc<Mutex<Registry>>,
    file_path: PathBuf,
}

impl FileStorage {
    /// Engine over `path` with the built-in class table. Nothing is read until
    /// [`Storage::reload`].
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        Self::with_classes(path, ClassRegistry::builtin())
    }

    pub fn with_classes<P: Into<PathBuf>>(path: P, classes: ClassRegistry) -> Self {
        Self { inner: Arc::new(Mutex::new(Registry::new(classes))), file_path: path.into() }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.file_path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    /// Write to a sibling temp file, sync it, then rename over the target.
    async fn write(&self, registry: &Registry) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(&registry.to_records()?)?;
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.temp_path();
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&data).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, &self.file_path).await?;
        debug!(path = %self.file_path.display(), objects = registry.len(), "registry saved");
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn all(&self, class: Option<&str>) -> Result<BTreeMap<String, Object>, ServiceError> {
        self.inner.lock().await.all(class)
    }

    async fn get(&self, class: &str, id: &str) -> Result<Option<Object>, ServiceError> {
        self.inner.lock().await.get(class, id)
    }

    async fn new(&self, object: Object) -> Result<(), ServiceError> {
        self.inner.lock().await.insert(object);
        Ok(())
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let registry = self.inner.lock().await;
        self.write(&registry).await
    }

    async fn delete(&self, object: Option<&Object>) -> Result<bool, ServiceError> {
        let Some(object) = object else { return Ok(false) };
        let key = object.key();
        let mut registry = self.inner.lock().await;
        if registry.remove(&key).is_none() {
            warn!(%key, "delete: no such object");
            return Ok(false);
        }
        self.write(&registry).await?;
        Ok(true)
    }

    async fn reload(&self) -> Result<usize, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "no backing file; nothing to reload");
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };
        let stored: Record = serde_json::from_slice(&bytes)?;

        let mut registry = self.inner.lock().await;
        let decoded = registry.decode(stored)?;
        let loaded = registry.extend(decoded);
        info!(path = %self.file_path.display(), loaded, "registry reloaded");
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Entity, User};

    fn temp_file(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hbnb_{}_{}.json", tag, uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn file_storage_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = temp_file("file_storage");
        let store = FileStorage::open(&tmp);

        // initially empty
        assert_eq!(store.reload().await?, 0);
        assert_eq!(store.all(None).await?.len(), 0);

        let mut alice = User::default();
        alice.first_name = "Alice".into();
        let bob = User::default();
        store.new(alice.clone().into()).await?;
        store.new(bob.clone().into()).await?;
        store.save().await?;
        assert!(!store.temp_path().exists());

        // delete and reload persistence
        let removed = store.delete(Some(&bob.clone().into())).await?;
        assert!(removed);
        let reloaded = FileStorage::open(&tmp);
        assert_eq!(reloaded.reload().await?, 1);
        let entries = reloaded.all(Some("User")).await?;
        assert_eq!(entries.len(), 1);
        let back = reloaded.get("User", alice.id()).await?.unwrap();
        assert_eq!(back.downcast::<User>().unwrap(), alice);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_replaces_previous_content_completely() -> Result<(), anyhow::Error> {
        let tmp = temp_file("file_storage_replace");
        tokio::fs::write(&tmp, b"{\"stale\": \"content that is longer than the new file\"}").await?;
        let store = FileStorage::open(&tmp);
        let user = User::default();
        store.new(user.clone().into()).await?;
        store.save().await?;

        assert!(!store.temp_path().exists());
        let on_disk: Record = serde_json::from_slice(&tokio::fs::read(&tmp).await?)?;
        assert_eq!(on_disk.len(), 1);
        assert!(on_disk.contains_key(&user.key()));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn delete_absent_or_none_is_not_an_error() -> Result<(), anyhow::Error> {
        let tmp = temp_file("file_storage_delete");
        let store = FileStorage::open(&tmp);
        assert!(!store.delete(None).await?);
        assert!(!store.delete(Some(&User::default().into())).await?);
        // nothing was written
        assert!(!tmp.exists());
        Ok(())
    }

    #[tokio::test]
    async fn save_creates_missing_parent_directory() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("hbnb_dir_{}", uuid::Uuid::new_v4()));
        let store = FileStorage::open(dir.join("nested").join("file.json"));
        store.new(User::default().into()).await?;
        store.save().await?;
        assert!(store.file_path().exists());
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn reload_rejects_malformed_json() -> Result<(), anyhow::Error> {
        let tmp = temp_file("file_storage_bad");
        tokio::fs::write(&tmp, b"{not json").await?;
        let store = FileStorage::open(&tmp);
        assert!(matches!(store.reload().await, Err(ServiceError::Parse(_))));
        assert_eq!(store.all(None).await?.len(), 0);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
