use std::collections::BTreeMap;

use async_trait::async_trait;
use configs::DatabaseConfig;
use migration::MigratorTrait;
use models::{stored_object, ClassRegistry, Object};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, TransactionTrait};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::ServiceError;
use crate::storage::{Registry, Storage};

// Keeps multi-row inserts under SQLite's bound-parameter limit.
const INSERT_CHUNK: usize = 100;

/// Relational object registry: same contract as
/// [`FileStorage`](crate::storage::FileStorage), backed by the
/// `stored_object` table.
///
/// `save` replaces the table content with the registry inside one
/// transaction.
pub struct DbStorage {
    db: DatabaseConnection,
    inner: Mutex<Registry>,
}

impl DbStorage {
    /// Connect, apply pending migrations, and return an empty engine.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, ServiceError> {
        let db = models::db::connect_with_config(cfg).await?;
        migration::Migrator::up(&db, None).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(Self::from_connection(db))
    }

    /// Engine over an existing connection whose schema is already migrated.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db, inner: Mutex::new(Registry::new(ClassRegistry::builtin())) }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn write(&self, registry: &Registry) -> Result<(), ServiceError> {
        let rows = registry
            .all(None)?
            .iter()
            .map(|(key, obj)| stored_object::to_active_model(key, obj))
            .collect::<Result<Vec<_>, _>>()?;

        let txn = self.db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        stored_object::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        for chunk in rows.chunks(INSERT_CHUNK) {
            stored_object::Entity::insert_many(chunk.iter().cloned())
                .exec(&txn)
                .await
                .map_err(|e| ServiceError::Db(e.to_string()))?;
        }
        txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        debug!(objects = rows.len(), "registry saved to database");
        Ok(())
    }
}

#[async_trait]
impl Storage for DbStorage {
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
        let rows = stored_object::Entity::find()
            .order_by_asc(stored_object::Column::Key)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        let stored = rows
            .into_iter()
            .map(|row| {
                let key = row.key.clone();
                row.into_record()
                    .map(|record| (key.clone(), serde_json::Value::Object(record)))
                    .map_err(|e| ServiceError::MalformedRecord { key, reason: e.to_string() })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut registry = self.inner.lock().await;
        let decoded = registry.decode(stored)?;
        let loaded = registry.extend(decoded);
        info!(loaded, "registry reloaded from database");
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Entity, Place, State};

    async fn sqlite_storage() -> Result<(DbStorage, DatabaseConfig, std::path::PathBuf), anyhow::Error> {
        let path = std::env::temp_dir().join(format!("hbnb_db_{}.sqlite", uuid::Uuid::new_v4()));
        let cfg = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            max_connections: 1,
            ..DatabaseConfig::default()
        };
        let storage = DbStorage::connect(&cfg).await?;
        Ok((storage, cfg, path))
    }

    #[tokio::test]
    async fn db_storage_save_and_reload() -> Result<(), anyhow::Error> {
        let (storage, cfg, path) = sqlite_storage().await?;
        assert_eq!(storage.reload().await?, 0);

        let mut state = State::default();
        state.name = "Oregon".into();
        let mut place = Place::default();
        place.name = "Cabin".into();
        place.latitude = 45.5;
        place.amenity_ids = vec!["a-1".into()];
        storage.new(state.clone().into()).await?;
        storage.new(place.clone().into()).await?;
        storage.save().await?;

        let fresh = DbStorage::connect(&cfg).await?;
        assert_eq!(fresh.reload().await?, 2);
        let back = fresh.get("Place", place.id()).await?.unwrap();
        assert_eq!(back.downcast::<Place>().unwrap(), place);
        assert_eq!(fresh.count(Some("State")).await?, 1);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn db_storage_delete_rewrites_table() -> Result<(), anyhow::Error> {
        let (storage, cfg, path) = sqlite_storage().await?;
        let a = State::default();
        let b = State::default();
        storage.new(a.clone().into()).await?;
        storage.new(b.clone().into()).await?;
        storage.save().await?;

        assert!(storage.delete(Some(&a.clone().into())).await?);
        assert!(!storage.delete(Some(&a.into())).await?);
        assert!(!storage.delete(None).await?);

        let fresh = DbStorage::connect(&cfg).await?;
        assert_eq!(fresh.reload().await?, 1);
        assert!(fresh.get("State", b.id()).await?.is_some());

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
