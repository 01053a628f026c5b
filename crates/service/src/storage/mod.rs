//! Storage engines.
//!
//! Both engines keep the same in-memory registry (`"<Class>.<id>"` to live
//! object) and differ only in where `save` and `reload` put the records.

use std::collections::BTreeMap;

use async_trait::async_trait;
use models::Object;

use crate::errors::ServiceError;

pub mod registry;
pub mod file_storage;
pub mod db_storage;

pub use db_storage::DbStorage;
pub use file_storage::FileStorage;
pub use registry::Registry;

/// Registry of live objects with durable full-snapshot persistence.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Every registered object, or those of class `class`. An unknown class
    /// name is a `Validation` error.
    async fn all(&self, class: Option<&str>) -> Result<BTreeMap<String, Object>, ServiceError>;

    /// Look up one object by class name and id.
    async fn get(&self, class: &str, id: &str) -> Result<Option<Object>, ServiceError>;

    /// Register `object` under its composite key, replacing any previous entry.
    #[allow(clippy::new_ret_no_self)]
    async fn new(&self, object: Object) -> Result<(), ServiceError>;

    /// Replace the backing store content with the whole registry.
    async fn save(&self) -> Result<(), ServiceError>;

    /// Remove `object` and save. Returns whether an entry was removed; `None`
    /// and absent keys are not errors.
    async fn delete(&self, object: Option<&Object>) -> Result<bool, ServiceError>;

    /// Merge the backing store content into the registry; returns the number of
    /// records loaded. A missing backing store loads nothing.
    async fn reload(&self) -> Result<usize, ServiceError>;

    async fn count(&self, class: Option<&str>) -> Result<usize, ServiceError> {
        Ok(self.all(class).await?.len())
    }
}
