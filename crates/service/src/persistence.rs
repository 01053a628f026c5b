//! Entity lifecycle over a [`Storage`] engine.
//!
//! Fresh objects are registered when created here; objects rebuilt from
//! stored records never register themselves (the engine's reload inserts
//! them). The registry keeps its own copy of each object, so `save` writes
//! the caller's current state back before persisting.

use models::{ClassRegistry, Entity, ModelClass, Object, CLASS_FIELD};
use serde_json::Value;

use crate::errors::ServiceError;
use crate::storage::Storage;

const RESERVED: [&str; 4] = ["id", "created_at", "updated_at", CLASS_FIELD];

/// Construct a fresh entity and register it.
pub async fn create<E: Entity>(storage: &dyn Storage) -> Result<E, ServiceError> {
    let entity = E::default();
    storage.new(entity.clone().into()).await?;
    Ok(entity)
}

/// Construct a fresh object of `class` and register it.
pub async fn create_object(storage: &dyn Storage, class: ModelClass) -> Result<Object, ServiceError> {
    let object = class.fresh();
    storage.new(object.clone()).await?;
    Ok(object)
}

/// Bump `updated_at`, re-register the entity and persist the whole registry.
pub async fn save<E: Entity>(storage: &dyn Storage, entity: &mut E) -> Result<(), ServiceError> {
    entity.base_mut().touch();
    storage.new(entity.clone().into()).await?;
    storage.save().await
}

pub async fn save_object(storage: &dyn Storage, object: &mut Object) -> Result<(), ServiceError> {
    object.base_mut().touch();
    storage.new(object.clone()).await?;
    storage.save().await
}

pub async fn delete<E: Entity>(storage: &dyn Storage, entity: &E) -> Result<bool, ServiceError> {
    storage.delete(Some(&entity.clone().into())).await
}

pub async fn delete_object(storage: &dyn Storage, object: &Object) -> Result<bool, ServiceError> {
    storage.delete(Some(object)).await
}

/// Set one attribute from its textual form. The value takes the JSON type
/// of the current field (integer, float, list or string); a field the object
/// does not have yet is stored as a string. Identity and timestamps cannot be
/// set this way. The registry is not touched; call [`save_object`] after.
pub fn set_attribute(object: &mut Object, name: &str, raw: &str) -> Result<(), ServiceError> {
    if RESERVED.contains(&name) {
        return Err(ServiceError::Validation(format!("`{name}` cannot be updated")));
    }
    let mut record = object.to_record()?;
    let value = coerce(record.get(name), name, raw)?;
    record.insert(name.to_string(), value);
    *object = ClassRegistry::builtin().reconstruct(record)?;
    Ok(())
}

fn coerce(current: Option<&Value>, name: &str, raw: &str) -> Result<Value, ServiceError> {
    let invalid = |kind: &str| ServiceError::Validation(format!("`{name}` expects {kind}, got `{raw}`"));
    match current {
        Some(Value::Number(n)) if n.is_f64() => raw.trim().parse::<f64>().map(Value::from).map_err(|_| invalid("a number")),
        Some(Value::Number(_)) => raw.trim().parse::<u64>().map(Value::from).map_err(|_| invalid("an integer")),
        Some(Value::Array(_)) => match serde_json::from_str::<Value>(raw) {
            Ok(list @ Value::Array(_)) => Ok(list),
            _ => Err(invalid("a JSON list")),
        },
        _ => Ok(Value::String(raw.to_string())),
    }
}
