use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::base::BaseModel;
use crate::class::ModelClass;
use crate::errors::ModelError;
use crate::object::Object;

/// Untyped serialized form of an entity: field name to JSON value.
pub type Record = serde_json::Map<String, Value>;

/// Type discriminator injected into every record.
pub const CLASS_FIELD: &str = "__class__";

/// Registry key of an object: `"<ClassName>.<id>"`.
pub fn composite_key(class: &str, id: &str) -> String {
    format!("{class}.{id}")
}

/// A concrete entity type.
///
/// `Default` builds a fresh instance (new id, current timestamps) without
/// registering it anywhere; registration is the storage layer's job.
pub trait Entity: Clone + Default + Serialize + DeserializeOwned + Into<Object> {
    const CLASS: ModelClass;

    fn base(&self) -> &BaseModel;
    fn base_mut(&mut self) -> &mut BaseModel;

    /// Unwrap an [`Object`] holding this type.
    fn from_object(object: Object) -> Option<Self>;
    fn from_object_ref(object: &Object) -> Option<&Self>;

    fn id(&self) -> &str {
        self.base().id()
    }

    fn key(&self) -> String {
        composite_key(Self::CLASS.as_str(), self.id())
    }

    /// All fields plus the `__class__` discriminator.
    fn to_record(&self) -> Result<Record, ModelError> {
        encode(self, Self::CLASS)
    }

    /// Rebuild an instance from a stored record. The discriminator is
    /// dropped, timestamps are parsed, unknown fields are kept.
    fn from_record(record: Record) -> Result<Self, ModelError> {
        decode(record)
    }
}

pub(crate) fn encode<T: Serialize>(value: &T, class: ModelClass) -> Result<Record, ModelError> {
    match serde_json::to_value(value)? {
        Value::Object(mut record) => {
            record.insert(CLASS_FIELD.to_string(), Value::String(class.as_str().to_string()));
            Ok(record)
        }
        other => Err(ModelError::Validation(format!("{class} serialized to non-object {other}"))),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(mut record: Record) -> Result<T, ModelError> {
    record.remove(CLASS_FIELD);
    Ok(serde_json::from_value(Value::Object(record))?)
}
