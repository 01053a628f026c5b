//! Relational row for the database-backed storage engine: one row per
//! registry entry, the full record kept as JSON in `payload`.

use sea_orm::{entity::prelude::*, Set};
use serde_json::Value;

use crate::entity::Record;
use crate::errors::ModelError;
use crate::object::Object;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stored_object")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub class: String,
    pub object_id: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub payload: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Row for a registry entry. `key` is the registry key, which after a
/// reload may differ from the one derived from the object.
pub fn to_active_model(key: &str, object: &Object) -> Result<ActiveModel, ModelError> {
    let record = object.to_record()?;
    Ok(ActiveModel {
        key: Set(key.to_string()),
        class: Set(object.class().as_str().to_string()),
        object_id: Set(object.id().to_string()),
        created_at: Set(object.base().created_at()),
        updated_at: Set(object.base().updated_at()),
        payload: Set(Value::Object(record)),
    })
}

impl Model {
    /// The stored record; rows whose payload is not a JSON object are rejected.
    pub fn into_record(self) -> Result<Record, ModelError> {
        match self.payload {
            Value::Object(record) => Ok(record),
            other => Err(ModelError::Validation(format!("row {} holds non-object payload {other}", self.key))),
        }
    }
}
