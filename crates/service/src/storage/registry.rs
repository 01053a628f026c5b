use std::collections::BTreeMap;

use models::class::discriminator;
use models::{composite_key, ClassRegistry, Object, Record};
use serde_json::Value;
use tracing::warn;

use crate::errors::ServiceError;

/// In-memory map from composite key to live object, plus the class table
/// used to rebuild stored records.
///
/// Ordered by key so enumeration and snapshots are deterministic.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    objects: BTreeMap<String, Object>,
    classes: ClassRegistry,
}

impl Registry {
    pub fn new(classes: ClassRegistry) -> Self {
        Self { objects: BTreeMap::new(), classes }
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn all(&self, class: Option<&str>) -> Result<BTreeMap<String, Object>, ServiceError> {
        if let Some(name) = class {
            if !self.classes.contains(name) {
                return Err(ServiceError::unknown_class(name));
            }
        }
        Ok(self
            .objects
            .iter()
            .filter(|(_, obj)| class.map_or(true, |name| obj.class().as_str() == name))
            .map(|(k, obj)| (k.clone(), obj.clone()))
            .collect())
    }

    pub fn get(&self, class: &str, id: &str) -> Result<Option<Object>, ServiceError> {
        if !self.classes.contains(class) {
            return Err(ServiceError::unknown_class(class));
        }
        Ok(self.objects.get(&composite_key(class, id)).cloned())
    }

    /// Insert under the object's own key; returns the replaced entry.
    pub fn insert(&mut self, object: Object) -> Option<Object> {
        self.objects.insert(object.key(), object)
    }

    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.objects.remove(key)
    }

    /// Key to record map of every entry.
    pub fn to_records(&self) -> Result<Record, ServiceError> {
        let mut records = Record::new();
        for (key, obj) in &self.objects {
            records.insert(key.clone(), Value::Object(obj.to_record()?));
        }
        Ok(records)
    }

    /// Rebuild stored entries without touching the registry. Records whose
    /// class is missing or unknown are skipped with a warning; any other bad
    /// record fails the whole batch.
    pub fn decode<I>(&self, stored: I) -> Result<Vec<(String, Object)>, ServiceError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut decoded = Vec::new();
        for (key, value) in stored {
            let record = match value {
                Value::Object(record) => record,
                other => {
                    return Err(ServiceError::MalformedRecord { key, reason: format!("expected object, found {other}") })
                }
            };
            let Some(factory) = discriminator(&record).and_then(|name| self.classes.resolve(name)) else {
                warn!(%key, class = ?discriminator(&record), "skipping record with unknown class");
                continue;
            };
            let object = factory(record).map_err(|e| ServiceError::MalformedRecord { key: key.clone(), reason: e.to_string() })?;
            decoded.push((key, object));
        }
        Ok(decoded)
    }

    /// Insert decoded entries under their stored keys.
    pub fn extend(&mut self, entries: Vec<(String, Object)>) -> usize {
        let n = entries.len();
        self.objects.extend(entries);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Entity, State, User};
    use serde_json::json;

    fn registry() -> Registry {
        Registry::new(ClassRegistry::builtin())
    }

    #[test]
    fn insert_overwrites_same_key() {
        let mut reg = registry();
        let mut first = User::default();
        first.first_name = "first".into();
        let mut second = first.clone();
        second.first_name = "second".into();

        assert!(reg.insert(first.into()).is_none());
        assert!(reg.insert(second.clone().into()).is_some());
        assert_eq!(reg.len(), 1);
        let stored = reg.get("User", second.id()).unwrap().unwrap();
        assert_eq!(stored.downcast::<User>().unwrap(), second);
    }

    #[test]
    fn all_filters_by_class_and_rejects_unknown() {
        let mut reg = registry();
        reg.insert(User::default().into());
        reg.insert(State::default().into());
        reg.insert(State::default().into());
        assert_eq!(reg.all(None).unwrap().len(), 3);
        assert_eq!(reg.all(Some("State")).unwrap().len(), 2);
        assert_eq!(reg.all(Some("Review")).unwrap().len(), 0);
        assert!(matches!(reg.all(Some("BaseModel")), Err(ServiceError::Validation(_))));
        assert!(reg.get("Nope", "x").is_err());
    }

    #[test]
    fn decode_skips_unknown_and_keeps_stored_key() {
        let reg = registry();
        let stored = vec![
            ("Ghost.1".to_string(), json!({"id": "1", "__class__": "Ghost"})),
            ("NoClass.2".to_string(), json!({"id": "2"})),
            (
                "State.legacy-key".to_string(),
                json!({
                    "id": "s-1",
                    "created_at": "2017-09-28T21:03:54.052298",
                    "updated_at": "2017-09-28T21:03:54.052298",
                    "name": "Ohio",
                    "__class__": "State"
                }),
            ),
        ];
        let decoded = reg.decode(stored).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].0, "State.legacy-key");
        assert_eq!(decoded[0].1.id(), "s-1");
    }

    #[test]
    fn decode_fails_on_malformed_record() {
        let reg = registry();
        let bad_shape = reg.decode(vec![("User.1".to_string(), json!([1, 2]))]);
        assert!(matches!(bad_shape, Err(ServiceError::MalformedRecord { .. })));
        let bad_time = reg.decode(vec![(
            "User.1".to_string(),
            json!({"id": "1", "created_at": "nope", "updated_at": "nope", "__class__": "User"}),
        )]);
        assert!(matches!(bad_time, Err(ServiceError::MalformedRecord { key, .. }) if key == "User.1"));
    }
}
