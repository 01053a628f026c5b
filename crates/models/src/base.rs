use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::Record;
use crate::timestamp;

/// Identity and timestamps shared by every entity.
///
/// Flattened into each concrete entity, so its fields sit at the top level
/// of a stored record. Fields a record carries that no entity declares are
/// kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseModel {
    id: String,
    #[serde(with = "timestamp")]
    created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    updated_at: NaiveDateTime,
    #[serde(flatten)]
    extra: Record,
}

impl BaseModel {
    /// Fresh identity: random UUID v4 and both timestamps set to now.
    pub fn new() -> Self {
        let now = timestamp::now();
        Self { id: Uuid::new_v4().to_string(), created_at: now, updated_at: now, extra: Record::new() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    /// Fields from a stored record that no entity declares.
    pub fn extra(&self) -> &Record {
        &self.extra
    }

    /// Move `updated_at` forward to now. When the clock has not passed the
    /// previous value it is bumped by one microsecond, so successive saves
    /// always observe a strictly larger value.
    pub fn touch(&mut self) {
        let now = timestamp::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

/// Same as [`BaseModel::new`]: a default entity is a fresh one.
impl Default for BaseModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_models_have_distinct_ids() {
        let a = BaseModel::new();
        let b = BaseModel::new();
        assert_ne!(a.id(), b.id());
        assert!(Uuid::parse_str(a.id()).is_ok());
        assert_eq!(a.created_at(), a.updated_at());
    }

    #[test]
    fn touch_strictly_increases_updated_at() {
        let mut m = BaseModel::new();
        let created = m.created_at();
        let mut last = m.updated_at();
        for _ in 0..50 {
            m.touch();
            assert!(m.updated_at() > last);
            last = m.updated_at();
        }
        assert_eq!(m.created_at(), created);
    }
}
