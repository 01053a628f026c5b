use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::entity::{Entity, Record, CLASS_FIELD};
use crate::errors::ModelError;
use crate::object::Object;
use crate::{Amenity, City, Place, Review, State, User};

/// Names of the concrete entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelClass {
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl ModelClass {
    pub const ALL: [ModelClass; 6] = [
        ModelClass::User,
        ModelClass::State,
        ModelClass::City,
        ModelClass::Amenity,
        ModelClass::Place,
        ModelClass::Review,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelClass::User => "User",
            ModelClass::State => "State",
            ModelClass::City => "City",
            ModelClass::Amenity => "Amenity",
            ModelClass::Place => "Place",
            ModelClass::Review => "Review",
        }
    }

    /// A fresh, unregistered instance of this class.
    pub fn fresh(self) -> Object {
        match self {
            ModelClass::User => User::default().into(),
            ModelClass::State => State::default().into(),
            ModelClass::City => City::default().into(),
            ModelClass::Amenity => Amenity::default().into(),
            ModelClass::Place => Place::default().into(),
            ModelClass::Review => Review::default().into(),
        }
    }
}

impl fmt::Display for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelClass {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelClass::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ModelError::UnknownClass(s.to_string()))
    }
}

/// Builds a typed object from a stored record.
pub type Factory = fn(Record) -> Result<Object, ModelError>;

fn build<E: Entity>(record: Record) -> Result<Object, ModelError> {
    E::from_record(record).map(Into::into)
}

/// Static table from class name to factory, consulted when reloading stored
/// records. Built once at startup; the base type is never registered.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    factories: BTreeMap<&'static str, Factory>,
}

impl ClassRegistry {
    pub fn builtin() -> Self {
        let mut factories: BTreeMap<&'static str, Factory> = BTreeMap::new();
        factories.insert(ModelClass::User.as_str(), build::<User>);
        factories.insert(ModelClass::State.as_str(), build::<State>);
        factories.insert(ModelClass::City.as_str(), build::<City>);
        factories.insert(ModelClass::Amenity.as_str(), build::<Amenity>);
        factories.insert(ModelClass::Place.as_str(), build::<Place>);
        factories.insert(ModelClass::Review.as_str(), build::<Review>);
        Self { factories }
    }

    pub fn resolve(&self, name: &str) -> Option<Factory> {
        self.factories.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Resolve the record's discriminator and build the object.
    pub fn reconstruct(&self, record: Record) -> Result<Object, ModelError> {
        let name = discriminator(&record)
            .ok_or_else(|| ModelError::UnknownClass(format!("record without {CLASS_FIELD}")))?
            .to_string();
        let factory = self.resolve(&name).ok_or(ModelError::UnknownClass(name))?;
        factory(record)
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The `__class__` value of a record, if it is a string.
pub fn discriminator(record: &Record) -> Option<&str> {
    record.get(CLASS_FIELD).and_then(|v| v.as_str())
}
