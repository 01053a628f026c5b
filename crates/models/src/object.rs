use std::fmt;

use crate::base::BaseModel;
use crate::class::ModelClass;
use crate::entity::{composite_key, Entity, Record, CLASS_FIELD};
use crate::errors::ModelError;
use crate::{Amenity, City, Place, Review, State, User};

macro_rules! objects {
    ($($name:ident),+ $(,)?) => {
        /// A live instance of any entity class, as held by the registry.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Object {
            $($name($name),)+
        }

        impl Object {
            pub fn class(&self) -> ModelClass {
                match self {
                    $(Object::$name(_) => ModelClass::$name,)+
                }
            }

            pub fn base(&self) -> &BaseModel {
                match self {
                    $(Object::$name(e) => &e.base,)+
                }
            }

            pub fn base_mut(&mut self) -> &mut BaseModel {
                match self {
                    $(Object::$name(e) => &mut e.base,)+
                }
            }

            pub fn to_record(&self) -> Result<Record, ModelError> {
                match self {
                    $(Object::$name(e) => e.to_record(),)+
                }
            }
        }

        $(
            impl From<$name> for Object {
                fn from(entity: $name) -> Self {
                    Object::$name(entity)
                }
            }

            impl Entity for $name {
                const CLASS: ModelClass = ModelClass::$name;

                fn base(&self) -> &BaseModel {
                    &self.base
                }

                fn base_mut(&mut self) -> &mut BaseModel {
                    &mut self.base
                }

                fn from_object(object: Object) -> Option<Self> {
                    match object {
                        Object::$name(e) => Some(e),
                        _ => None,
                    }
                }

                fn from_object_ref(object: &Object) -> Option<&Self> {
                    match object {
                        Object::$name(e) => Some(e),
                        _ => None,
                    }
                }
            }
        )+
    };
}

objects!(User, State, City, Amenity, Place, Review);

impl Object {
    pub fn id(&self) -> &str {
        self.base().id()
    }

    pub fn key(&self) -> String {
        composite_key(self.class().as_str(), self.id())
    }

    /// Downcast to a concrete entity.
    pub fn downcast<E: Entity>(self) -> Option<E> {
        E::from_object(self)
    }

    pub fn downcast_ref<E: Entity>(&self) -> Option<&E> {
        E::from_object_ref(self)
    }
}

/// `[<Class>] (<id>) {<fields>}`
impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = self.to_record().map_err(|_| fmt::Error)?;
        fields.remove(CLASS_FIELD);
        let body = serde_json::to_string(&fields).map_err(|_| fmt::Error)?;
        write!(f, "[{}] ({}) {}", self.class(), self.id(), body)
    }
}
