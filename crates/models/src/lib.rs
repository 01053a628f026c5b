//! Entity layer: the shared base type, the six concrete entities, the
//! `Object` enum the storage registry holds, and the static class table used
//! to rebuild typed objects from stored records.

pub mod errors;
pub mod timestamp;
pub mod base;
pub mod entity;
pub mod class;
pub mod object;
pub mod user;
pub mod state;
pub mod city;
pub mod amenity;
pub mod place;
pub mod review;
pub mod stored_object;
pub mod db;

pub use base::BaseModel;
pub use class::{ClassRegistry, Factory, ModelClass};
pub use entity::{composite_key, Entity, Record, CLASS_FIELD};
pub use errors::ModelError;
pub use object::Object;

pub use amenity::Amenity;
pub use city::City;
pub use place::Place;
pub use review::Review;
pub use state::State;
pub use user::User;
