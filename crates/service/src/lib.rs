//! Storage layer for hbnb objects.
//! - `storage`: the registry engines (JSON file and relational).
//! - `persistence`: entity lifecycle on top of an engine (create, save, delete).
//! - `bootstrap`: builds and reloads the configured engine at process start.

pub mod errors;
pub mod storage;
pub mod persistence;
pub mod bootstrap;

pub use errors::ServiceError;
pub use storage::{DbStorage, FileStorage, Storage};
