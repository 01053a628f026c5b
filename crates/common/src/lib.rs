//! Ambient helpers shared by the hbnb crates: logging setup and
//! startup environment checks.

pub mod utils;
pub mod env;
