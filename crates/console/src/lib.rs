//! Line-oriented command interpreter over a storage engine.

pub mod command;
pub mod errors;
pub mod shell;
pub mod startup;

pub use shell::{Console, Reply};
pub use startup::run;
