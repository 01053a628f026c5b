use service::ServiceError;
use thiserror::Error;

/// Console failures; the display form is what the user sees.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("** class name missing **")]
    ClassNameMissing,
    #[error("** class doesn't exist **")]
    ClassUnknown,
    #[error("** instance id missing **")]
    IdMissing,
    #[error("** no instance found **")]
    NoInstance,
    #[error("** attribute name missing **")]
    AttributeMissing,
    #[error("** value missing **")]
    ValueMissing,
    #[error("*** Unknown syntax: {0}")]
    UnknownSyntax(String),
    #[error("** {0} **")]
    Service(#[from] ServiceError),
}
