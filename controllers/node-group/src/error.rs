//! Controller-specific error types.
//!
//! Remote failures are carried unmodified inside `Classifier`; the other
//! variants cover problems found before any remote call is made.

use classifier_client::ClassifierError;
use thiserror::Error;

/// Errors that can occur while running the node group step.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Classifier API error
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Step file could not be parsed
    #[error("Invalid step file: {0}")]
    StepFile(String),

    /// Reading a file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
