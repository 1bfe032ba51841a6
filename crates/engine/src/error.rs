//! The module contains the errors the engine can throw.

use thiserror::Error;

/// Engine custom errors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid reward: {0}")]
    InvalidReward(String),
}
