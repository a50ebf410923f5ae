//! Error types for opscope-core.

use thiserror::Error;

/// Core error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Architecture name not recognized.
    #[error("unknown architecture: {0}")]
    UnknownArchitecture(String),

    /// Instruction group name not recognized.
    #[error("unknown instruction group: {0}")]
    UnknownGroup(String),
}
