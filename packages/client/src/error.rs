//! Client error types.

use thiserror::Error;

/// Errors surfaced to the CLI user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("failed to connect to server: {0}")]
    ConnectionError(String),
    #[error("connection lost")]
    ConnectionLost,
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}
