use thiserror::Error;

use crate::auth::JwtError;
use crate::db::StorageError;
use crate::directory::DirectoryError;

/// Startup and runtime errors of the server process
///
/// Request-level failures are [`shared::error::AppError`]; these only stop
/// the process.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Seed error: {0}")]
    Seed(String),

    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias of server startup code
pub type Result<T> = std::result::Result<T, ServerError>;
