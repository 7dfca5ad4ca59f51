use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Task not found: {0}")]
    NotFound(Uuid),

    #[error("Failed to read store data: {0}")]
    ReadError(std::io::Error),
    #[error("Failed to parse store data: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Failed to create store directory: {0}")]
    CreateDirError(std::io::Error),
    #[error("Failed to write store data: {0}")]
    WriteError(std::io::Error),
    #[error("Failed to delete store data: {0}")]
    DeleteError(std::io::Error),
}
