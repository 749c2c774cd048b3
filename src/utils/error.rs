// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error {0} for {1}")]
    Http(reqwest::StatusCode, String), // e.g., 404 Not Found on an archived image

    #[error("Invalid tutorial target: {0}")]
    InvalidUrl(String),

    #[error("I/O error while saving download: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Tutorial title gives an unusable directory name: '{0}'")]
    InvalidDirectoryName(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Site interaction failed: {0}")]
    Site(#[from] SiteError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
