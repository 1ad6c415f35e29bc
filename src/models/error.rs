use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Failed to read config file '{path}': {cause}")]
    ConfigRead { path: PathBuf, cause: io::Error },

    #[error("Failed to parse config file '{path}': {cause}")]
    ConfigParse {
        path: PathBuf,
        cause: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Google Drive authentication failed: {0}")]
    Auth(String),

    #[error("Failed to get metadata for '{path}': {cause}")]
    Metadata { path: PathBuf, cause: io::Error },

    #[error("File modification time is invalid for '{path}': {cause}")]
    ModificationTime {
        path: PathBuf,
        cause: std::time::SystemTimeError,
    },

    #[error("Failed to read '{path}': {cause}")]
    FileRead { path: PathBuf, cause: io::Error },

    #[error("Failed to upload '{path}': {message}")]
    Upload { path: PathBuf, message: String },

    #[error("Invalid schedule: {0}")]
    Schedule(#[from] cron::error::Error),

    #[error("Filesystem watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, BackupError>;
