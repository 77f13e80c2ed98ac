//! Crate-wide error type.
//!
//! Every fallible catalog, library and session operation returns
//! [`Result`], so callers can tell a missing record apart from a storage
//! failure or a rejected input. The runtime turns errors into one-line
//! notices using [`Error::severity`].

use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// The kind of record a [`Error::NotFound`] refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Entity {
    Track,
    Playlist,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Track => f.write_str("track"),
            Entity::Playlist => f.write_str("playlist"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// SQLite I/O or constraint failure.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing required field, out-of-range index or otherwise unusable input.
    #[error("{0}")]
    Validation(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    /// The audio output failed to load or play a file.
    #[error("audio device error: {0}")]
    Device(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// How loudly an error should be surfaced to the user.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn device(message: impl fmt::Display) -> Self {
        Self::Device(message.to_string())
    }

    pub fn track_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: Entity::Track,
            id,
        }
    }

    pub fn playlist_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: Entity::Playlist,
            id,
        }
    }

    /// Input problems are warnings; failures of storage, I/O or the device are errors.
    pub fn severity(&self) -> Severity {
        match self {
            Error::Validation(_) | Error::FileNotFound(_) | Error::NotFound { .. } => {
                Severity::Warning
            }
            Error::Storage(_) | Error::Io(_) | Error::Device(_) | Error::Config(_) => {
                Severity::Error
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
