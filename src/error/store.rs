use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum StoreError {
    /// The backing file could not be opened, read or written.
    #[error("contact store {} is unavailable: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing file was readable but its content is not a contact table.
    #[error("contact store {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("no contact with id {0}")]
    NotFound(i64),

    /// The blocking task running the file operation was cancelled or panicked.
    #[error("contact store task failed: {0}")]
    Task(String),
}

impl StoreError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Unavailable {
            path: path.into(),
            source,
        }
    }

    /// Split a `csv::Error` into an I/O failure or a content failure.
    pub(crate) fn from_csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => StoreError::Unavailable {
                path: path.into(),
                source,
            },
            _ => StoreError::Corrupt {
                path: path.into(),
                reason,
            },
        }
    }
}
