use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Permission denied: {}", .0.display())]
    Access(PathBuf),

    #[error("Invalid or corrupted PDF: {0}")]
    Format(String),

    #[error("PDF is password-protected and cannot be read")]
    Encrypted,

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub(crate) fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::Access(path),
            _ => Self::Io { path, source: err },
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
