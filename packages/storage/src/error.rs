use std::fmt;

/// Errors that can occur while talking to a photo store.
#[derive(Debug)]
pub enum StorageError {
    /// An I/O error occurred.
    Io(std::io::Error),
    /// The remote service could not be reached or returned an unreadable body.
    Transport(String),
    /// The remote service answered with an error status.
    Rejected { status: u16, message: String },
    /// The public id is not one this store could have produced.
    InvalidPublicId(String),
    /// The upload exceeds the configured size limit.
    SizeLimitExceeded { actual: u64, limit: u64 },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage IO error: {err}"),
            Self::Transport(msg) => write!(f, "storage transport error: {msg}"),
            Self::Rejected { status, message } => {
                write!(f, "storage service rejected request ({status}): {message}")
            }
            Self::InvalidPublicId(id) => write!(f, "invalid public id: {id}"),
            Self::SizeLimitExceeded { actual, limit } => {
                write!(f, "upload exceeds size limit ({actual} > {limit} bytes)")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
