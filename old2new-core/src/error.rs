use thiserror::Error;

use crate::format::Format;

/// Every way a conversion run can fail.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to parse input as {format}: {message}")]
    Parse { format: Format, message: String },

    #[error("{0}")]
    Capability(String),

    #[error("{0}")]
    Schema(String),

    #[error("Failed to render output as {format}: {message}")]
    Serialize { format: Format, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Parse { .. } | Error::Capability(_) | Error::Schema(_) => 2,
            Error::Serialize { .. } | Error::Io(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
