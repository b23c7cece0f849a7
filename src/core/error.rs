//! Error type shared by the fen core.
//!
//! None of these are fatal: every variant ends up as a status message.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot list '{}'", .path.display())]
    ListingUnavailable { path: PathBuf },

    #[error("Can't rename to an existing file: '{}'", .0.display())]
    RenameCollision(PathBuf),

    #[error("Can't create an existing file: '{}'", .0.display())]
    CreateCollision(PathBuf),

    #[error("'{}' already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("{op} failed for '{}': {source}", .path.display())]
    OperationFailed {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Can't {0} in no-write mode")]
    NoWriteMode(&'static str),

    #[error("Invalid name: '{0}'")]
    InvalidName(String),

    #[error("File operations are shut down")]
    EngineClosed,
}

impl Error {
    pub(crate) fn op(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::OperationFailed {
            op,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
