//! Bundle error types.

use std::path::PathBuf;

/// Errors that can occur while assembling or reading a projector executable.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// File I/O error on one of the stub, movie, or output handles
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Movie does not fit the signed 32-bit length field
    #[error("movie is {len} bytes, the length field holds at most {max} bytes", max = i32::MAX)]
    BundleTooLarge { len: u64 },

    /// Unrecognized variant keyword
    #[error("unknown variant '{0}', expected 'windows' or 'linux'")]
    ParseVariant(String),
}

impl BundleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BundleError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BundleError>;
