/// Error taxonomy for the core crate.
///
/// Every variant is terminal for the operation that produced it. Callers
/// never receive a partial result alongside an error.
use std::path::PathBuf;

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The scan root could not be listed.
    #[error("cannot read directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log could not be opened for appending, or the write failed.
    #[error("cannot open {path} for appending: {source}")]
    LogUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log does not exist or cannot be opened for reading.
    #[error("log {path} not found: {source}")]
    LogNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log was opened but reading it failed part-way.
    #[error("failed reading log {path}: {source}")]
    LogUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A move, copy or folder creation failed while sorting.
    #[error("sorting {path} failed: {source}")]
    SortFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `undo` was requested but no journal exists in the directory.
    #[error("no sort journal in {0}; nothing to undo")]
    NothingToUndo(PathBuf),

    /// The sort journal could not be written or parsed.
    #[error("sort journal {path}: {source}")]
    Journal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report could not be written.
    #[error("cannot write report {path}: {message}")]
    Report { path: PathBuf, message: String },
}
