use std::fmt;
use std::io;
use std::path::PathBuf;
use std::result;

use thiserror::Error as DeriveError;

/// An opaque type that represents a SQLite error.
///
/// This type implements [`Debug`] and [`Display`], but not [`std::error::Error`]. Rather than try
/// to use this as an error type, you should use [`Error::Sqlite`].
///
/// [`Debug`]: fmt::Debug
/// [`Display`]: fmt::Display
/// [`Error::Sqlite`]: crate::Error::Sqlite
#[derive(Debug)]
pub struct SqliteError {
    inner: rusqlite::Error,
}

impl fmt::Display for SqliteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

/// The error type for sqlarbox.
///
/// This type can be converted [`From`] an [`std::io::Error`]. If the value the [`std::io::Error`]
/// wraps can be downcast into an [`Error`], it will be. Otherwise, it will be converted into
/// [`Error::Io`].
///
/// [`Error`]: crate::Error
/// [`Error::Io`]: crate::Error::Io
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Some arguments were invalid.
    #[error("Some arguments were invalid: {reason}")]
    InvalidArgs {
        /// Why the arguments were invalid.
        reason: String,
    },

    /// There is no archive at the given path, or the database has no `sqlar` table.
    #[error("There is no archive at this path: {path}")]
    ArchiveNotFound {
        /// The path of the missing archive.
        path: PathBuf,
    },

    /// A stored payload could not be decompressed back to its recorded size.
    #[error("The data for this entry is corrupt and cannot be restored: {name}")]
    CorruptEntry {
        /// The name of the corrupt entry.
        name: String,
    },

    /// Attempted to read a compressed entry, but the `deflate` Cargo feature was disabled.
    #[error("Attempted to read a compressed entry, but the `deflate` Cargo feature was disabled.")]
    CompressionNotSupported,

    /// Attempted to write to a read-only archive.
    #[error("Attempted to write to a read-only archive.")]
    ReadOnly,

    /// There was an error with the underlying SQLite database.
    #[error("There was an error with the underlying SQLite database.\n{0}")]
    Sqlite(SqliteError),

    /// An I/O error occurred.
    #[error("{0}")]
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        let kind = error.kind();
        match error.into_inner() {
            Some(payload) => match payload.downcast::<Error>() {
                Ok(crate_error) => *crate_error,
                Err(other_error) => Error::Io(io::Error::new(kind, other_error)),
            },
            None => Error::Io(io::Error::from(kind)),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        // Don't use a default match arm here. We want to be explicit about how we're mapping
        // `Error` variants to `io::ErrorKind` variants and make sure we remember to update this
        // when we add new ones.
        let kind = match err {
            Error::InvalidArgs { .. } => io::ErrorKind::InvalidInput,
            Error::ArchiveNotFound { .. } => io::ErrorKind::NotFound,
            Error::CorruptEntry { .. } => io::ErrorKind::InvalidData,
            Error::CompressionNotSupported => io::ErrorKind::InvalidInput,
            Error::ReadOnly => io::ErrorKind::Other,
            Error::Sqlite(_) => io::ErrorKind::Other,
            Error::Io(err) => return err,
        };

        io::Error::new(kind, err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ReadOnly) => Self::ReadOnly,
            _ => Self::Sqlite(SqliteError { inner: err }),
        }
    }
}

/// The result type for sqlarbox.
pub type Result<T> = result::Result<T, Error>;
