//! Error handling utilities for the pawprint application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Deleting something that does not exist is never an error here: entry deletes
//! and avatar lookups report an absent result instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents failures of the backing storage medium.
///
/// Every variant maps to the `StorageUnavailable` class: the operation that hit it
/// was not applied, and nothing was retried.
///
/// # Examples
///
/// ```
/// use pawprint::errors::StorageError;
/// use std::io::{self, ErrorKind};
/// use std::path::PathBuf;
///
/// let error = StorageError::Preferences {
///     path: PathBuf::from("/data/preferences.json"),
///     source: io::Error::new(ErrorKind::PermissionDenied, "permission denied"),
/// };
/// assert!(format!("{}", error).contains("preferences.json"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite database error.
    #[error("Database error: {0}\n\nIf you're seeing 'file is not a database', the store file may be corrupted or was replaced by an incompatible file.")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate the data directory is not accessible.")]
    Pool(#[from] r2d2::Error),

    /// The preference document could not be read or written.
    #[error("Failed to access preferences at {path}: {source}")]
    Preferences {
        /// Path to the preference document
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The preference document exists but is not valid JSON for our schema.
    #[error("Preferences at {path} are malformed: {source}")]
    MalformedPreferences {
        /// Path to the preference document
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// A stored entry's events column is not a JSON array of strings.
    #[error("Events of entry {id} could not be decoded: {source}")]
    MalformedEvents {
        /// Id of the affected entry
        id: i64,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },
}

/// Represents failures while installing a new avatar image.
///
/// # Examples
///
/// ```
/// use pawprint::errors::AvatarError;
/// use std::io::{self, ErrorKind};
/// use std::path::PathBuf;
///
/// let error = AvatarError::SourceUnreadable {
///     path: PathBuf::from("/photos/rex.png"),
///     source: io::Error::new(ErrorKind::NotFound, "file not found"),
/// };
/// assert!(format!("{}", error).contains("Cannot read"));
/// assert!(format!("{}", error).contains("rex.png"));
/// ```
#[derive(Debug, Error)]
pub enum AvatarError {
    /// The chosen source image could not be opened or read.
    #[error("Cannot read avatar source {path}: {source}")]
    SourceUnreadable {
        /// The user-chosen source file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The copy could not be written into application storage.
    #[error("Cannot write avatar to {path}: {source}. Please check free disk space and permissions on the data directory.")]
    DestinationUnwritable {
        /// The destination inside the avatar directory
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents all possible errors that can occur in the pawprint application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use pawprint::errors::AppError;
///
/// let error = AppError::Config("Missing data directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing data directory");
/// ```
///
/// Converting from an IO error:
/// ```
/// use pawprint::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    ///
    /// This variant automatically converts from `std::io::Error` through the `From` trait.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing medium could not be opened, read, or written.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    /// Installing an avatar failed; no preference was changed and no file was deleted.
    #[error("Avatar copy failed: {0}")]
    CopyFailed(#[from] AvatarError),

    /// A caller passed a value the operation refuses to act on.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::StorageUnavailable(StorageError::Sqlite(err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::StorageUnavailable(StorageError::Pool(err))
    }
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use pawprint::errors::{AppResult, AppError};
///
/// fn might_fail(keyword: &str) -> AppResult<String> {
///     if keyword.is_empty() {
///         return Err(AppError::InvalidArgument("keyword is empty".to_string()));
///     }
///     Ok(keyword.to_string())
/// }
/// assert!(might_fail("").is_err());
/// ```
pub type AppResult<T> = Result<T, AppError>;
