//! Configuration management for the pawprint application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. All persistent state (entry store, preferences,
//! avatar image) lives below a single data directory.
//!
//! # Environment Variables
//!
//! - `PAWPRINT_DIR`: Path to the data directory (defaults to ~/.local/share/pawprint)
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{
    AVATAR_DIR_NAME, DB_FILE_NAME, DEFAULT_DATA_SUBDIR, ENV_VAR_HOME, ENV_VAR_PAWPRINT_DIR,
    PREFERENCES_FILE_NAME, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for the pawprint application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use pawprint::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/path/to/data"),
/// };
/// assert_eq!(config.db_path(), PathBuf::from("/path/to/data/diary.db"));
/// ```
pub struct Config {
    /// Directory holding the entry store, preferences and avatar.
    ///
    /// This is loaded from the PAWPRINT_DIR environment variable with a fallback
    /// to ~/.local/share/pawprint if not specified.
    pub data_dir: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &REDACTED_PLACEHOLDER)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The data directory path is expanded using `shellexpand` to handle `~` and
    /// environment variable references.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if path expansion fails or the result is empty.
    pub fn load() -> AppResult<Self> {
        let data_dir_str = env::var(ENV_VAR_PAWPRINT_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });

        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;

        let data_dir = PathBuf::from(expanded_path.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        Ok(Config { data_dir })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the data directory is empty or relative.
    ///
    /// # Examples
    ///
    /// ```
    /// use pawprint::Config;
    /// use std::path::PathBuf;
    ///
    /// let valid = Config { data_dir: PathBuf::from("/absolute/path") };
    /// assert!(valid.validate().is_ok());
    ///
    /// let relative = Config { data_dir: PathBuf::from("relative/path") };
    /// assert!(relative.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        Ok(())
    }

    /// Path of the SQLite entry store.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    /// Path of the preference document.
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE_NAME)
    }

    /// Directory holding the avatar image.
    pub fn avatar_dir(&self) -> PathBuf {
        self.data_dir.join(AVATAR_DIR_NAME)
    }
}

/// Ensures the data directory exists, creating it if necessary.
///
/// Newly created directories get owner-only permissions on unix.
///
/// # Errors
///
/// Returns `AppError::Config` for a relative path and `AppError::Io` if creation fails.
pub fn ensure_data_dir(data_dir: &Path) -> AppResult<()> {
    if !data_dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Data directory path must be absolute: {}",
            data_dir.display()
        )));
    }

    if !data_dir.exists() {
        fs::create_dir_all(data_dir).map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create data directory: {}", e),
            ))
        })?;

        #[cfg(unix)]
        {
            use crate::constants::DEFAULT_DIR_PERMISSIONS;
            use std::os::unix::fs::PermissionsExt;

            fs::set_permissions(data_dir, fs::Permissions::from_mode(DEFAULT_DIR_PERMISSIONS))?;
            debug!("Set 0o700 permissions on data directory");
        }
    }
    Ok(())
}
