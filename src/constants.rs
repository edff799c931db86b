//! Constants used throughout the application.
//!
//! This module contains all constants used in the pawprint application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "pawprint";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A diary for your pet: dated ratings and events";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the data directory.
pub const ENV_VAR_PAWPRINT_DIR: &str = "PAWPRINT_DIR";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory for application data within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".local/share/pawprint";
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// File System Layout
/// File name of the SQLite entry store inside the data directory.
pub const DB_FILE_NAME: &str = "diary.db";
/// File name of the preference document inside the data directory.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";
/// Sub-directory holding the avatar image.
pub const AVATAR_DIR_NAME: &str = "avatars";
/// Prefix of generated avatar file names.
pub const AVATAR_FILE_PREFIX: &str = "avatar_";
/// Extension used when the source image has none.
pub const DEFAULT_AVATAR_EXTENSION: &str = "png";
/// Timestamp embedded in avatar file names (millisecond resolution).
pub const AVATAR_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// First 16 bytes of every SQLite database file.
pub const SQLITE_HEADER: &[u8; 16] = b"SQLite format 3\0";

// Entry Model
/// Stored date format (`dd.mm.yyyy`).
pub const ENTRY_DATE_FORMAT: &str = "%d.%m.%Y";
/// Stored time format (`HH:MM`).
pub const ENTRY_TIME_FORMAT: &str = "%H:%M";
/// Format of the `created_at` column.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
/// Highest rating; 0 means "no rating set".
pub const MAX_RATING: u8 = 5;
/// Most events a writer may attach to one entry.
pub const MAX_EVENTS: usize = 5;

// Database
/// Upper bound on pooled connections. The application has a single writer.
pub const DB_POOL_MAX_SIZE: u32 = 2;
/// How long a connection waits on a locked database before failing.
pub const DB_BUSY_TIMEOUT_MS: u64 = 5_000;

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "pawprint";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
