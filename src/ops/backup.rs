//! Export and import of the entry store file.
//!
//! Export is a byte-identical copy of the store to a user-chosen destination.
//! Import copies a user-chosen file over the store. A running process keeps its
//! connections to the old file, so after an import the application must be
//! restarted before the restored entries are visible.

use crate::constants::SQLITE_HEADER;
use crate::errors::{AppError, AppResult};
use blake3::Hasher;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Report of a completed export.
#[derive(Debug, Clone)]
pub struct BackupReport {
    /// Where the copy was written
    pub path: PathBuf,
    /// Size of the copy in bytes
    pub bytes: u64,
    /// BLAKE3 checksum of the copy
    pub checksum: String,
    /// Duration taken to create the copy
    pub duration: Duration,
}

/// Report of a completed import.
#[derive(Debug, Clone)]
pub struct RestoreReport {
    /// Size of the restored store in bytes
    pub bytes: u64,
    /// BLAKE3 checksum of the restored store
    pub checksum: String,
    /// Open handles still point at the replaced file; always `true`.
    pub restart_required: bool,
}

fn checksum_file(path: &Path) -> AppResult<String> {
    let mut hasher = Hasher::new();
    hasher.update_reader(File::open(path)?)?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// Copies the store file at `db_path` to `destination`.
///
/// Parent directories of `destination` are created as needed and an existing
/// file there is overwritten.
///
/// # Errors
///
/// Returns `AppError::Io` if the store is missing or the copy fails.
pub fn export_store(db_path: &Path, destination: &Path) -> AppResult<BackupReport> {
    let start_time = Instant::now();
    info!("Exporting store to {:?}", destination);

    if !db_path.is_file() {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Database not found: {:?}", db_path),
        )));
    }

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let bytes = fs::copy(db_path, destination)?;
    let checksum = checksum_file(destination)?;
    debug!("Exported {} bytes, checksum {}", bytes, checksum);

    Ok(BackupReport {
        path: destination.to_path_buf(),
        bytes,
        checksum,
        duration: start_time.elapsed(),
    })
}

/// Recomputes the checksum of an exported file and compares it.
///
/// Returns `Ok(false)` on mismatch.
pub fn verify_export(path: &Path, expected_checksum: &str) -> AppResult<bool> {
    let actual = checksum_file(path)?;
    let matches = actual == expected_checksum;
    if !matches {
        debug!("Checksum mismatch for {:?}: {}", path, actual);
    }
    Ok(matches)
}

/// Replaces the store file at `db_path` with a copy of `source`.
///
/// The source must look like a SQLite database. The copy is staged next to the
/// store and renamed into place, so the store is either fully replaced or left
/// as it was.
///
/// # Errors
///
/// - `AppError::InvalidArgument` if `source` is not a SQLite file
/// - `AppError::Io` if reading the source or replacing the store fails
pub fn import_store(source: &Path, db_path: &Path) -> AppResult<RestoreReport> {
    info!("Importing store from {:?}", source);

    let mut header = [0u8; 16];
    let mut file = File::open(source)?;
    if file.read_exact(&mut header).is_err() || &header != SQLITE_HEADER {
        return Err(AppError::InvalidArgument(format!(
            "{} is not a diary store (missing SQLite header)",
            source.display()
        )));
    }
    drop(file);

    let dir = db_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)?;
    let bytes = io::copy(&mut File::open(source)?, staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    staged.persist(db_path).map_err(|e| AppError::Io(e.error))?;

    let checksum = checksum_file(db_path)?;
    info!("Store replaced; restart required to load it");

    Ok(RestoreReport {
        bytes,
        checksum,
        restart_required: true,
    })
}
