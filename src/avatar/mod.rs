//! Avatar image lifecycle.
//!
//! The application owns at most one avatar file. Its location is recorded in the
//! `avatar_path` preference. Installing a new avatar copies the source into the
//! avatar directory under a timestamped name (so image caches keyed by file name
//! never show a stale picture), points the preference at it, and only then deletes
//! the previous file. A failure before the preference update leaves the previous
//! avatar and preference untouched.

use crate::constants::{AVATAR_FILE_PREFIX, AVATAR_TIMESTAMP_FORMAT, DEFAULT_AVATAR_EXTENSION};
use crate::errors::{AppResult, AvatarError};
use crate::prefs::{PreferenceKey, PreferenceStore};
use chrono::Local;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Manages the single avatar file and its preference entry.
#[derive(Debug, Clone)]
pub struct AvatarManager {
    dir: PathBuf,
    prefs: PreferenceStore,
}

impl AvatarManager {
    /// Creates a manager storing avatars in `dir`. The directory is created on
    /// first use.
    pub fn new(dir: impl Into<PathBuf>, prefs: PreferenceStore) -> Self {
        AvatarManager {
            dir: dir.into(),
            prefs,
        }
    }

    /// Installs a copy of `source` as the avatar and returns the new path.
    ///
    /// # Errors
    ///
    /// - `AppError::CopyFailed` if the source cannot be read or the copy cannot be
    ///   written; nothing else changes.
    /// - `AppError::StorageUnavailable` if the preference cannot be updated; the new
    ///   copy is removed again and the previous avatar stays current.
    pub fn set_avatar(&self, source: &Path) -> AppResult<PathBuf> {
        info!("Setting avatar");
        debug!("Avatar source: {:?}", source);

        let bytes = fs::read(source).map_err(|e| AvatarError::SourceUnreadable {
            path: source.to_path_buf(),
            source: e,
        })?;

        let destination = self.next_file_name(source);
        let unwritable = |e: io::Error| AvatarError::DestinationUnwritable {
            path: destination.clone(),
            source: e,
        };

        fs::create_dir_all(&self.dir).map_err(unwritable)?;
        let mut temp = NamedTempFile::new_in(&self.dir).map_err(unwritable)?;
        temp.write_all(&bytes).map_err(unwritable)?;
        temp.as_file().sync_all().map_err(unwritable)?;
        temp.persist_noclobber(&destination)
            .map_err(|e| unwritable(e.error))?;
        debug!("Avatar copied to {:?}", destination);

        let previous = match self.prefs.avatar_path() {
            Ok(previous) => previous,
            Err(e) => {
                discard(&destination);
                return Err(e);
            }
        };
        if let Err(e) = self.prefs.set_avatar_path(&destination) {
            discard(&destination);
            return Err(e);
        }

        if let Some(old) = previous.filter(|old| *old != destination) {
            match fs::remove_file(&old) {
                Ok(()) => debug!("Removed previous avatar {:?}", old),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("Could not remove previous avatar {:?}: {}", old, e),
            }
        }

        info!("Avatar updated");
        Ok(destination)
    }

    /// Deletes the avatar file (a missing file is fine) and clears the preference.
    ///
    /// Calling this without an avatar set does nothing.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file exists but cannot be deleted, in which
    /// case the preference still points at it.
    pub fn remove_avatar(&self) -> AppResult<()> {
        let Some(current) = self.prefs.avatar_path()? else {
            debug!("No avatar set");
            return Ok(());
        };

        match fs::remove_file(&current) {
            Ok(()) => debug!("Removed avatar {:?}", current),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Avatar file already gone: {:?}", current)
            }
            Err(e) => return Err(e.into()),
        }

        self.prefs.remove(PreferenceKey::AvatarPath)?;
        info!("Avatar removed");
        Ok(())
    }

    /// The avatar path, only if the file still exists.
    ///
    /// A dangling preference is reported as `None` but left in place.
    pub fn current_avatar_path(&self) -> AppResult<Option<PathBuf>> {
        Ok(self.prefs.avatar_path()?.filter(|path| {
            let exists = path.is_file();
            if !exists {
                debug!("Avatar preference points at a missing file: {:?}", path);
            }
            exists
        }))
    }

    /// Timestamped destination name, with a counter on collision.
    fn next_file_name(&self, source: &Path) -> PathBuf {
        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .unwrap_or(DEFAULT_AVATAR_EXTENSION)
            .to_ascii_lowercase();
        let stamp = Local::now().format(AVATAR_TIMESTAMP_FORMAT).to_string();

        let mut candidate = self
            .dir
            .join(format!("{}{}.{}", AVATAR_FILE_PREFIX, stamp, extension));
        let mut counter = 1;
        while candidate.exists() {
            candidate = self.dir.join(format!(
                "{}{}_{}.{}",
                AVATAR_FILE_PREFIX, stamp, counter, extension
            ));
            counter += 1;
        }
        candidate
    }
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("Could not remove unused avatar copy {:?}: {}", path, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use tempfile::TempDir;

    fn manager(temp_dir: &TempDir) -> AvatarManager {
        let prefs = PreferenceStore::new(temp_dir.path().join("preferences.json"));
        AvatarManager::new(temp_dir.path().join("avatars"), prefs)
    }

    fn source_image(temp_dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = temp_dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    fn avatar_files(temp_dir: &TempDir) -> Vec<PathBuf> {
        match fs::read_dir(temp_dir.path().join("avatars")) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn test_set_avatar_copies_and_records_path() {
        let temp_dir = TempDir::new().unwrap();
        let avatars = manager(&temp_dir);
        let source = source_image(&temp_dir, "rex.JPG", b"jpeg bytes");

        let installed = avatars.set_avatar(&source).unwrap();

        assert_eq!(fs::read(&installed).unwrap(), b"jpeg bytes");
        assert!(source.exists(), "source must not be moved");
        let name = installed.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(AVATAR_FILE_PREFIX));
        assert!(name.ends_with(".jpg"));
        assert_eq!(avatars.current_avatar_path().unwrap(), Some(installed));
    }

    #[test]
    fn test_set_avatar_twice_leaves_one_file() {
        let temp_dir = TempDir::new().unwrap();
        let avatars = manager(&temp_dir);
        let first_source = source_image(&temp_dir, "one.png", b"first");
        let second_source = source_image(&temp_dir, "two.png", b"second");

        let first = avatars.set_avatar(&first_source).unwrap();
        let second = avatars.set_avatar(&second_source).unwrap();

        assert_ne!(first, second);
        assert!(!first.exists());
        assert_eq!(avatar_files(&temp_dir), vec![second.clone()]);
        assert_eq!(avatars.current_avatar_path().unwrap(), Some(second));
    }

    #[test]
    fn test_missing_source_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let avatars = manager(&temp_dir);
        let original = avatars
            .set_avatar(&source_image(&temp_dir, "one.png", b"first"))
            .unwrap();

        let result = avatars.set_avatar(&temp_dir.path().join("missing.png"));

        assert!(matches!(
            result,
            Err(AppError::CopyFailed(AvatarError::SourceUnreadable { .. }))
        ));
        assert!(original.exists());
        assert_eq!(avatars.current_avatar_path().unwrap(), Some(original.clone()));
        assert_eq!(avatar_files(&temp_dir), vec![original]);
    }

    #[test]
    fn test_default_extension() {
        let temp_dir = TempDir::new().unwrap();
        let avatars = manager(&temp_dir);

        let installed = avatars
            .set_avatar(&source_image(&temp_dir, "portrait", b"raw"))
            .unwrap();
        assert_eq!(installed.extension().unwrap(), "png");
    }

    #[test]
    fn test_remove_avatar() {
        let temp_dir = TempDir::new().unwrap();
        let avatars = manager(&temp_dir);
        let installed = avatars
            .set_avatar(&source_image(&temp_dir, "one.png", b"first"))
            .unwrap();

        avatars.remove_avatar().unwrap();

        assert!(!installed.exists());
        assert_eq!(avatars.current_avatar_path().unwrap(), None);
        assert!(avatar_files(&temp_dir).is_empty());
    }

    #[test]
    fn test_remove_avatar_without_avatar_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let avatars = manager(&temp_dir);

        avatars.remove_avatar().unwrap();
        avatars.remove_avatar().unwrap();
        assert_eq!(avatars.current_avatar_path().unwrap(), None);
    }

    #[test]
    fn test_remove_avatar_tolerates_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let avatars = manager(&temp_dir);
        let installed = avatars
            .set_avatar(&source_image(&temp_dir, "one.png", b"first"))
            .unwrap();
        fs::remove_file(&installed).unwrap();

        avatars.remove_avatar().unwrap();
        assert_eq!(avatars.prefs.avatar_path().unwrap(), None);
    }

    #[test]
    fn test_current_avatar_path_heals_without_mutating() {
        let temp_dir = TempDir::new().unwrap();
        let avatars = manager(&temp_dir);
        let installed = avatars
            .set_avatar(&source_image(&temp_dir, "one.png", b"first"))
            .unwrap();
        fs::remove_file(&installed).unwrap();

        assert_eq!(avatars.current_avatar_path().unwrap(), None);
        assert_eq!(avatars.prefs.avatar_path().unwrap(), Some(installed));
    }

    #[test]
    fn test_name_collision_gets_counter() {
        let temp_dir = TempDir::new().unwrap();
        let avatars = manager(&temp_dir);
        let source = source_image(&temp_dir, "one.png", b"first");

        fs::create_dir_all(temp_dir.path().join("avatars")).unwrap();
        let first = avatars.next_file_name(&source);
        fs::write(&first, b"taken").unwrap();
        let second = avatars.next_file_name(&source);

        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("_1.png"));
    }
}
