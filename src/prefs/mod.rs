//! Durable key/value preferences.
//!
//! Preferences live in one small JSON document next to the entry store. The key
//! space is closed: icon style, sort direction and the avatar path. Reads always
//! go to disk and every write replaces the whole document atomically (temp file
//! in the same directory, fsync, rename), so a write is durable before it returns
//! and a crash never leaves a half-written document behind.

use crate::db::ordering::SortOrder;
use crate::errors::{AppError, AppResult, StorageError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;
use tracing::debug;

/// Glyph used to draw ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    #[default]
    Star,
    Bone,
}

impl IconStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconStyle::Star => "star",
            IconStyle::Bone => "bone",
        }
    }

    /// The glyph repeated once per rating point.
    pub fn glyph(&self) -> &'static str {
        match self {
            IconStyle::Star => "★",
            IconStyle::Bone => "🦴",
        }
    }
}

impl fmt::Display for IconStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IconStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "star" => Ok(IconStyle::Star),
            "bone" => Ok(IconStyle::Bone),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown icon style '{}': expected 'star' or 'bone'",
                other
            ))),
        }
    }
}

/// The closed set of preference keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKey {
    IconStyle,
    SortDirection,
    AvatarPath,
}

impl PreferenceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::IconStyle => "icon_style",
            PreferenceKey::SortDirection => "sort_direction",
            PreferenceKey::AvatarPath => "avatar_path",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "icon_style" => Ok(PreferenceKey::IconStyle),
            "sort_direction" => Ok(PreferenceKey::SortDirection),
            "avatar_path" => Ok(PreferenceKey::AvatarPath),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown preference '{}': expected icon_style, sort_direction or avatar_path",
                other
            ))),
        }
    }
}

/// On-disk document. Absent fields mean "use the default".
#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon_style: Option<IconStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sort_direction: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    avatar_path: Option<PathBuf>,
}

/// Handle to the preference document.
///
/// Holds only the path; cloning is cheap and every call reads or writes the file.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Creates a handle for the document at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PreferenceStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> AppResult<PreferenceDocument> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(PreferenceDocument::default())
            }
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_str(&raw).map_err(|source| {
            StorageError::MalformedPreferences {
                path: self.path.clone(),
                source,
            }
            .into()
        })
    }

    fn save(&self, document: &PreferenceDocument) -> AppResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let json = serde_json::to_vec_pretty(document).map_err(|source| {
            StorageError::MalformedPreferences {
                path: self.path.clone(),
                source,
            }
        })?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        temp.write_all(&json).map_err(|e| self.io_error(e))?;
        temp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        temp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        debug!("Preferences written to {:?}", self.path);
        Ok(())
    }

    fn update(&self, change: impl FnOnce(&mut PreferenceDocument)) -> AppResult<()> {
        let mut document = self.load()?;
        change(&mut document);
        self.save(&document)
    }

    fn io_error(&self, source: io::Error) -> AppError {
        StorageError::Preferences {
            path: self.path.clone(),
            source,
        }
        .into()
    }

    /// Current icon style, `star` when unset.
    pub fn icon_style(&self) -> AppResult<IconStyle> {
        Ok(self.load()?.icon_style.unwrap_or_default())
    }

    pub fn set_icon_style(&self, style: IconStyle) -> AppResult<()> {
        self.update(|doc| doc.icon_style = Some(style))
    }

    /// Current sort direction, `descending` when unset.
    pub fn sort_direction(&self) -> AppResult<SortOrder> {
        Ok(self.load()?.sort_direction.unwrap_or_default())
    }

    pub fn set_sort_direction(&self, order: SortOrder) -> AppResult<()> {
        self.update(|doc| doc.sort_direction = Some(order))
    }

    /// Stored avatar path, without checking that the file exists.
    pub fn avatar_path(&self) -> AppResult<Option<PathBuf>> {
        Ok(self.load()?.avatar_path)
    }

    pub fn set_avatar_path(&self, path: &Path) -> AppResult<()> {
        self.update(|doc| doc.avatar_path = Some(path.to_path_buf()))
    }

    /// Reads a preference as text, falling back to its default.
    ///
    /// `avatar_path` has no default and yields `None` when unset.
    pub fn get(&self, key: PreferenceKey) -> AppResult<Option<String>> {
        let document = self.load()?;
        Ok(match key {
            PreferenceKey::IconStyle => {
                Some(document.icon_style.unwrap_or_default().to_string())
            }
            PreferenceKey::SortDirection => {
                Some(document.sort_direction.unwrap_or_default().to_string())
            }
            PreferenceKey::AvatarPath => document
                .avatar_path
                .map(|p| p.to_string_lossy().into_owned()),
        })
    }

    /// Replaces a single preference, parsing `value` for the closed keys.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidArgument` when `value` is not allowed for `key`,
    /// in which case nothing is written.
    pub fn set(&self, key: PreferenceKey, value: &str) -> AppResult<()> {
        debug!("Setting preference {}", key);
        match key {
            PreferenceKey::IconStyle => self.set_icon_style(value.parse()?),
            PreferenceKey::SortDirection => self.set_sort_direction(value.parse()?),
            PreferenceKey::AvatarPath => {
                if value.is_empty() {
                    return Err(AppError::InvalidArgument(
                        "Avatar path must not be empty".to_string(),
                    ));
                }
                self.set_avatar_path(Path::new(value))
            }
        }
    }

    /// Resets a preference to its default.
    pub fn remove(&self, key: PreferenceKey) -> AppResult<()> {
        debug!("Removing preference {}", key);
        self.update(|doc| match key {
            PreferenceKey::IconStyle => doc.icon_style = None,
            PreferenceKey::SortDirection => doc.sort_direction = None,
            PreferenceKey::AvatarPath => doc.avatar_path = None,
        })
    }
}
