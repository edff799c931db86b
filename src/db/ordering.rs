//! Chronological ordering over `dd.mm.yyyy` dates.
//!
//! Stored dates do not sort as text ("05.12.2024" < "25.01.2024"), so every read
//! orders rows by a key built from reordered substrings: `yyyy || mm || dd || HH:MM`.
//! The key is never parsed into a calendar date. Rows whose date or time text is
//! malformed still get a key (whatever characters are present at those positions)
//! and sort on it unchanged.

use crate::db::entries::Entry;
use crate::errors::AppError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Direction of a chronological listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first.
    #[value(alias = "asc")]
    Ascending,
    /// Newest first.
    #[default]
    #[value(alias = "desc")]
    Descending,
}

impl SortOrder {
    /// Canonical lowercase name, as stored in preferences.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" | "asc" => Ok(SortOrder::Ascending),
            "descending" | "desc" => Ok(SortOrder::Descending),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown sort direction '{}': expected 'ascending' or 'descending'",
                other
            ))),
        }
    }
}

/// Takes `len` characters starting at character `start`, like SQL `substr`.
///
/// Out-of-range positions yield a shorter (possibly empty) slice.
fn segment(text: &str, start: usize, len: usize) -> &str {
    let boundary = |n: usize| {
        text.char_indices()
            .map(|(i, _)| i)
            .chain(Some(text.len()))
            .nth(n)
    };
    match boundary(start) {
        Some(from) => &text[from..boundary(start + len).unwrap_or(text.len())],
        None => "",
    }
}

/// Builds the chronological key `yyyy || mm || dd || time` for a stored entry.
///
/// # Examples
///
/// ```
/// use pawprint::db::ordering::chronological_key;
///
/// assert_eq!(chronological_key("05.03.2024", "18:30"), "2024030518:30");
/// assert!(chronological_key("01.01.2025", "00:00") > chronological_key("31.12.2024", "23:59"));
/// ```
pub fn chronological_key(date: &str, time: &str) -> String {
    let mut key = String::with_capacity(8 + time.len());
    key.push_str(segment(date, 6, 4));
    key.push_str(segment(date, 3, 2));
    key.push_str(segment(date, 0, 2));
    key.push_str(time);
    key
}

/// Month component (`mm`) as it appears at positions 4-5 of a stored date.
pub fn month_component(month: u32) -> String {
    format!("{:02}", month)
}

/// Year component (`yyyy`) as it appears at positions 7-10 of a stored date.
pub fn year_component(year: i32) -> String {
    format!("{:04}", year)
}

/// Ascending comparison: chronological key, then insertion time, then id.
fn compare_ascending(a: &Entry, b: &Entry) -> Ordering {
    chronological_key(&a.date, &a.time)
        .cmp(&chronological_key(&b.date, &b.time))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts entries in place.
///
/// Every tie-breaker follows the same direction, so a descending sort is
/// the exact reverse of an ascending one.
pub fn sort_entries(entries: &mut [Entry], order: SortOrder) {
    match order {
        SortOrder::Ascending => entries.sort_by(compare_ascending),
        SortOrder::Descending => entries.sort_by(|a, b| compare_ascending(b, a)),
    }
}
