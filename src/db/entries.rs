//! Entry CRUD operations.
//!
//! This module provides functions for inserting, deleting, and querying diary
//! entries. Entries are never updated in place. Reads come back in chronological
//! order as defined by [`crate::db::ordering`].

use crate::constants::{CREATED_AT_FORMAT, MAX_EVENTS, MAX_RATING};
use crate::db::ordering::{month_component, sort_entries, year_component, SortOrder};
use crate::errors::{AppError, AppResult, StorageError};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::debug;

/// Represents a diary entry in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: i64,
    /// `dd.mm.yyyy`, stored as given.
    pub date: String,
    /// `HH:MM`, stored as given.
    pub time: String,
    /// 0 means no rating.
    pub rating: u8,
    pub events: Vec<String>,
    /// Insertion timestamp; only used to break ordering ties.
    #[serde(skip)]
    pub created_at: String,
}

/// The writer-side shape of an entry before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub date: String,
    pub time: String,
    pub rating: u8,
    pub events: Vec<String>,
}

impl NewEntry {
    /// Checks the rules a well-behaved writer enforces before inserting.
    ///
    /// The store itself accepts any `NewEntry`; this is for callers that
    /// build entries from user input.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidArgument` describing the first violated rule.
    pub fn validate(&self) -> AppResult<()> {
        if !has_shape(&self.date, "dd.dd.dddd") {
            return Err(AppError::InvalidArgument(format!(
                "Date '{}' is not in dd.mm.yyyy format",
                self.date
            )));
        }
        if !has_shape(&self.time, "dd:dd") {
            return Err(AppError::InvalidArgument(format!(
                "Time '{}' is not in HH:MM format",
                self.time
            )));
        }
        if self.rating > MAX_RATING {
            return Err(AppError::InvalidArgument(format!(
                "Rating {} is out of range 0..={}",
                self.rating, MAX_RATING
            )));
        }
        if self.events.len() > MAX_EVENTS {
            return Err(AppError::InvalidArgument(format!(
                "At most {} events per entry, got {}",
                MAX_EVENTS,
                self.events.len()
            )));
        }
        if self.events.iter().any(|event| event.trim().is_empty()) {
            return Err(AppError::InvalidArgument(
                "Events must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Matches `text` against a pattern where `d` is any ASCII digit and every
/// other character must match literally.
fn has_shape(text: &str, pattern: &str) -> bool {
    text.len() == pattern.len()
        && text.chars().zip(pattern.chars()).all(|(c, p)| match p {
            'd' => c.is_ascii_digit(),
            literal => c == literal,
        })
}

const SELECT_COLUMNS: &str = "SELECT id, date, time, rating, events, created_at FROM entries";

/// Row as read from SQLite, before the events column is decoded.
struct StoredEntry {
    id: i64,
    date: String,
    time: String,
    rating: u8,
    events_json: String,
    created_at: String,
}

impl StoredEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(StoredEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            time: row.get(2)?,
            rating: row.get(3)?,
            events_json: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn decode(self) -> AppResult<Entry> {
        let events = serde_json::from_str(&self.events_json)
            .map_err(|source| StorageError::MalformedEvents {
                id: self.id,
                source,
            })?;
        Ok(Entry {
            id: self.id,
            date: self.date,
            time: self.time,
            rating: self.rating,
            events,
            created_at: self.created_at,
        })
    }
}

fn query_entries<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> AppResult<Vec<Entry>> {
    let mut stmt = conn.prepare(sql).map_err(StorageError::Sqlite)?;
    let rows = stmt
        .query_map(params, StoredEntry::from_row)
        .map_err(StorageError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(StorageError::Sqlite)?;

    rows.into_iter().map(StoredEntry::decode).collect()
}

/// Inserts a new entry and returns its id.
///
/// The entry is stored exactly as given (no validation, no truncation) with a
/// `created_at` timestamp taken at call time. The insert is a single statement,
/// so it either fully succeeds or leaves no row behind.
///
/// # Errors
///
/// Returns `AppError::StorageUnavailable` if the database operation fails.
pub fn insert_entry(conn: &Connection, entry: &NewEntry) -> AppResult<i64> {
    debug!("Inserting entry for {} {}", entry.date, entry.time);

    let events_json = serde_json::to_string(&entry.events)
        .map_err(|e| AppError::InvalidArgument(format!("Events cannot be serialized: {}", e)))?;
    let created_at = Utc::now().format(CREATED_AT_FORMAT).to_string();

    conn.execute(
        r#"
        INSERT INTO entries (date, time, rating, events, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![entry.date, entry.time, entry.rating, events_json, created_at],
    )
    .map_err(StorageError::Sqlite)?;

    let entry_id = conn.last_insert_rowid();
    debug!("Entry inserted with id {}", entry_id);
    Ok(entry_id)
}

/// Deletes an entry by id.
///
/// Returns whether a row was removed. A missing id is not an error.
///
/// # Errors
///
/// Returns `AppError::StorageUnavailable` if the database operation fails.
pub fn delete_entry(conn: &Connection, entry_id: i64) -> AppResult<bool> {
    debug!("Deleting entry {}", entry_id);

    let rows_affected = conn
        .execute("DELETE FROM entries WHERE id = ?1", params![entry_id])
        .map_err(StorageError::Sqlite)?;

    if rows_affected == 0 {
        debug!("Entry {} did not exist", entry_id);
    }
    Ok(rows_affected > 0)
}

/// Retrieves an entry by id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
/// Returns `Ok(None)` if no entry has the given id.
pub fn get_entry(conn: &Connection, entry_id: i64) -> AppResult<Option<Entry>> {
    debug!("Getting entry {}", entry_id);

    let stored = conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            params![entry_id],
            StoredEntry::from_row,
        )
        .optional()
        .map_err(StorageError::Sqlite)?;

    stored.map(StoredEntry::decode).transpose()
}

/// Lists every entry whose date falls in the given month.
///
/// Matching compares the `mm` and `yyyy` substrings of the stored date text, so
/// calendar-invalid dates such as `31.04.2024` still belong to their month.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list_by_month(
    conn: &Connection,
    year: i32,
    month: u32,
    order: SortOrder,
) -> AppResult<Vec<Entry>> {
    let month_text = month_component(month);
    let year_text = year_component(year);
    debug!("Listing entries for {}.{} ({})", month_text, year_text, order);

    let mut entries = query_entries(
        conn,
        &format!(
            "{} WHERE substr(date, 4, 2) = ?1 AND substr(date, 7, 4) = ?2",
            SELECT_COLUMNS
        ),
        params![month_text, year_text],
    )?;
    sort_entries(&mut entries, order);

    debug!("Found {} entries", entries.len());
    Ok(entries)
}

/// Finds entries whose date text or serialized events contain `keyword`.
///
/// Matching is a case-sensitive substring test against the stored text, including
/// the JSON serialization of the events column. The events text is matched as
/// stored, so JSON syntax takes part: a keyword containing `"` or `\` only matches
/// its escaped form, and `[` or `]` match the array brackets of every row.
///
/// # Errors
///
/// Returns `AppError::InvalidArgument` for an empty keyword and
/// `AppError::StorageUnavailable` if the database operation fails.
pub fn search_entries(
    conn: &Connection,
    keyword: &str,
    order: SortOrder,
) -> AppResult<Vec<Entry>> {
    if keyword.is_empty() {
        return Err(AppError::InvalidArgument(
            "Search keyword must not be empty".to_string(),
        ));
    }
    debug!("Searching entries ({})", order);

    let mut entries = query_entries(
        conn,
        &format!(
            "{} WHERE instr(date, ?1) > 0 OR instr(events, ?1) > 0",
            SELECT_COLUMNS
        ),
        params![keyword],
    )?;
    sort_entries(&mut entries, order);

    debug!("Search matched {} entries", entries.len());
    Ok(entries)
}

/// Counts all stored entries.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn count_entries(conn: &Connection) -> AppResult<i64> {
    conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
        .map_err(|e| StorageError::Sqlite(e).into())
}
