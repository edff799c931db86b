//! Entry store operations over a pooled [`Database`].
//!
//! These are the calls a front end makes: each one checks out a connection and
//! delegates to [`crate::db::entries`]. Sort direction is always passed in
//! explicitly; nothing here reads preferences.

use crate::db::entries::{self, Entry, NewEntry};
use crate::db::ordering::SortOrder;
use crate::db::Database;
use crate::errors::AppResult;
use tracing::info;

/// Inserts an entry and returns its new id.
pub fn insert(db: &Database, entry: &NewEntry) -> AppResult<i64> {
    let conn = db.get_conn()?;
    let id = entries::insert_entry(&conn, entry)?;
    info!("Recorded entry {}", id);
    Ok(id)
}

/// Deletes an entry; a missing id is a no-op.
pub fn delete(db: &Database, entry_id: i64) -> AppResult<()> {
    let conn = db.get_conn()?;
    if entries::delete_entry(&conn, entry_id)? {
        info!("Deleted entry {}", entry_id);
    }
    Ok(())
}

/// Lists one month of entries in chronological order.
pub fn list_by_month(
    db: &Database,
    year: i32,
    month: u32,
    order: SortOrder,
) -> AppResult<Vec<Entry>> {
    let conn = db.get_conn()?;
    entries::list_by_month(&conn, year, month, order)
}

/// Searches all months for `keyword`. An empty keyword is rejected.
pub fn search(db: &Database, keyword: &str, order: SortOrder) -> AppResult<Vec<Entry>> {
    let conn = db.get_conn()?;
    let found = entries::search_entries(&conn, keyword, order)?;
    info!("Search returned {} entries", found.len());
    Ok(found)
}

/// Looks up a single entry.
pub fn get(db: &Database, entry_id: i64) -> AppResult<Option<Entry>> {
    let conn = db.get_conn()?;
    entries::get_entry(&conn, entry_id)
}
