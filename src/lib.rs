/*!
# Pawprint

Pawprint is the local persistence and query core of a pet diary. Users log dated
entries (a rating and a few short event notes), browse them month by month or by
keyword, and keep a profile avatar plus a couple of display preferences.

## Core Features

- Insert and delete diary entries in a SQLite store
- List a month of entries, or search all of them, in chronological order even
  though dates are stored as `dd.mm.yyyy` text
- Durable preferences (icon style, sort direction, avatar path)
- A single avatar image replaced copy-first, so a failed update never loses it
- Byte-for-byte export and import of the store file

## Architecture

- `cli`: Command-line interface handling using clap
- `config`: Data directory resolution
- `errors`: Error handling infrastructure
- `db`: SQLite schema, entry queries and chronological ordering
- `prefs`: Preference document
- `avatar`: Avatar file lifecycle
- `ops`: Entry store operations and backup

## Usage Example

```rust,no_run
use pawprint::db::entries::NewEntry;
use pawprint::db::ordering::SortOrder;
use pawprint::db::Database;
use pawprint::{config, ops, Config};

fn main() -> pawprint::AppResult<()> {
    let config = Config::load()?;
    config::ensure_data_dir(&config.data_dir)?;

    let db = Database::open(&config.db_path())?;
    db.initialize_schema()?;

    ops::diary::insert(
        &db,
        &NewEntry {
            date: "05.03.2024".to_string(),
            time: "18:30".to_string(),
            rating: 4,
            events: vec!["Long walk".to_string()],
        },
    )?;

    for entry in ops::diary::list_by_month(&db, 2024, 3, SortOrder::Descending)? {
        println!("{} {} {:?}", entry.date, entry.time, entry.events);
    }
    Ok(())
}
```
*/

/// Avatar image lifecycle
pub mod avatar;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// SQLite storage for diary entries
pub mod db;
/// Error types and utilities for error handling
pub mod errors;
/// Entry store and backup operations
pub mod ops;
/// Durable preferences
pub mod prefs;

// Re-export important types for convenience
pub use avatar::AvatarManager;
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use prefs::PreferenceStore;
