/*!
# Pawprint - A Pet Diary

Command-line front end for the pawprint storage core. It records diary entries,
lists them by month or keyword, and manages the avatar and preferences.

## Usage

```text
pawprint [OPTIONS] <COMMAND>

Commands:
  add     Record a new entry
  list    List the entries of one month
  search  Search entry dates and events for a keyword
  delete  Delete an entry by id
  avatar  Manage the avatar image
  prefs   Read or change preferences
  export  Copy the entry store to a file
  import  Replace the entry store with a previously exported file

Options:
  -v, --verbose                  Print verbose output
      --log-format <LOG_FORMAT>  Log output format [default: text] [possible values: text, json]
```

## Configuration

- `PAWPRINT_DIR`: The data directory (defaults to "~/.local/share/pawprint")
- `RUST_LOG`: Log filter, overriding `--verbose`
*/

use chrono::{Datelike, Local};
use clap::Parser;
use pawprint::cli::{AddArgs, AvatarCommand, CliArgs, Command, ListArgs, PrefsCommand};
use pawprint::config::{self, Config};
use pawprint::constants::{
    DEFAULT_LOG_LEVEL, ENTRY_DATE_FORMAT, ENTRY_TIME_FORMAT, LOG_FORMAT_JSON,
    TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME,
};
use pawprint::db::entries::{Entry, NewEntry};
use pawprint::db::ordering::SortOrder;
use pawprint::db::Database;
use pawprint::errors::{AppError, AppResult};
use pawprint::ops::{self, diary};
use pawprint::prefs::{PreferenceKey, PreferenceStore};
use pawprint::AvatarManager;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose, &args.log_format);

    let span = tracing::info_span!(TRACING_ROOT_SPAN_NAME, service = TRACING_SERVICE_NAME);
    let _guard = span.enter();
    debug!("CLI arguments: {:?}", args);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool, log_format: &str) {
    let default_level = if verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if log_format == LOG_FORMAT_JSON {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(args: CliArgs) -> AppResult<()> {
    let config = Config::load()?;
    config.validate()?;
    config::ensure_data_dir(&config.data_dir)?;

    let prefs = PreferenceStore::new(config.preferences_path());

    match args.command {
        Command::Add(add) => add_entry(&config, add),
        Command::List(list) => list_entries(&config, &prefs, list),
        Command::Search { keyword, order } => {
            if keyword.trim().is_empty() {
                info!("Blank keyword, listing the current month");
                return list_entries(
                    &config,
                    &prefs,
                    ListArgs {
                        year: None,
                        month: None,
                        order,
                    },
                );
            }
            let order = resolve_order(&prefs, order)?;
            let db = open_database(&config)?;
            print_entries(&prefs, &diary::search(&db, &keyword, order)?)
        }
        Command::Delete { id } => {
            let db = open_database(&config)?;
            diary::delete(&db, id)?;
            println!("Deleted entry {}", id);
            Ok(())
        }
        Command::Avatar(command) => {
            let avatars = AvatarManager::new(config.avatar_dir(), prefs);
            match command {
                AvatarCommand::Set { source } => {
                    let path = avatars.set_avatar(&source)?;
                    println!("{}", path.display());
                }
                AvatarCommand::Remove => {
                    avatars.remove_avatar()?;
                    println!("Avatar removed");
                }
                AvatarCommand::Show => match avatars.current_avatar_path()? {
                    Some(path) => println!("{}", path.display()),
                    None => println!("No avatar set"),
                },
            }
            Ok(())
        }
        Command::Prefs(command) => manage_prefs(&prefs, command),
        Command::Export { destination } => {
            // Make sure the store exists even before the first entry
            drop(open_database(&config)?);
            let report = ops::export_store(&config.db_path(), &destination)?;
            println!(
                "Exported {} bytes to {} (blake3 {})",
                report.bytes,
                report.path.display(),
                report.checksum
            );
            Ok(())
        }
        Command::Import { source } => {
            let report = ops::import_store(&source, &config.db_path())?;
            println!(
                "Imported {} bytes (blake3 {}).",
                report.bytes, report.checksum
            );
            if report.restart_required {
                println!("Restart the application to load the imported entries.");
            }
            Ok(())
        }
    }
}

fn open_database(config: &Config) -> AppResult<Database> {
    let db = Database::open(&config.db_path())?;
    db.initialize_schema()?;
    Ok(db)
}

fn resolve_order(prefs: &PreferenceStore, order: Option<SortOrder>) -> AppResult<SortOrder> {
    match order {
        Some(order) => Ok(order),
        None => prefs.sort_direction(),
    }
}

fn add_entry(config: &Config, add: AddArgs) -> AppResult<()> {
    let now = Local::now();
    let entry = NewEntry {
        date: add
            .date
            .unwrap_or_else(|| now.format(ENTRY_DATE_FORMAT).to_string()),
        time: add
            .time
            .unwrap_or_else(|| now.format(ENTRY_TIME_FORMAT).to_string()),
        rating: add.rating,
        events: add.events,
    };
    entry.validate()?;

    let db = open_database(config)?;
    let id = diary::insert(&db, &entry)?;
    println!("Added entry {}", id);
    Ok(())
}

fn list_entries(config: &Config, prefs: &PreferenceStore, list: ListArgs) -> AppResult<()> {
    let today = Local::now().date_naive();
    let year = list.year.unwrap_or_else(|| today.year());
    let month = list.month.unwrap_or_else(|| today.month());
    let order = resolve_order(prefs, list.order)?;

    let db = open_database(config)?;
    print_entries(prefs, &diary::list_by_month(&db, year, month, order)?)
}

fn print_entries(prefs: &PreferenceStore, entries: &[Entry]) -> AppResult<()> {
    if entries.is_empty() {
        println!("No entries");
        return Ok(());
    }

    let glyph = prefs.icon_style()?.glyph();
    for entry in entries {
        println!(
            "#{} {} {} {} {}",
            entry.id,
            entry.date,
            entry.time,
            glyph.repeat(entry.rating as usize),
            entry.events.join("; ")
        );
    }
    Ok(())
}

fn manage_prefs(prefs: &PreferenceStore, command: PrefsCommand) -> AppResult<()> {
    let avatar_guard = |key: PreferenceKey| {
        if key == PreferenceKey::AvatarPath {
            Err(AppError::InvalidArgument(
                "avatar_path is managed by `pawprint avatar set|remove`".to_string(),
            ))
        } else {
            Ok(key)
        }
    };

    match command {
        PrefsCommand::Get { key } => match prefs.get(key.parse()?)? {
            Some(value) => println!("{}", value),
            None => println!("(unset)"),
        },
        PrefsCommand::Set { key, value } => {
            let key = avatar_guard(key.parse()?)?;
            prefs.set(key, &value)?;
            println!("{} = {}", key, value);
        }
        PrefsCommand::Unset { key } => {
            let key = avatar_guard(key.parse()?)?;
            prefs.remove(key)?;
            println!("{} reset", key);
        }
    }
    Ok(())
}
