use crate::constants::{APP_DESCRIPTION, APP_NAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use crate::db::ordering::SortOrder;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// A diary for your pet: dated ratings and events
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION, author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, default_value = LOG_FORMAT_TEXT, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new entry
    Add(AddArgs),

    /// List the entries of one month
    List(ListArgs),

    /// Search entry dates and events for a keyword
    Search {
        /// Case-sensitive text to look for; blank falls back to the current month
        keyword: String,

        /// Sort direction (defaults to the saved preference)
        #[arg(short, long, value_enum)]
        order: Option<SortOrder>,
    },

    /// Delete an entry by id
    Delete { id: i64 },

    /// Manage the avatar image
    #[command(subcommand)]
    Avatar(AvatarCommand),

    /// Read or change preferences
    #[command(subcommand)]
    Prefs(PrefsCommand),

    /// Copy the entry store to a file
    Export { destination: PathBuf },

    /// Replace the entry store with a previously exported file
    Import { source: PathBuf },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Date as dd.mm.yyyy (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Time as HH:MM (defaults to now)
    #[arg(short, long)]
    pub time: Option<String>,

    /// Rating from 0 (none) to 5
    #[arg(short, long, default_value_t = 0)]
    pub rating: u8,

    /// An event note; repeat for up to five
    #[arg(short, long = "event")]
    pub events: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Year to list (defaults to the current year)
    #[arg(short, long, requires = "month")]
    pub year: Option<i32>,

    /// Month to list, 1-12 (defaults to the current month)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Sort direction (defaults to the saved preference)
    #[arg(short, long, value_enum)]
    pub order: Option<SortOrder>,
}

#[derive(Subcommand, Debug)]
pub enum AvatarCommand {
    /// Copy an image in as the avatar
    Set { source: PathBuf },
    /// Delete the avatar
    Remove,
    /// Print the avatar path, if any
    Show,
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
    /// Print a preference (icon_style, sort_direction, avatar_path)
    Get { key: String },
    /// Change a preference
    Set { key: String, value: String },
    /// Reset a preference to its default
    Unset { key: String },
}
