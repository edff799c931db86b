//! High-level operations exposed to front ends.
//!
//! `diary` wraps the entry store behind a pooled database handle and `backup`
//! moves the store file in and out of the data directory.

pub mod backup;
pub mod diary;

pub use backup::{export_store, import_store, verify_export, BackupReport, RestoreReport};
