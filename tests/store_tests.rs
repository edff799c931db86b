//! Integration tests for the entry store.
//!
//! These go through a real pooled `Database` on disk and check ordering, month
//! filtering, search and the delete/insert contracts.

use pawprint::db::entries::{self, Entry, NewEntry};
use pawprint::db::ordering::SortOrder;
use pawprint::db::Database;
use pawprint::ops::diary;
use pawprint::AppError;
use std::fs;
use tempfile::TempDir;

fn open_store(temp_dir: &TempDir) -> Database {
    let db = Database::open(&temp_dir.path().join("diary.db")).expect("open database");
    db.initialize_schema().expect("initialize schema");
    db
}

fn new_entry(date: &str, time: &str, rating: u8, events: &[&str]) -> NewEntry {
    NewEntry {
        date: date.to_string(),
        time: time.to_string(),
        rating,
        events: events.iter().map(|e| e.to_string()).collect(),
    }
}

fn dates(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.date.as_str()).collect()
}

/// Three entries in March 2024 plus one in February, inserted out of order.
fn seed_march(db: &Database) -> (i64, i64, i64) {
    let fifth = diary::insert(db, &new_entry("05.03.2024", "10:00", 3, &["Walk"])).unwrap();
    let twentieth = diary::insert(db, &new_entry("20.03.2024", "08:15", 0, &[])).unwrap();
    let first = diary::insert(db, &new_entry("01.03.2024", "23:59", 5, &["Vet", "Bath"])).unwrap();
    diary::insert(db, &new_entry("28.02.2024", "12:00", 4, &["Park"])).unwrap();
    (first, fifth, twentieth)
}

#[test]
fn test_month_listing_descending_by_default_preference() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    seed_march(&db);

    let listed = diary::list_by_month(&db, 2024, 3, SortOrder::Descending).unwrap();
    assert_eq!(dates(&listed), vec!["20.03.2024", "05.03.2024", "01.03.2024"]);
    assert_eq!(
        listed.iter().map(|e| e.rating).collect::<Vec<_>>(),
        vec![0, 3, 5]
    );
}

#[test]
fn test_month_listing_ascending_is_exact_reverse() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    seed_march(&db);

    let ascending = diary::list_by_month(&db, 2024, 3, SortOrder::Ascending).unwrap();
    let mut descending = diary::list_by_month(&db, 2024, 3, SortOrder::Descending).unwrap();
    descending.reverse();

    assert_eq!(dates(&ascending), vec!["01.03.2024", "05.03.2024", "20.03.2024"]);
    assert_eq!(ascending, descending);
}

#[test]
fn test_month_listing_excludes_other_months_and_years() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    seed_march(&db);
    diary::insert(&db, &new_entry("05.03.2023", "10:00", 1, &[])).unwrap();

    let listed = diary::list_by_month(&db, 2024, 3, SortOrder::Ascending).unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed.iter().all(|e| e.date.ends_with(".03.2024")));

    let february = diary::list_by_month(&db, 2024, 2, SortOrder::Ascending).unwrap();
    assert_eq!(dates(&february), vec!["28.02.2024"]);

    assert!(diary::list_by_month(&db, 2030, 1, SortOrder::Ascending)
        .unwrap()
        .is_empty());
}

#[test]
fn test_empty_month_returns_empty_list() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    seed_march(&db);

    assert!(diary::list_by_month(&db, 2024, 4, SortOrder::Descending)
        .unwrap()
        .is_empty());
}

#[test]
fn test_descending_order_spans_years() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    for date in ["15.06.2024", "01.01.2025", "31.12.2024"] {
        diary::insert(&db, &new_entry(date, "12:00", 1, &["Checkup"])).unwrap();
    }

    // Plain text order of the stored dates would put 31.12.2024 first
    let found = diary::search(&db, "Checkup", SortOrder::Descending).unwrap();
    assert_eq!(dates(&found), vec!["01.01.2025", "31.12.2024", "15.06.2024"]);
}

#[test]
fn test_same_day_orders_by_time() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    diary::insert(&db, &new_entry("10.06.2024", "21:00", 2, &[])).unwrap();
    diary::insert(&db, &new_entry("10.06.2024", "07:30", 2, &[])).unwrap();
    diary::insert(&db, &new_entry("10.06.2024", "12:45", 2, &[])).unwrap();

    let listed = diary::list_by_month(&db, 2024, 6, SortOrder::Ascending).unwrap();
    assert_eq!(
        listed.iter().map(|e| e.time.as_str()).collect::<Vec<_>>(),
        vec!["07:30", "12:45", "21:00"]
    );
}

#[test]
fn test_identical_date_and_time_break_ties_by_insertion() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    let first = diary::insert(&db, &new_entry("10.06.2024", "09:00", 1, &["first"])).unwrap();
    let second = diary::insert(&db, &new_entry("10.06.2024", "09:00", 1, &["second"])).unwrap();

    let ascending = diary::list_by_month(&db, 2024, 6, SortOrder::Ascending).unwrap();
    assert_eq!(
        ascending.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![first, second]
    );

    let descending = diary::list_by_month(&db, 2024, 6, SortOrder::Descending).unwrap();
    assert_eq!(
        descending.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![second, first]
    );
}

#[test]
fn test_search_matches_events_across_months() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    seed_march(&db);
    diary::insert(&db, &new_entry("14.11.2023", "16:00", 2, &["Vet check-up"])).unwrap();

    let found = diary::search(&db, "Vet", SortOrder::Descending).unwrap();
    assert_eq!(dates(&found), vec!["01.03.2024", "14.11.2023"]);
}

#[test]
fn test_search_matches_dates() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    seed_march(&db);

    let found = diary::search(&db, "02.2024", SortOrder::Ascending).unwrap();
    assert_eq!(dates(&found), vec!["28.02.2024"]);
}

#[test]
fn test_search_is_case_sensitive() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    seed_march(&db);

    assert_eq!(diary::search(&db, "Walk", SortOrder::Ascending).unwrap().len(), 1);
    assert!(diary::search(&db, "walk", SortOrder::Ascending)
        .unwrap()
        .is_empty());
}

#[test]
fn test_search_rejects_empty_keyword() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    seed_march(&db);

    let result = diary::search(&db, "", SortOrder::Ascending);
    assert!(matches!(result, Err(AppError::InvalidArgument(_))));
}

#[test]
fn test_delete_removes_only_that_entry() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    let (first, fifth, twentieth) = seed_march(&db);

    diary::delete(&db, fifth).unwrap();

    assert!(diary::get(&db, fifth).unwrap().is_none());
    assert!(diary::get(&db, first).unwrap().is_some());
    let listed = diary::list_by_month(&db, 2024, 3, SortOrder::Ascending).unwrap();
    assert_eq!(
        listed.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![first, twentieth]
    );
}

#[test]
fn test_delete_missing_id_is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    seed_march(&db);

    diary::delete(&db, 9_999).unwrap();
    let conn = db.get_conn().unwrap();
    assert_eq!(entries::count_entries(&conn).unwrap(), 4);
    assert_eq!(
        diary::list_by_month(&db, 2024, 3, SortOrder::Ascending)
            .unwrap()
            .len(),
        3
    );
}

#[test]
fn test_ids_are_never_reused() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    let first = diary::insert(&db, &new_entry("01.01.2024", "08:00", 1, &[])).unwrap();
    let second = diary::insert(&db, &new_entry("02.01.2024", "08:00", 1, &[])).unwrap();
    diary::delete(&db, second).unwrap();

    let third = diary::insert(&db, &new_entry("03.01.2024", "08:00", 1, &[])).unwrap();
    assert!(second > first);
    assert!(third > second);
}

#[test]
fn test_round_trip_preserves_fields() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    let events = ["Ate \"treats\"", "Met Bello, Luna", "Ünïcödé 🐾"];
    let id = diary::insert(&db, &new_entry("07.07.2024", "07:07", 5, &events)).unwrap();

    let entry = diary::get(&db, id).unwrap().expect("entry exists");
    assert_eq!(entry.date, "07.07.2024");
    assert_eq!(entry.time, "07:07");
    assert_eq!(entry.rating, 5);
    assert_eq!(entry.events, events.iter().map(|e| e.to_string()).collect::<Vec<_>>());
}

#[test]
fn test_entries_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let id = {
        let db = open_store(&temp_dir);
        diary::insert(&db, &new_entry("12.12.2024", "12:12", 4, &["Snow"])).unwrap()
    };

    let db = open_store(&temp_dir);
    let entry = diary::get(&db, id).unwrap().expect("entry persisted");
    assert_eq!(entry.events, vec!["Snow".to_string()]);
}

#[test]
fn test_malformed_dates_are_tolerated() {
    let temp_dir = TempDir::new().unwrap();
    let db = open_store(&temp_dir);
    diary::insert(&db, &new_entry("5.3.24", "9:0", 1, &["odd"])).unwrap();
    diary::insert(&db, &new_entry("05.03.2024", "10:00", 1, &["odd too"])).unwrap();

    let found = diary::search(&db, "odd", SortOrder::Ascending).unwrap();
    assert_eq!(found.len(), 2);
}

#[test]
fn test_open_rejects_non_database_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("diary.db");
    fs::write(&path, vec![b'x'; 4096]).unwrap();

    let result = Database::open(&path).and_then(|db| db.initialize_schema());
    assert!(matches!(result, Err(AppError::StorageUnavailable(_))));
}
