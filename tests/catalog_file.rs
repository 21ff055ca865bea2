use std::fs;

use book_catalog::{BookStore, CatalogError, LoadOutcome, Status};
use tempfile::TempDir;

#[test]
fn dune_lifecycle_survives_save_and_reload() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("books.json");

    let mut store = BookStore::new();
    assert!(matches!(store.load(&path), LoadOutcome::Missing));
    assert!(store.is_empty());

    let id = store.add("Dune", "Frank Herbert", 1965).unwrap();
    assert_eq!(store.find_by_title("Dune").unwrap().status, Status::Available);

    store.set_status(id, "Borrowed").unwrap();
    let borrowed = store.find_by_title("Dune").unwrap().clone();
    assert_eq!(borrowed.status, Status::Borrowed);

    store.save(&path).unwrap();

    let mut reloaded = BookStore::new();
    assert!(matches!(reloaded.load(&path), LoadOutcome::Loaded(1)));
    assert_eq!(reloaded.find_by_title("Dune").unwrap(), &borrowed);
}

#[test]
fn non_array_document_loads_as_empty_with_parse_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("books.json");
    fs::write(&path, r#"{"not":"an array"}"#).unwrap();

    let mut store = BookStore::from_books(Vec::new());
    store.add("Leftover", "Someone", 2000).unwrap();
    let outcome = store.load(&path);

    assert!(matches!(outcome, LoadOutcome::Malformed(_)));
    assert!(outcome.is_error());
    assert!(store.is_empty());
}

#[test]
fn records_missing_fields_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("books.json");
    fs::write(
        &path,
        r#"[{"id": 1000, "title": "Dune", "author": "Frank Herbert", "year": 1965}]"#,
    )
    .unwrap();

    let mut store = BookStore::new();
    assert!(matches!(store.load(&path), LoadOutcome::Malformed(_)));
    assert!(store.is_empty());
}

#[test]
fn repeated_ids_and_bad_authors_are_rejected_on_load() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("books.json");
    fs::write(
        &path,
        r#"[
            {"id": 1000, "title": "A", "author": "Ann", "year": 1, "status": "Available"},
            {"id": 1000, "title": "B", "author": "Bob", "year": 2, "status": "Borrowed"}
        ]"#,
    )
    .unwrap();

    let mut store = BookStore::new();
    let outcome = store.load(&path);
    assert!(matches!(outcome, LoadOutcome::Malformed(CatalogError::DuplicateId(1000))));
    assert!(store.is_empty());

    fs::write(
        &path,
        r#"[{"id": 1000, "title": "A", "author": "R2D2", "year": 1, "status": "Available"}]"#,
    )
    .unwrap();
    let outcome = store.load(&path);
    assert!(matches!(outcome, LoadOutcome::Malformed(CatalogError::InvalidAuthor(_))));
    assert!(store.is_empty());
}

#[test]
fn directory_in_place_of_file_is_unreadable() {
    let tmp = TempDir::new().unwrap();
    let mut store = BookStore::new();
    let outcome = store.load(tmp.path());
    assert!(outcome.is_error());
    assert!(store.is_empty());
}

#[test]
fn save_overwrites_previous_content_and_creates_parent() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("books.json");

    let mut store = BookStore::new();
    let first = store.add("First", "Ann Author", 1).unwrap();
    store.add("Second", "Bob Author", 2).unwrap();
    store.save(&path).unwrap();

    store.remove(first).unwrap();
    store.save(&path).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("First"));
    assert!(raw.contains("\n    {\n        \"id\": "));

    let mut reloaded = BookStore::new();
    reloaded.load(&path);
    assert_eq!(reloaded, store);
}

#[test]
fn save_into_unwritable_location_reports_io_error() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let store = BookStore::new();
    let err = store.save(&blocker.join("books.json")).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
}

#[test]
fn find_by_author_returns_both_records() {
    let mut store = BookStore::new();
    let a = store.add("Dune", "Frank Herbert", 1965).unwrap();
    store.add("Neuromancer", "William Gibson", 1984).unwrap();
    let b = store.add("Children of Dune", "Frank Herbert", 1976).unwrap();

    let ids: Vec<u32> = store
        .find_by_author("Frank Herbert")
        .unwrap()
        .iter()
        .map(|book| book.id)
        .collect();
    assert_eq!(ids, vec![a, b]);
}
