use accuplot_core::{CsvHashStore, HashRecord, HashStore, StoreError};
use chrono::Utc;

#[test]
fn missing_store_loads_empty_at_epoch() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvHashStore::new(dir.path().join("plot-hashes.csv"));
    let record = store.load().unwrap();
    assert!(record.is_empty());
    assert_eq!(record.last_modified.timestamp(), 0);
}

#[test]
fn save_then_load_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("plot-hashes.csv");
    let mut store = CsvHashStore::new(&path);

    let mut record = HashRecord::empty();
    record.insert("exp_f32", "a".repeat(64));
    record.insert("log,with,commas", "b".repeat(64));

    let before = Utc::now();
    let saved_at = store.save(&record).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded.fingerprints, record.fingerprints);
    assert_eq!(loaded.last_modified, saved_at);
    assert!(loaded.last_modified >= before);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("id,fingerprint\n@last_modified,"));
}

#[test]
fn save_leaves_no_temporary_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CsvHashStore::new(dir.path().join("plot-hashes.csv"));
    store.save(&HashRecord::empty()).unwrap();
    store.save(&HashRecord::empty()).unwrap();
    let names: Vec<_> = std::fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
    assert_eq!(names, vec![std::ffi::OsString::from("plot-hashes.csv")]);
}

#[test]
fn corrupt_store_is_reported_and_recovered_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plot-hashes.csv");
    std::fs::write(&path, "this is not,a hash store\n\u{0}\u{1}").unwrap();
    let store = CsvHashStore::new(&path);

    assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    let recovered = store.load_or_empty();
    assert!(recovered.is_empty());
    assert_eq!(recovered, HashRecord::empty());
}

#[test]
fn persist_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    // El "directorio padre" es un archivo regular: no se puede escribir.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"x").unwrap();
    let mut store = CsvHashStore::new(blocker.join("plot-hashes.csv"));
    assert!(matches!(store.save(&HashRecord::empty()), Err(StoreError::Persist { .. })));
}
