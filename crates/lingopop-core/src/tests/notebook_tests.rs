use proptest::prelude::*;

use super::{entry, notebook_of};
use crate::notebook::{Notebook, NotebookStore, StoreError};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

const KEY: &str = "lingopop-notebook";

#[test]
fn insert_is_idempotent_by_term() {
    let mut notebook = Notebook::new();

    assert!(notebook.insert(entry("hola", 1)));
    assert!(!notebook.insert(entry("hola", 2)));

    assert_eq!(notebook.len(), 1);
    assert_eq!(notebook.entries()[0].id, "1");
}

#[test]
fn composed_and_decomposed_spellings_are_one_term() {
    let mut notebook = Notebook::new();

    assert!(notebook.insert(entry("caf\u{e9}", 1)));
    assert!(!notebook.insert(entry("cafe\u{301}", 2)));
    assert!(notebook.contains_term("cafe\u{301}"));
    assert_eq!(notebook.entries()[0].term, "caf\u{e9}");
}

#[test]
fn insert_prepends() {
    let mut notebook = Notebook::new();
    notebook.insert(entry("uno", 1));
    notebook.insert(entry("dos", 2));
    notebook.insert(entry("tres", 3));

    assert_eq!(notebook.recent_terms(5), vec!["tres", "dos", "uno"]);
    assert_eq!(notebook.recent_terms(2), vec!["tres", "dos"]);
}

#[test]
fn from_entries_drops_duplicate_terms() {
    let notebook = Notebook::from_entries(vec![entry("a", 1), entry("b", 2), entry("a", 3)]);
    assert_eq!(notebook.len(), 2);
    assert_eq!(notebook.find_by_id("1").unwrap().term, "a");
    assert!(notebook.find_by_id("3").is_none());
}

#[test]
fn missing_value_loads_empty() {
    let store = NotebookStore::new(Box::new(MemoryStore::new()), KEY);
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn save_then_load_round_trip() {
    let store = NotebookStore::new(Box::new(MemoryStore::new()), KEY);
    let mut notebook = Notebook::new();
    for (i, term) in ["ephemeral", "serendipity", "saudade"].iter().enumerate() {
        notebook.insert(entry(term, i as u64));
        store.save(&notebook).unwrap();
    }

    assert_eq!(store.load().unwrap(), notebook);
}

#[test]
fn corrupt_value_is_reported() {
    let kv = MemoryStore::new();
    kv.set(KEY, "{not json").unwrap();
    let store = NotebookStore::new(Box::new(kv), KEY);

    match store.load() {
        Err(StoreError::Corrupt { key, raw, .. }) => {
            assert_eq!(key, KEY);
            assert_eq!(raw, "{not json");
        }
        other => panic!("expected corrupt error, got {other:?}"),
    }
}

#[test]
fn recover_backs_up_corrupt_value() {
    let dir = tempfile::tempdir().unwrap();
    let kv = FileStore::new(dir.path()).unwrap();
    kv.set(KEY, "[{\"term\": 3}]").unwrap();

    let store = NotebookStore::new(Box::new(FileStore::new(dir.path()).unwrap()), KEY);
    let notebook = store.load_or_recover("lingopop-notebook.corrupt").unwrap();

    assert!(notebook.is_empty());
    assert_eq!(
        kv.get("lingopop-notebook.corrupt").unwrap().as_deref(),
        Some("[{\"term\": 3}]")
    );
    assert_eq!(kv.get(KEY).unwrap(), None);
}

#[test]
fn reads_entries_without_optional_fields() {
    let kv = MemoryStore::new();
    kv.set(
        KEY,
        r#"[{"id":"1","term":"hola","definition":"hello",
            "sourceLang":{"code":"en","name":"English","flag":"🇺🇸"},
            "targetLang":{"code":"es","name":"Spanish","flag":"🇪🇸"},
            "timestamp":1,"extra":"ignored"}]"#,
    )
    .unwrap();

    let notebook = NotebookStore::new(Box::new(kv), KEY).load().unwrap();
    let saved = &notebook.entries()[0];
    assert!(saved.examples.is_empty());
    assert!(saved.image_url.is_none());
    assert_eq!(saved.explanation, "");
}

#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let notebook = notebook_of(&["gato", "perro"]);

    NotebookStore::new(Box::new(FileStore::new(dir.path()).unwrap()), KEY)
        .save(&notebook)
        .unwrap();
    let reloaded = NotebookStore::new(Box::new(FileStore::new(dir.path()).unwrap()), KEY)
        .load()
        .unwrap();

    assert_eq!(reloaded, notebook);
}

proptest! {
    #[test]
    fn terms_stay_unique(terms in prop::collection::vec("[a-d]{1,2}", 0..40)) {
        let mut notebook = Notebook::new();
        for (i, term) in terms.iter().enumerate() {
            notebook.insert(entry(term, i as u64));
        }

        let mut seen: Vec<&str> = notebook.entries().iter().map(|e| e.term.as_str()).collect();
        let len = seen.len();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), len);
    }

    #[test]
    fn persisted_order_survives_reload(terms in prop::collection::vec("[a-z]{1,8}", 0..20)) {
        let store = NotebookStore::new(Box::new(MemoryStore::new()), KEY);
        let mut notebook = Notebook::new();
        for (i, term) in terms.iter().enumerate() {
            if notebook.insert(entry(term, i as u64)) {
                store.save(&notebook).unwrap();
            }
        }

        prop_assert_eq!(store.load().unwrap(), notebook);
    }
}
