use logo_studio::{HistoryEntry, HistoryStore, KeyValueStore, MemoryStore, HISTORY_CAPACITY};
use std::sync::Arc;

fn entry(n: usize) -> HistoryEntry {
    HistoryEntry {
        prompt: format!("prompt {n}"),
        image_data_url: format!("data:image/jpeg;base64,aW1hZ2Ut{n}"),
    }
}

#[test]
fn history_is_bounded_and_newest_first() {
    let store = Arc::new(MemoryStore::new());
    let mut history = HistoryStore::load(store);

    for n in 0..HISTORY_CAPACITY + 5 {
        history.record(entry(n)).expect("record");
    }

    assert_eq!(history.len(), HISTORY_CAPACITY);
    // Newest first; the oldest five were evicted.
    assert_eq!(history.entries()[0], entry(HISTORY_CAPACITY + 4));
    assert_eq!(history.entries()[HISTORY_CAPACITY - 1], entry(5));
}

#[test]
fn duplicate_image_content_moves_to_front() {
    let store = Arc::new(MemoryStore::new());
    let mut history = HistoryStore::load(store);

    history.record(entry(1)).expect("record");
    history.record(entry(2)).expect("record");
    history.record(entry(3)).expect("record");
    history.record(entry(1)).expect("re-record");

    assert_eq!(history.len(), 3);
    assert_eq!(history.entries()[0], entry(1));
    assert_eq!(history.entries()[1], entry(3));
    assert_eq!(history.entries()[2], entry(2));
}

#[test]
fn history_persists_across_loads() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());

    let mut history = HistoryStore::load(store.clone());
    history.record(entry(1)).expect("record");
    history.record(entry(2)).expect("record");

    let reloaded = HistoryStore::load(store);
    assert_eq!(reloaded.entries(), history.entries());
}

#[test]
fn corrupt_persisted_history_starts_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set("history", "not json at all").expect("seed");

    let history = HistoryStore::load(store);
    assert!(history.is_empty());
}

#[test]
fn missing_history_starts_empty() {
    let history = HistoryStore::load(Arc::new(MemoryStore::new()));
    assert!(history.is_empty());
}

#[test]
fn clear_persists_the_empty_state() {
    let store = Arc::new(MemoryStore::new());
    let mut history = HistoryStore::load(store.clone());
    history.record(entry(1)).expect("record");

    history.clear().expect("clear");

    assert!(history.is_empty());
    assert_eq!(store.get("history").expect("get").as_deref(), Some("[]"));
}
