//! Navigation history persistence across session reopenings.

use shellpilot_core::storage::SessionStorage;
use shellpilot_core::{FileSessionStorage, HISTORY_STORAGE_KEY, NavigationHistory};
use tempfile::TempDir;

fn open(temp_dir: &TempDir, session_id: &str) -> NavigationHistory {
    let storage = FileSessionStorage::open(temp_dir.path(), session_id).unwrap();
    NavigationHistory::restore(Box::new(storage))
}

#[test]
fn test_history_round_trips_through_storage() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = vec![
        "ls -la".to_string(),
        "  padded  ".to_string(),
        "echo \"quoted\" && echo 'single'".to_string(),
        "ls -la".to_string(),
        "unicode → ✓".to_string(),
        "multi\nline".to_string(),
    ];

    let mut history = open(&temp_dir, "roundtrip");
    for input in &inputs {
        history.append(input.clone());
    }
    drop(history);

    let restored = open(&temp_dir, "roundtrip");
    assert_eq!(restored.items().map(str::to_string).collect::<Vec<_>>(), inputs);
}

#[test]
fn test_full_history_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let mut history = open(&temp_dir, "full");
    for i in 0..150 {
        history.append(format!("command {}", i));
    }
    let before: Vec<String> = history.items().map(str::to_string).collect();
    assert_eq!(before.len(), 100);
    assert_eq!(before[0], "command 50");
    drop(history);

    let restored = open(&temp_dir, "full");
    assert_eq!(restored.items().map(str::to_string).collect::<Vec<_>>(), before);
}

#[test]
fn test_clear_removes_persisted_copy() {
    let temp_dir = TempDir::new().unwrap();
    let mut history = open(&temp_dir, "cleared");
    history.append("ls");
    history.clear();
    drop(history);

    let storage = FileSessionStorage::open(temp_dir.path(), "cleared").unwrap();
    assert_eq!(storage.get(HISTORY_STORAGE_KEY).unwrap(), None);
    assert!(open(&temp_dir, "cleared").is_empty());
}

#[test]
fn test_corrupt_file_degrades_to_empty_history() {
    let temp_dir = TempDir::new().unwrap();
    let mut storage = FileSessionStorage::open(temp_dir.path(), "corrupt").unwrap();
    storage.set(HISTORY_STORAGE_KEY, "[\"ls\", 42").unwrap();

    let mut history = open(&temp_dir, "corrupt");
    assert!(history.is_empty());

    // The next append overwrites the corrupt copy
    history.append("pwd");
    drop(history);
    assert_eq!(open(&temp_dir, "corrupt").items().collect::<Vec<_>>(), vec!["pwd"]);
}
