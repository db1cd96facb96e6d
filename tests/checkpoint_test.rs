use stroller_scout::config::constants::CHECKPOINT_FILE;
use stroller_scout::persistence::{CheckpointStore, SourceStatus};
use tempfile::TempDir;

// * Test Suite for checkpoint durability

#[test]
fn test_every_mark_is_durable() {
    let tmp = TempDir::new().unwrap();
    {
        let mut store = CheckpointStore::open(tmp.path()).unwrap();
        for i in 0..25 {
            store
                .mark_visited("Babyshop", &format!("https://www.babyshopstores.com/ae/en/p/{}", i))
                .unwrap();
        }
        // * Simulated crash: the store is dropped without any shutdown step
    }

    let reopened = CheckpointStore::open(tmp.path()).unwrap();
    assert_eq!(reopened.visited_count("Babyshop"), 25);
    assert!(reopened.is_visited("Babyshop", "https://www.babyshopstores.com/ae/en/p/24"));
}

#[test]
fn test_no_temp_file_left_behind() {
    let tmp = TempDir::new().unwrap();
    let mut store = CheckpointStore::open(tmp.path()).unwrap();
    store.mark_source_done("Ounass").unwrap();

    let names: Vec<String> = std::fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![CHECKPOINT_FILE.to_string()]);
}

#[test]
fn test_corrupt_file_loads_empty() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(CHECKPOINT_FILE), "{ not json").unwrap();

    let store = CheckpointStore::open(tmp.path()).unwrap();
    assert_eq!(store.visited_count("Mumzworld"), 0);
    assert_eq!(store.source_status("Mumzworld"), SourceStatus::NotStarted);
}

#[test]
fn test_status_transitions_persist() {
    let tmp = TempDir::new().unwrap();
    {
        let mut store = CheckpointStore::open(tmp.path()).unwrap();
        store.mark_source_failed("Ounass", "HTTP 403 Forbidden/Blocked").unwrap();
        store.mark_source_done("Babyshop").unwrap();
    }

    let store = CheckpointStore::open(tmp.path()).unwrap();
    assert_eq!(
        store.source_status("Ounass"),
        SourceStatus::Failed("HTTP 403 Forbidden/Blocked".to_string())
    );
    assert!(store.is_source_done("Babyshop"));
    assert!(!store.is_source_done("Ounass"));
}

#[test]
fn test_reset_clears_previous_run() {
    let tmp = TempDir::new().unwrap();
    let mut store = CheckpointStore::open(tmp.path()).unwrap();
    store.mark_visited("Babyshop", "https://x.ae/p/1").unwrap();
    store.mark_source_done("Babyshop").unwrap();
    store.reset().unwrap();

    let reopened = CheckpointStore::open(tmp.path()).unwrap();
    assert_eq!(reopened.visited_count("Babyshop"), 0);
    assert!(!reopened.is_source_done("Babyshop"));
}
