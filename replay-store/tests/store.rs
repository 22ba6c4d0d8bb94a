use replay_store::{Record, ReplayStore, ReplayStoreError};

fn temp_store() -> (tempfile::TempDir, ReplayStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ReplayStore::open(dir.path().join("replay.db"), "episodes").expect("open store");
    (dir, store)
}

#[test]
fn insert_and_flush_then_refresh_makes_records_sampleable() {
    let (_dir, store) = temp_store();

    for seq in 0..5 {
        let record = Record::new(1, "worker-a", seq, 0.5, 1.0, vec![seq as u8]);
        store.insert(record, false).unwrap();
    }
    store.flush().unwrap();

    store.refresh_recent(100).unwrap();

    let mut sampler = store.sampler();
    let sampled = sampler.sample().unwrap();
    assert_eq!(sampled.game_id, 1);
    assert!(sampled.seq >= 0 && sampled.seq < 5);
}

#[test]
fn sampling_before_any_refresh_reports_empty() {
    let (_dir, store) = temp_store();
    let mut sampler = store.sampler();
    assert!(matches!(sampler.sample(), Err(ReplayStoreError::Empty)));
}

#[test]
fn insert_with_flush_true_writes_immediately() {
    let (_dir, store) = temp_store();
    let record = Record::new(7, "worker-b", 0, 0.1, -1.0, b"hello".to_vec());
    store.insert(record, true).unwrap();

    store.refresh_recent(10).unwrap();
    let mut sampler = store.sampler();
    let sampled = sampler.sample().unwrap();
    assert_eq!(sampled.game_id, 7);
    assert_eq!(sampled.content, b"hello");
}

#[test]
fn zero_timestamp_is_stamped_with_current_time() {
    let (_dir, store) = temp_store();
    let record = Record::new(3, "worker-c", 0, 0.0, 0.0, Vec::new());
    assert_eq!(record.timestamp, 0);
    store.insert(record, true).unwrap();

    store.refresh_recent(10).unwrap();
    let mut sampler = store.sampler();
    let sampled = sampler.sample().unwrap();
    assert!(sampled.timestamp > 0);
}
