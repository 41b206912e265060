//! Allocator tests against the durable SQLite store.

use idmint::{Allocator, AllocatorConfig, Codec, CounterStore, Error, MemoryStore, SqliteStore};
use rusqlite::Connection;
use std::fs;

fn temp_config(name: &str) -> AllocatorConfig {
    let mut dir = std::env::temp_dir();
    dir.push(format!("idmint-tests-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir.push("identity.db");
    AllocatorConfig::default().with_db_path(dir.to_string_lossy().to_string())
}

fn cleanup(cfg: &AllocatorConfig) {
    if let Some(dir) = std::path::Path::new(&cfg.db_path).parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

fn stored_rows(cfg: &AllocatorConfig) -> Vec<String> {
    let conn = Connection::open(&cfg.db_path).expect("open db");
    let mut stmt = conn.prepare("SELECT code FROM id_counter").expect("prepare");
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .expect("query")
        .collect::<Result<Vec<_>, _>>()
        .expect("rows");
    rows
}

#[test]
fn test_concrete_scenario_persists_only_high_water() {
    let cfg = temp_config("scenario");
    let alloc = Allocator::open(&cfg).expect("open");

    let ids = alloc.allocate(3).expect("allocate 3");
    assert_eq!(ids, vec!["0000000", "0000001", "0000002"]);
    assert_eq!(stored_rows(&cfg), vec!["0000002"]);

    let ids = alloc.allocate(2).expect("allocate 2");
    assert_eq!(ids, vec!["0000003", "0000004"]);
    assert_eq!(stored_rows(&cfg), vec!["0000004"]);
    cleanup(&cfg);
}

#[test]
fn test_single_row_regardless_of_volume() {
    let cfg = temp_config("single-row");
    let alloc = Allocator::open(&cfg).expect("open");
    for n in 1..=50 {
        alloc.allocate(n).expect("allocate");
    }
    // 1 + 2 + ... + 50 = 1275 identifiers issued.
    let rows = stored_rows(&cfg);
    assert_eq!(rows.len(), 1);
    assert_eq!(Codec::default().decode(&rows[0]).unwrap().get(), 1274);
    cleanup(&cfg);
}

#[test]
fn test_no_duplication_across_restart() {
    let cfg = temp_config("restart");
    let codec = Codec::default();

    let first = {
        let alloc = Allocator::open(&cfg).expect("open");
        alloc.allocate(37).expect("first batch")
    };
    // Dropped: nothing carried over but the file.
    let second = {
        let alloc = Allocator::open(&cfg).expect("reopen");
        alloc.allocate(11).expect("second batch")
    };

    let max_first = codec.decode(first.last().unwrap().as_str()).unwrap();
    let min_second = codec.decode(second[0].as_str()).unwrap();
    assert_eq!(min_second.get(), max_first.get() + 1);
    assert!(second.iter().all(|id| !first.contains(id)));
    cleanup(&cfg);
}

#[test]
fn test_exhaustion_boundary_leaves_row_unchanged() {
    let cfg = temp_config("exhaustion");
    let alloc = Allocator::open(&cfg).expect("open");
    let codec = alloc.codec().clone();
    assert_eq!(codec.space(), 52_523_350_144);

    // Seed the row five short of the end of the space.
    let near_end = codec.encode(idmint::Ordinal::new(codec.space() - 6));
    {
        let conn = Connection::open(&cfg.db_path).unwrap();
        conn.execute(
            "INSERT INTO id_counter (slot, code) VALUES (0, ?1)",
            [near_end.as_str()],
        )
        .unwrap();
    }
    assert_eq!(alloc.remaining().unwrap(), 5);

    // Batch that makes the high-water exactly B^7 - 1 succeeds.
    let last = alloc.allocate(5).expect("reach the end");
    assert_eq!(last.last().unwrap(), "ZZZZZZZ");
    assert_eq!(stored_rows(&cfg), vec!["ZZZZZZZ"]);

    // One more fails and changes nothing.
    let err = alloc.generate().unwrap_err();
    assert_eq!(
        err,
        Error::SpaceExhausted {
            requested: 1,
            remaining: 0
        }
    );
    assert_eq!(stored_rows(&cfg), vec!["ZZZZZZZ"]);
    cleanup(&cfg);
}

#[test]
fn test_oversized_request_fails_before_store_write() {
    let cfg = temp_config("oversized");
    let alloc = Allocator::open(&cfg).expect("open");
    let too_many = usize::try_from(alloc.codec().space() + 1).unwrap();
    assert!(matches!(
        alloc.allocate(too_many),
        Err(Error::SpaceExhausted { .. })
    ));
    assert!(stored_rows(&cfg).is_empty());
    cleanup(&cfg);
}

#[test]
fn test_zero_batch_is_rejected() {
    let cfg = temp_config("zero");
    let alloc = Allocator::open(&cfg).expect("open");
    assert!(matches!(alloc.allocate(0), Err(Error::InvalidRequest(_))));
    assert!(matches!(
        alloc.generate_bulk(0),
        Err(Error::InvalidRequest(_))
    ));
    assert!(stored_rows(&cfg).is_empty());
    cleanup(&cfg);
}

#[test]
fn test_corrupt_row_is_surfaced_not_reset() {
    let cfg = temp_config("corrupt");
    let alloc = Allocator::open(&cfg).expect("open");
    {
        let conn = Connection::open(&cfg.db_path).unwrap();
        conn.execute(
            "INSERT INTO id_counter (slot, code) VALUES (0, '00I0000')",
            [],
        )
        .unwrap();
    }
    let err = alloc.allocate(4).unwrap_err();
    assert_eq!(err, Error::InvalidCharacter { ch: 'I', position: 2 });
    assert!(!err.is_retryable());
    assert_eq!(stored_rows(&cfg), vec!["00I0000"]);
    cleanup(&cfg);
}

#[test]
fn test_bulk_of_one_matches_generate() {
    let a = temp_config("bulk-a");
    let b = temp_config("bulk-b");
    let alloc_a = Allocator::open(&a).unwrap();
    let alloc_b = Allocator::open(&b).unwrap();
    alloc_a.allocate(12).unwrap();
    alloc_b.allocate(12).unwrap();

    let bulk = alloc_a.generate_bulk(1).unwrap();
    let single = alloc_b.generate().unwrap();
    assert_eq!(bulk, vec![single]);
    assert_eq!(stored_rows(&a), stored_rows(&b));
    cleanup(&a);
    cleanup(&b);
}

#[test]
fn test_lock_timeout_is_store_unavailable_and_retryable() {
    let mut cfg = temp_config("locked");
    cfg.busy_timeout_ms = 50;
    let alloc = Allocator::open(&cfg).expect("open");
    alloc.allocate(2).unwrap();

    // Another connection holds the write lock.
    let blocker = Connection::open(&cfg.db_path).unwrap();
    blocker.execute_batch("BEGIN IMMEDIATE").unwrap();

    let err = alloc.allocate(3).unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable(_)), "{err:?}");
    assert!(err.is_retryable());

    blocker.execute_batch("ROLLBACK").unwrap();
    assert_eq!(stored_rows(&cfg), vec!["0000001"]);

    // The retry gets the batch the failed call would have had.
    assert_eq!(
        alloc.allocate(3).unwrap(),
        vec!["0000002", "0000003", "0000004"]
    );
    drop(blocker);
    cleanup(&cfg);
}

#[test]
fn test_memory_and_sqlite_backends_agree() {
    let cfg = temp_config("agree");
    let durable = Allocator::open(&cfg).unwrap();
    let memory = Allocator::new(MemoryStore::new(), Codec::default());
    for n in [1, 7, 34, 2, 100] {
        assert_eq!(durable.allocate(n).unwrap(), memory.allocate(n).unwrap());
    }
    assert_eq!(durable.high_water().unwrap(), memory.high_water().unwrap());
    cleanup(&cfg);
}

#[test]
fn test_store_load_matches_high_water() {
    let cfg = temp_config("load");
    let store = SqliteStore::open(&cfg).unwrap();
    assert_eq!(store.load().unwrap(), None);
    let alloc = Allocator::new(store, Codec::default());
    alloc.allocate(35).unwrap();
    assert_eq!(alloc.high_water().unwrap().unwrap(), "0000010");
    cleanup(&cfg);
}

#[test]
fn test_reordered_alphabet_cannot_reopen_store() {
    let cfg = temp_config("reordered");
    let issued = Allocator::open(&cfg).expect("open").allocate(172).expect("allocate");
    assert_eq!(issued.last().unwrap(), "0000051");

    // Same width, digits shuffled: the stored row would decode lower.
    let reordered = AllocatorConfig {
        alphabet: "0534216789ABCDEFGHJKLMNPQRSTUVWXYZ".to_string(),
        ..cfg.clone()
    };
    assert!(matches!(
        Allocator::open(&reordered),
        Err(Error::InvalidAlphabet(_))
    ));
    assert_eq!(stored_rows(&cfg), vec!["0000051"]);

    // The environment cannot swap the codec either.
    let next = Allocator::open(&AllocatorConfig::from_env().with_db_path(cfg.db_path.clone()))
        .expect("reopen")
        .allocate(30)
        .expect("allocate");
    assert!(next.iter().all(|id| !issued.contains(id)));
    assert_eq!(next[0], "0000052");
    cleanup(&cfg);
}
