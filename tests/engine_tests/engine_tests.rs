//! Tests for Engine
//!
//! These tests verify:
//! - Ingest, query and delete through the facade
//! - Request defaults (today, page 1, default page size)
//! - Command execution
//! - Engine lifecycle (open, invalid config, sweeps)

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use daylog::config::Config;
use daylog::engine::Engine;
use daylog::partition;
use daylog::protocol::Command;
use daylog::{DaylogError, LogRecord, PageResult};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .default_page_size(10)
        .retain_days(7)
        .build();
    let engine = Engine::open(config).unwrap();
    (temp_dir, engine)
}

fn entry(message: &str) -> LogRecord {
    LogRecord::new(json!({
        "project": "shop",
        "level": "error",
        "message": message,
    }))
}

fn messages(page: &PageResult) -> Vec<String> {
    page.records
        .iter()
        .map(|r| r.get("message").and_then(|v| v.as_str()).unwrap().to_string())
        .collect()
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_engine_open_creates_data_dir() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("logs");

    let engine = Engine::open(Config::builder().data_dir(&data_dir).build()).unwrap();

    assert!(data_dir.is_dir());
    assert_eq!(engine.data_dir(), data_dir.as_path());
}

#[test]
fn test_engine_open_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .retain_days(0)
        .build();

    assert!(matches!(Engine::open(config), Err(DaylogError::Config(_))));
}

#[test]
fn test_engine_open_fails_when_data_dir_is_a_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("occupied");
    std::fs::write(&file, "x").unwrap();

    assert!(matches!(Engine::open_path(&file), Err(DaylogError::Io(_))));
}

// =============================================================================
// Ingest / Query Tests
// =============================================================================

#[test]
fn test_ingest_goes_to_today() {
    let (_temp, engine) = setup_temp_engine();

    engine.ingest(&entry("boom")).unwrap();

    assert!(engine.store().contains(partition::today()));
    let page = engine.query(None, None, None).unwrap();
    assert_eq!(messages(&page), vec!["boom"]);
}

#[test]
fn test_query_defaults() {
    let (_temp, engine) = setup_temp_engine();
    for i in 0..15 {
        engine.ingest(&entry(&format!("m{}", i))).unwrap();
    }

    let page = engine.query(None, None, None).unwrap();

    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 10);
    assert_eq!(page.len(), 10);
    assert!(page.has_next);
}

#[test]
fn test_query_clamps_zero_page_and_size() {
    let (_temp, engine) = setup_temp_engine();
    engine.ingest(&entry("only")).unwrap();

    let page = engine.query(None, Some(0), Some(0)).unwrap();

    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 10);
    assert_eq!(messages(&page), vec!["only"]);
}

#[test]
fn test_query_specific_date() {
    let (_temp, engine) = setup_temp_engine();
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

    engine.ingest_on(date, &entry("old")).unwrap();
    engine.ingest(&entry("new")).unwrap();

    let page = engine.query(Some(date), Some(1), Some(5)).unwrap();
    assert_eq!(messages(&page), vec!["old"]);
}

#[test]
fn test_query_missing_date_is_empty() {
    let (_temp, engine) = setup_temp_engine();
    let date = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();

    let page = engine.query(Some(date), None, None).unwrap();

    assert!(page.is_empty());
    assert_eq!(page.scanned_lines, 0);
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_line() {
    let (_temp, engine) = setup_temp_engine();
    for m in ["a", "b", "c"] {
        engine.ingest(&entry(m)).unwrap();
    }

    engine.delete(None, 2).unwrap();

    let page = engine.query(None, None, None).unwrap();
    assert_eq!(messages(&page), vec!["a", "c"]);
}

#[test]
fn test_delete_errors() {
    let (_temp, engine) = setup_temp_engine();
    let missing = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
    engine.ingest(&entry("a")).unwrap();

    assert!(matches!(
        engine.delete(Some(missing), 1),
        Err(DaylogError::NotFound { .. })
    ));
    assert!(matches!(
        engine.delete(None, 2),
        Err(DaylogError::OutOfRange { line: 2, total: 1 })
    ));
}

// =============================================================================
// Command Execution Tests
// =============================================================================

#[test]
fn test_execute_write_and_read() {
    let (_temp, engine) = setup_temp_engine();

    let result = engine
        .execute(Command::Write {
            record: br#"{"level":"warn","message":"slow query"}"#.to_vec(),
        })
        .unwrap();
    assert_eq!(result, None);

    let body = engine
        .execute(Command::Read {
            date: String::new(),
            page: 1,
            page_size: 10,
        })
        .unwrap()
        .unwrap();
    let page: PageResult = serde_json::from_slice(&body).unwrap();

    assert_eq!(messages(&page), vec!["slow query"]);
}

#[test]
fn test_execute_write_rejects_invalid_json() {
    let (_temp, engine) = setup_temp_engine();

    let result = engine.execute(Command::Write {
        record: b"{not json".to_vec(),
    });

    assert!(matches!(result, Err(DaylogError::Decoding(_))));
    assert!(!engine.store().contains(partition::today()));
}

#[test]
fn test_execute_read_with_explicit_date() {
    let (_temp, engine) = setup_temp_engine();
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    engine.ingest_on(date, &entry("dated")).unwrap();

    let body = engine
        .execute(Command::Read {
            date: "2024-05-01".to_string(),
            page: 1,
            page_size: 10,
        })
        .unwrap()
        .unwrap();
    let page: PageResult = serde_json::from_slice(&body).unwrap();

    assert_eq!(messages(&page), vec!["dated"]);
}

#[test]
fn test_execute_read_rejects_bad_date() {
    let (_temp, engine) = setup_temp_engine();

    let result = engine.execute(Command::Read {
        date: "05/01/2024".to_string(),
        page: 1,
        page_size: 10,
    });

    assert!(matches!(result, Err(DaylogError::InvalidDate(_))));
}

#[test]
fn test_execute_delete() {
    let (_temp, engine) = setup_temp_engine();
    engine.ingest(&entry("a")).unwrap();
    engine.ingest(&entry("b")).unwrap();

    engine
        .execute(Command::Delete {
            date: String::new(),
            line: 1,
        })
        .unwrap();

    let page = engine.query(None, None, None).unwrap();
    assert_eq!(messages(&page), vec!["b"]);
}

#[test]
fn test_execute_ping() {
    let (_temp, engine) = setup_temp_engine();
    assert_eq!(engine.execute(Command::Ping).unwrap(), Some(b"PONG".to_vec()));
}

// =============================================================================
// Retention Tests
// =============================================================================

#[test]
fn test_engine_sweep_uses_configured_horizon() {
    let (_temp, engine) = setup_temp_engine();
    let old = partition::today() - chrono::Duration::days(30);
    engine.ingest_on(old, &entry("stale")).unwrap();
    engine.ingest(&entry("fresh")).unwrap();

    let report = engine.sweep();

    assert_eq!(report.removed, vec![old]);
    assert_eq!(engine.store().partitions().unwrap(), vec![partition::today()]);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_ingest_through_engine() {
    let (_temp, engine) = setup_temp_engine();
    let engine = Arc::new(engine);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..25 {
                    engine.ingest(&entry(&format!("{}-{}", t, i))).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let page = engine.query(None, Some(1), Some(1000)).unwrap();
    assert_eq!(page.len(), 100);
}
