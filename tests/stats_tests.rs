mod common;
use common::{FINISH, START};

use labgrade::core::StatsAggregator;
use labgrade::db::{MemoryStore, QueryContext, ScoreStore, SqliteStore};
use labgrade::models::Entry;
use labgrade::utils::time::{TimestampFormat, format_duration};
use serde_json::json;

fn seed(store: &dyn ScoreStore) {
    let ctx = QueryContext::background();
    for (ts, kind, lab, student) in [
        (1_000, START, "L1", "alice.smith"),
        (900, START, "L1", "alice.smith"),
        (5_000, FINISH, "L1", "alice.smith"),
        (4_000, FINISH, "L1", "alice.smith"),
        (2_000, START, "L1", "bob.jones"),
        (7_000, FINISH, "L2", "carol.white"),
        (10_000, START, "L1", "dave.brown"),
        (9_000, FINISH, "L1", "dave.brown"),
        (50, "998_ping", "L1", "alice.smith"),
    ] {
        store
            .create_entry(&ctx, &Entry::new(ts, kind, "CS101", lab, student))
            .unwrap();
    }
    store
        .create_entry(&ctx, &Entry::new(1, START, "OTHER", "L1", "alice.smith"))
        .unwrap();
}

fn check_rows(store: &dyn ScoreStore) {
    seed(store);
    let agg = StatsAggregator::new(store, START, FINISH, TimestampFormat::default());
    let rows = agg.rows(&QueryContext::background(), "CS101", false).unwrap();

    let keys: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.student.as_str(), r.lab.as_str()))
        .collect();
    // carol only finished, so she has no row
    assert_eq!(
        keys,
        [("alice.smith", "L1"), ("bob.jones", "L1"), ("dave.brown", "L1")]
    );

    assert_eq!(rows[0].start_count, 2);
    assert_eq!(rows[0].first_run, 900);
    assert_eq!(rows[0].first_finish, Some(4_000));
    assert_eq!(rows[0].delta_seconds, Some(3_100));
    assert!(rows[0].human_first_run.is_none());

    assert_eq!(rows[1].first_finish, None);
    assert_eq!(rows[1].delta_seconds, None);

    // finished before the first start: the negative span is kept
    assert_eq!(rows[2].delta_seconds, Some(-1_000));
}

#[test]
fn test_stat_rows_memory_store() {
    check_rows(&MemoryStore::new(FINISH));
}

#[test]
fn test_stat_rows_sqlite_store() {
    let store = SqliteStore::open_in_memory(FINISH).unwrap();
    store.apply_migrations(None).unwrap();
    check_rows(&store);
}

#[test]
fn test_empty_course_gives_empty_stats() {
    let store = MemoryStore::new(FINISH);
    let agg = StatsAggregator::new(&store, START, FINISH, TimestampFormat::default());
    let stats = agg
        .detailed_stats(&QueryContext::background(), "CS101", true)
        .unwrap();
    assert!(stats.is_empty());
}

#[test]
fn test_detailed_stats_json_shape() {
    let store = SqliteStore::open_in_memory(FINISH).unwrap();
    store.apply_migrations(None).unwrap();
    seed(&store);

    let agg = StatsAggregator::new(&store, START, FINISH, TimestampFormat::default());
    let stats = agg
        .detailed_stats(&QueryContext::background(), "CS101", false)
        .unwrap();

    let value = serde_json::to_value(&stats).unwrap();
    assert_eq!(
        value["alice.smith"]["CS101/L1"],
        json!({
            "start_counts": 2,
            "first_run": 900,
            "first_finish": 4000,
            "delta_first_run_first_finish": 3100
        })
    );
    assert_eq!(
        value["bob.jones"]["CS101/L1"],
        json!({ "start_counts": 1, "first_run": 2000 })
    );
}

#[test]
fn test_human_rendering_uses_format_and_offset() {
    let store = MemoryStore::new(FINISH);
    seed(&store);

    let format = TimestampFormat::new("%Y-%m-%d %H:%M", "+02:00").unwrap();
    let agg = StatsAggregator::new(&store, START, FINISH, format);
    let stats = agg
        .detailed_stats(&QueryContext::background(), "CS101", true)
        .unwrap();

    let alice = &stats["alice.smith"]["CS101/L1"];
    let human = alice.human_dttms.as_ref().expect("human block");
    assert_eq!(human.first_run.as_deref(), Some("1970-01-01 02:15"));
    assert_eq!(human.first_finish.as_deref(), Some("1970-01-01 03:06"));
    assert_eq!(human.delta_first_run_first_finish.as_deref(), Some("0h51m"));

    let dave = &stats["dave.brown"]["CS101/L1"];
    let human = dave.human_dttms.as_ref().expect("human block");
    assert_eq!(human.delta_first_run_first_finish.as_deref(), Some("-0h16m"));

    let bob = serde_json::to_value(&stats["bob.jones"]["CS101/L1"]).unwrap();
    assert_eq!(bob["human_dttms"], json!({ "first_run": "1970-01-01 02:33" }));
}

#[test]
fn test_compact_duration_format() {
    assert_eq!(format_duration(0), "0h0m");
    assert_eq!(format_duration(59), "0h0m");
    assert_eq!(format_duration(3_660), "1h1m");
    assert_eq!(format_duration(86_400 + 2 * 3_600 + 5 * 60), "1d2h5m");
    assert_eq!(format_duration(-(2 * 86_400)), "-2d0h0m");
}

#[test]
fn test_invalid_display_settings_are_rejected() {
    assert!(TimestampFormat::new("%Y-%m-%d %Q", "+00:00").is_err());
    assert!(TimestampFormat::new("%Y", "+25:00").is_err());
    assert!(TimestampFormat::new("%Y", "0200").is_err());
    assert!(TimestampFormat::new("%Y", "Z").is_ok());
    assert!(TimestampFormat::new("%Y", "-0530").is_ok());
}
