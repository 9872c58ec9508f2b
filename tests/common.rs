#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use labgrade::db::{QueryContext, ScoreStore};
use labgrade::models::{Entry, LabScore};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const START: &str = "000_lab_start";
pub const FINISH: &str = "100_lab_finish";

pub fn lg() -> Command {
    cargo_bin_cmd!("labgrade")
}

/// Command bound to `db_path` and to a config path that does not exist,
/// so the operator's own ~/.labgrade/labgrade.conf never leaks in.
pub fn lg_db(db_path: &str) -> Command {
    let mut cmd = lg();
    let config = missing_config(db_path);
    cmd.args(["--db", db_path, "--config", config.as_str()]);
    cmd
}

fn missing_config(db_path: &str) -> String {
    format!("{db_path}.missing.conf")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_labgrade.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_labgrade_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh, empty directory under the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("{}_labgrade_dir", name));
    fs::remove_dir_all(&dir).ok();
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// Initialize the DB and record a small course:
/// - lab L1 worth 10, due 2024-04-01 (23:59:59 UTC)
/// - alice.smith finishes on time, bob.jones two days late
pub fn init_db_with_data(db_path: &str) {
    lg_db(db_path).args(["--test", "init"]).assert().success();

    lg_db(db_path)
        .args(["lab", "add", "CS101", "L1", "--score", "10", "--deadline", "2024-04-01"])
        .assert()
        .success();

    for (student, event, at) in [
        ("alice.smith", START, "2024-03-30 10:00:00"),
        ("alice.smith", FINISH, "2024-04-01 12:00:00"),
        ("bob.jones", START, "2024-04-02 09:00:00"),
        ("bob.jones", FINISH, "2024-04-03 10:00:00"),
    ] {
        lg_db(db_path)
            .args(["event", "add", "CS101", "L1", student, event, "--at", at])
            .assert()
            .success();
    }
}

/// Same dataset as `init_db_with_data`, straight through the library API.
pub fn seed_store(store: &dyn ScoreStore) {
    let ctx = QueryContext::background();

    // 2024-04-01T23:59:59Z
    let deadline = 1_712_015_999;
    store
        .create_lab_score(&ctx, &LabScore::new("CS101", "L1", 10, deadline))
        .expect("lab score");

    for (student, event, ts) in [
        ("alice.smith", START, deadline - 2 * 86_400),
        ("alice.smith", FINISH, deadline - 3_600),
        ("bob.jones", START, deadline + 60),
        ("bob.jones", FINISH, deadline + 86_400 + 1),
    ] {
        store
            .create_entry(&ctx, &Entry::new(ts, event, "CS101", "L1", student))
            .expect("entry");
    }
}
