use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{FINISH, init_db_with_data, lg, lg_db, setup_test_db, temp_dir};
use std::fs;

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("cli_init");

    lg_db(&db_path)
        .args(["--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_help_lists_commands() {
    lg().arg("--help")
        .assert()
        .success()
        .stdout(contains("score").and(contains("stats")).and(contains("override")));
}

#[test]
fn test_lab_add_reports_created_then_updated() {
    let db_path = setup_test_db("cli_lab_upsert");
    lg_db(&db_path).args(["--test", "init"]).assert().success();

    lg_db(&db_path)
        .args(["lab", "add", "CS101", "L1", "--score", "10", "--deadline", "2024-04-01"])
        .assert()
        .success()
        .stdout(contains("created"));

    lg_db(&db_path)
        .args(["lab", "add", "CS101", "L1", "--score", "12", "--deadline", "2024-04-02T12:00:00"])
        .assert()
        .success()
        .stdout(contains("updated"));

    lg_db(&db_path)
        .args(["lab", "list", "CS101"])
        .assert()
        .success()
        .stdout(contains("12").and(contains("2024-Apr-02 Tue 12:00")));
}

#[test]
fn test_date_only_deadline_closes_at_end_of_day() {
    let db_path = setup_test_db("cli_deadline_eod");
    lg_db(&db_path).args(["--test", "init"]).assert().success();

    lg_db(&db_path)
        .args(["lab", "add", "CS101", "L1", "--score", "10", "--deadline", "2024-04-01"])
        .assert()
        .success();

    lg_db(&db_path)
        .args(["lab", "list", "CS101"])
        .assert()
        .success()
        .stdout(contains("2024-Apr-01 Mon 23:59"));
}

#[test]
fn test_score_single_student() {
    let db_path = setup_test_db("cli_score_single");
    init_db_with_data(&db_path);

    lg_db(&db_path)
        .args(["score", "CS101", "--lab", "L1", "--student", "alice.smith"])
        .assert()
        .success()
        .stdout("10\n");

    // two days late with the default modifier table
    lg_db(&db_path)
        .args(["score", "CS101", "--lab", "L1", "--student", "bob.jones"])
        .assert()
        .success()
        .stdout("8\n");

    lg_db(&db_path)
        .args(["score", "CS101", "--lab", "L1", "--student", "carol.white"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_score_whole_course_as_json() {
    let db_path = setup_test_db("cli_score_course");
    init_db_with_data(&db_path);

    let out = lg_db(&db_path)
        .args(["score", "CS101"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).expect("json output");
    assert_eq!(value["alice.smith"]["L1"], 10);
    assert_eq!(value["bob.jones"]["L1"], 8);
}

#[test]
fn test_override_takes_precedence() {
    let db_path = setup_test_db("cli_override");
    init_db_with_data(&db_path);

    lg_db(&db_path)
        .args(["override", "set", "CS101", "L1", "bob.jones", "--score", "10", "--reason", "medical"])
        .assert()
        .success()
        .stdout(contains("created"));

    lg_db(&db_path)
        .args(["override", "set", "CS101", "L1", "bob.jones", "--score", "9", "--reason", "medical"])
        .assert()
        .success()
        .stdout(contains("updated"));

    lg_db(&db_path)
        .args(["score", "CS101", "--lab", "L1", "--student", "bob.jones"])
        .assert()
        .success()
        .stdout("9\n");

    lg_db(&db_path)
        .args(["override", "list", "CS101"])
        .assert()
        .success()
        .stdout(contains("bob.jones").and(contains("medical")));
}

#[test]
fn test_event_list_filters_by_type() {
    let db_path = setup_test_db("cli_event_list");
    init_db_with_data(&db_path);

    lg_db(&db_path)
        .args(["event", "list", "CS101", "--type", FINISH])
        .assert()
        .success()
        .stdout(contains("alice.smith").and(contains("000_lab_start").not()));

    lg_db(&db_path)
        .args(["event", "list", "CS101"])
        .assert()
        .success()
        .stdout(contains("000_lab_start").and(contains("2024-04-01 12:00:00")));
}

#[test]
fn test_stats_human_output() {
    let db_path = setup_test_db("cli_stats");
    init_db_with_data(&db_path);

    let out = lg_db(&db_path)
        .args(["stats", "CS101", "--human"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).expect("json output");
    let alice = &value["alice.smith"]["CS101/L1"];
    assert_eq!(alice["start_counts"], 1);
    assert_eq!(alice["human_dttms"]["first_run"], "2024-03-30 10:00:00");
    assert_eq!(alice["human_dttms"]["delta_first_run_first_finish"], "2d2h0m");
}

#[test]
fn test_invalid_student_is_rejected() {
    let db_path = setup_test_db("cli_invalid_student");
    lg_db(&db_path).args(["--test", "init"]).assert().success();

    lg_db(&db_path)
        .args(["event", "add", "CS101", "L1", "bob", FINISH])
        .assert()
        .failure()
        .stderr(contains("firstname.lastname"));

    lg_db(&db_path)
        .args(["event", "add", "CS101", "LAB12", "bob.jones", FINISH])
        .assert()
        .failure()
        .stderr(contains("lab code"));
}

#[test]
fn test_invalid_timestamp_is_rejected() {
    let db_path = setup_test_db("cli_invalid_ts");
    lg_db(&db_path).args(["--test", "init"]).assert().success();

    lg_db(&db_path)
        .args(["event", "add", "CS101", "L1", "bob.jones", FINISH, "--at", "yesterday"])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));
}

#[test]
fn test_db_info_and_check() {
    let db_path = setup_test_db("cli_db_info");
    init_db_with_data(&db_path);

    lg_db(&db_path)
        .args(["db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("Entries:").and(contains("Integrity check passed")));
}

#[test]
fn test_db_migrate_with_extra_directory() {
    let db_path = setup_test_db("cli_db_migrate_dir");
    let dir = temp_dir("cli_db_migrate_dir");
    fs::write(dir.join("0001_notes.sql"), "CREATE TABLE notes (body TEXT);").unwrap();

    lg_db(&db_path)
        .args(["db", "--migrate", "--dir", dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Migration completed"));

    lg_db(&db_path)
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied").and(contains("0001_notes")));
}

#[test]
fn test_log_records_admin_mutations() {
    let db_path = setup_test_db("cli_log");
    init_db_with_data(&db_path);

    lg_db(&db_path)
        .args(["log", "--print", "--limit", "200"])
        .assert()
        .success()
        .stdout(contains("CS101/L1").and(contains("init")));
}

#[test]
fn test_config_check_reports_missing_fields() {
    let dir = temp_dir("cli_config_check");
    let conf = dir.join("labgrade.conf");
    fs::write(&conf, "query_timeout_ms: 100\n").unwrap();

    lg().args(["--config", conf.to_str().unwrap(), "config", "--check"])
        .assert()
        .success()
        .stdout(contains("Missing fields").and(contains("scoring")));

    lg().args(["--config", conf.to_str().unwrap(), "config", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Added missing fields"));

    lg().args(["--config", conf.to_str().unwrap(), "config", "--check"])
        .assert()
        .success()
        .stdout(contains("No missing fields"));

    let content = fs::read_to_string(&conf).unwrap();
    assert!(content.contains("query_timeout_ms: 100"));
}

#[test]
fn test_invalid_config_blocks_commands() {
    let dir = temp_dir("cli_config_invalid");
    let conf = dir.join("labgrade.conf");
    fs::write(&conf, "scoring:\n  default_late_penalty: 1.5\n").unwrap();
    let db_path = setup_test_db("cli_config_invalid");

    lg().args(["--db", &db_path, "--config", conf.to_str().unwrap(), "lab", "list", "CS101"])
        .assert()
        .failure()
        .stderr(contains("default_late_penalty"));
}

#[test]
fn test_relative_db_lives_in_config_dir_for_every_command() {
    let home = temp_dir("cli_relative_db_home");
    let work = temp_dir("cli_relative_db_work");
    let conf = home.join("absent.conf");
    let conf = conf.to_str().unwrap();

    lg().env("HOME", &home)
        .current_dir(&work)
        .args(["--db", "rel.sqlite", "--config", conf, "--test", "init"])
        .assert()
        .success();

    lg().env("HOME", &home)
        .current_dir(&work)
        .args(["--db", "rel.sqlite", "--config", conf])
        .args(["lab", "add", "CS101", "L1", "--score", "10", "--deadline", "2024-04-01"])
        .assert()
        .success()
        .stdout(contains("created"));

    assert!(home.join(".labgrade").join("rel.sqlite").exists());
    assert!(!work.join("rel.sqlite").exists());
}
