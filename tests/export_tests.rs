mod common;
use common::{FINISH, init_db_with_data, lg_db, seed_store, setup_test_db, temp_out};

use labgrade::db::{MemoryStore, QueryContext, ScoreStore};
use labgrade::export::ExportLogic;
use labgrade::export::SheetRow;
use labgrade::export::logic::SheetSelection;
use labgrade::models::{Entry, LabScore};
use std::fs;

fn row(student: &str, lab: &str, finished: bool, score: Option<i64>) -> SheetRow {
    SheetRow {
        student: student.to_string(),
        lab: lab.to_string(),
        finished,
        score,
    }
}

#[test]
fn test_sheet_covers_every_student_and_lab() {
    let store = MemoryStore::new(FINISH);
    seed_store(&store);
    let ctx = QueryContext::background();
    store
        .create_lab_score(&ctx, &LabScore::new("CS101", "L2", 20, 0))
        .unwrap();

    let rows = ExportLogic::build_sheet(&store, &ctx, "CS101", &SheetSelection::default()).unwrap();
    assert_eq!(
        rows,
        [
            row("alice.smith", "L1", true, Some(10)),
            row("alice.smith", "L2", false, None),
            row("bob.jones", "L1", true, Some(10)),
            row("bob.jones", "L2", false, None),
        ]
    );
}

#[test]
fn test_sheet_respects_selection_and_unconfigured_labs() {
    let store = MemoryStore::new(FINISH);
    seed_store(&store);
    let ctx = QueryContext::background();
    store
        .create_entry(&ctx, &Entry::new(5, FINISH, "CS101", "L7", "carol.white"))
        .unwrap();

    let selection = SheetSelection {
        students: vec!["carol.white".into(), "dan.gray".into()],
        labs: vec!["L7".into()],
    };
    let rows = ExportLogic::build_sheet(&store, &ctx, "CS101", &selection).unwrap();
    assert_eq!(
        rows,
        [
            row("carol.white", "L7", true, None),
            row("dan.gray", "L7", false, None),
        ]
    );
}

#[test]
fn test_export_csv_file() {
    let db_path = setup_test_db("export_csv");
    init_db_with_data(&db_path);
    let out = temp_out("export_csv", "csv");

    lg_db(&db_path)
        .args(["export", "CS101", "--format", "csv", "--file", &out])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read exported csv");
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("student,lab,finished,score"));
    assert_eq!(lines.next(), Some("alice.smith,L1,true,10"));
    assert_eq!(lines.next(), Some("bob.jones,L1,true,10"));
}

#[test]
fn test_export_json_for_selected_student() {
    let db_path = setup_test_db("export_json");
    init_db_with_data(&db_path);
    let out = temp_out("export_json", "json");

    lg_db(&db_path)
        .args([
            "export", "CS101", "--format", "json", "--file", &out, "--student", "bob.jones",
            "--student", "carol.white", "--force",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read exported json");
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            { "student": "bob.jones", "lab": "L1", "finished": true, "score": 10 },
            { "student": "carol.white", "lab": "L1", "finished": false, "score": null }
        ])
    );
}

#[test]
fn test_export_requires_absolute_path() {
    let db_path = setup_test_db("export_relative");
    init_db_with_data(&db_path);

    lg_db(&db_path)
        .args(["export", "CS101", "--file", "relative.csv"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("absolute"));
}

#[test]
fn test_export_existing_file_needs_force() {
    let db_path = setup_test_db("export_force");
    init_db_with_data(&db_path);
    let out = temp_out("export_force", "csv");
    fs::write(&out, "old").unwrap();

    // declining the prompt keeps the old file
    lg_db(&db_path)
        .args(["export", "CS101", "--file", &out])
        .write_stdin("n\n")
        .assert()
        .failure();
    assert_eq!(fs::read_to_string(&out).unwrap(), "old");

    lg_db(&db_path)
        .args(["export", "CS101", "--file", &out, "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(&out).unwrap().starts_with("student,"));
}
