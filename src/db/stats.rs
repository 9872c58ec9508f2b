use crate::db::context::QueryContext;
use crate::db::pool::SqliteStore;
use crate::errors::StoreResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::date::format_deadline;
use std::fs;

/// Row counts and time span of a database file.
#[derive(Debug, Clone, Default)]
pub struct DbInfo {
    pub entries: i64,
    pub courses: i64,
    pub students: i64,
    pub lab_scores: i64,
    pub overrides: i64,
    pub first_event: Option<i64>,
    pub last_event: Option<i64>,
}

pub fn collect_db_info(store: &SqliteStore, ctx: &QueryContext) -> StoreResult<DbInfo> {
    store.with_conn(ctx, "collect database info", |conn| {
        let (entries, courses, students, first_event, last_event): (
            i64,
            i64,
            i64,
            Option<i64>,
            Option<i64>,
        ) = conn.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT course), COUNT(DISTINCT student),
                    MIN(timestamp), MAX(timestamp)
             FROM entries",
            [],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        )?;

        let lab_scores: i64 = conn.query_row("SELECT COUNT(*) FROM lab_scores", [], |row| row.get(0))?;
        let overrides: i64 =
            conn.query_row("SELECT COUNT(*) FROM score_overrides", [], |row| row.get(0))?;

        Ok(DbInfo {
            entries,
            courses,
            students,
            lab_scores,
            overrides,
            first_event,
            last_event,
        })
    })
}

pub fn print_db_info(info: &DbInfo, db_path: &str) {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);
    println!(
        "{}• Entries:{} {}{}{} ({} courses, {} students)",
        CYAN, RESET, GREEN, info.entries, RESET, info.courses, info.students
    );
    println!("{}• Lab scores:{} {}", CYAN, RESET, info.lab_scores);
    println!("{}• Overrides:{} {}", CYAN, RESET, info.overrides);

    let fmt = |ts: Option<i64>| {
        ts.map(format_deadline)
            .unwrap_or_else(|| format!("{GREY}--{RESET}"))
    };

    println!("{}• Event range:{}", CYAN, RESET);
    println!("    from: {}", fmt(info.first_event));
    println!("    to:   {}", fmt(info.last_event));
    println!();
}
