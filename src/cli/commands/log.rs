use crate::cli::commands::{open_store, query_context};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::{RESET, color_for_operation};
use crate::utils::formatting::truncate;
use crate::utils::table::{Column, Table};

const MAX_TARGET_WIDTH: usize = 40;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log { print: true, limit } = cmd else {
        return Ok(());
    };

    let store = open_store(cfg)?;
    let rows = store.with_conn(&query_context(cfg), "load audit log", |conn| {
        log::load_log(conn, *limit)
    })?;

    if rows.is_empty() {
        info("The internal log is empty.");
        return Ok(());
    }

    println!("📜 Internal log:\n");

    let mut table = Table::new(vec![
        Column::left("date"),
        Column::left("operation"),
        Column::left("target"),
        Column::left("message"),
    ]);

    // oldest first, like a journal
    for (date, operation, target, message) in rows.into_iter().rev() {
        let date = chrono::DateTime::parse_from_rfc3339(&date)
            .map(|dt| dt.format("%FT%T%:z").to_string())
            .unwrap_or(date);
        let color = color_for_operation(&operation);
        table.add_row(vec![
            date,
            format!("{color}{operation}{RESET}"),
            truncate(&target, MAX_TARGET_WIDTH),
            message,
        ]);
    }

    print!("{}", table.render());
    Ok(())
}
