use crate::cli::commands::{open_store, query_context};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::SqliteStore;
use crate::db::repository::ScoreStore;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        dir,
        check,
        info,
    } = cmd
    {
        //
        // 1) MIGRATE
        //
        if *migrate {
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            let store = SqliteStore::open(&cfg.database, cfg.events.finish.clone())?;
            let dir = dir.as_deref().map(expand_tilde).or_else(|| cfg.migrations_dir());
            store.apply_migrations(dir.as_deref())?;
            println!("{}✔ Migration completed.{}\n", GREEN, RESET);
        }

        if !*info && !*check {
            return Ok(());
        }

        let store = open_store(cfg)?;
        let ctx = query_context(cfg);

        //
        // 2) INFO
        //
        if *info {
            let db_info = stats::collect_db_info(&store, &ctx)?;
            stats::print_db_info(&db_info, store.path());
        }

        //
        // 3) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = store.with_conn(&ctx, "check integrity", |conn| {
                conn.query_row("PRAGMA integrity_check;", [], |row| row.get(0))
            })?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }
    }

    Ok(())
}
