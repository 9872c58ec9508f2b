use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::pool::SqliteStore;
use crate::db::repository::ScoreStore;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::path::Path;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let config_path = cli.config.as_deref().map(Path::new);
    let cfg = Config::init_all(config_path, cli.db.as_deref(), cli.test)?;

    let shown_config = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_file);

    println!("⚙️  Initializing labgrade…");
    if !cli.test {
        println!("📄 Config file : {}", shown_config.display());
    }
    println!("🗄️  Database   : {}", &cfg.database);

    let store = SqliteStore::open(&cfg.database, cfg.events.finish.clone())?;
    store.apply_migrations(cfg.migrations_dir().as_deref())?;

    success(format!("Database initialized at {}", &cfg.database));

    // the audit line is best effort
    if let Err(e) = store.audit(
        "init",
        "",
        &format!("Database initialized at {}", &cfg.database),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    Ok(())
}
