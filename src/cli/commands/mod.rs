pub mod config;
pub mod db;
pub mod event;
pub mod export;
pub mod init;
pub mod lab;
pub mod log;
pub mod overrides;
pub mod score;
pub mod stats;

use crate::config::Config;
use crate::db::context::QueryContext;
use crate::db::pool::SqliteStore;
use crate::db::repository::ScoreStore;
use crate::errors::AppResult;
use std::time::Duration;

/// Open the configured database and bring its schema up to date.
pub(crate) fn open_store(cfg: &Config) -> AppResult<SqliteStore> {
    let store = SqliteStore::open(&cfg.database, cfg.events.finish.clone())?;
    store.set_busy_timeout(Duration::from_millis(cfg.busy_timeout_ms))?;
    store.apply_migrations(cfg.migrations_dir().as_deref())?;
    Ok(store)
}

/// Per-command deadline taken from `query_timeout_ms`.
pub(crate) fn query_context(cfg: &Config) -> QueryContext {
    QueryContext::from_millis(cfg.query_timeout_ms)
}
