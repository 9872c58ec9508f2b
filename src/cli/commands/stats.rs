use crate::cli::commands::{open_store, query_context};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::stats::StatsAggregator;
use crate::errors::AppResult;
use crate::models::validation::check_course;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Stats { course, human } = cmd else {
        return Ok(());
    };

    check_course(course)?;

    let store = open_store(cfg)?;
    let aggregator = StatsAggregator::new(
        &store,
        cfg.events.start.clone(),
        cfg.events.finish.clone(),
        cfg.timestamp_format()?,
    );

    let stats = aggregator.detailed_stats(&query_context(cfg), course, *human)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
