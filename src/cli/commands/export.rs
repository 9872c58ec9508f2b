use crate::cli::commands::{open_store, query_context};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::export::logic::SheetSelection;
use crate::models::validation::check_course;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        course,
        format,
        file,
        students,
        labs,
        force,
    } = cmd
    {
        check_course(course)?;
        let store = open_store(cfg)?;
        let selection = SheetSelection {
            students: students.clone(),
            labs: labs.clone(),
        };
        ExportLogic::export(
            &store,
            &query_context(cfg),
            course,
            &selection,
            *format,
            file,
            *force,
        )?;
    }
    Ok(())
}
