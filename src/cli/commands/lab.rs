use crate::cli::commands::{open_store, query_context};
use crate::cli::parser::{Commands, LabAction};
use crate::config::Config;
use crate::db::repository::ScoreStore;
use crate::errors::AppResult;
use crate::models::LabScore;
use crate::models::validation::check_course;
use crate::ui::messages::{success, warning};
use crate::utils::date::{format_deadline, parse_deadline};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Lab { action } = cmd else {
        return Ok(());
    };

    match action {
        LabAction::Add {
            course,
            lab,
            score,
            deadline,
        } => {
            let lab_score = LabScore::new(course, lab, *score, parse_deadline(deadline)?);
            lab_score.validate()?;

            let store = open_store(cfg)?;
            let ctx = query_context(cfg);

            // the verb is read before the upsert; concurrent admins may both see "created"
            let existed = store.get_lab_score(&ctx, course, lab)?.is_some();
            store.create_lab_score(&ctx, &lab_score)?;

            let verb = if existed { "updated" } else { "created" };
            let message = format!(
                "base score {}, deadline {}",
                lab_score.base_score,
                format_deadline(lab_score.deadline)
            );
            tracing::info!(%course, %lab, verb, "lab score saved");
            store.audit("lab", &format!("{course}/{lab}"), &message)?;

            success(format!("Lab {course}/{lab} {verb}: {message}"));
        }

        LabAction::List { course } => {
            check_course(course)?;
            let store = open_store(cfg)?;
            let labs = store.list_lab_scores(&query_context(cfg), course)?;

            if labs.is_empty() {
                warning(format!("No labs configured for course '{course}'."));
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::left("lab"),
                Column::right("base score"),
                Column::left("deadline (UTC)"),
            ]);
            for l in &labs {
                table.add_row(vec![
                    l.lab.clone(),
                    l.base_score.to_string(),
                    format_deadline(l.deadline),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
