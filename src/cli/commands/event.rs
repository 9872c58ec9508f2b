use crate::cli::commands::{open_store, query_context};
use crate::cli::parser::{Commands, EventAction};
use crate::config::Config;
use crate::db::repository::ScoreStore;
use crate::errors::AppResult;
use crate::models::Entry;
use crate::models::validation::check_course;
use crate::ui::messages::{success, warning};
use crate::utils::colors::colorize_optional;
use crate::utils::date::{now_ts, parse_timestamp};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Event { action } = cmd else {
        return Ok(());
    };

    match action {
        EventAction::Add {
            course,
            lab,
            student,
            event_type,
            at,
            comment,
        } => {
            let timestamp = match at {
                Some(raw) => parse_timestamp(raw)?,
                None => now_ts(),
            };

            let mut entry = Entry::new(timestamp, event_type, course, lab, student);
            if let Some(c) = comment {
                entry = entry.with_comment(c);
            }
            entry.validate()?;

            let store = open_store(cfg)?;
            store.create_entry(&query_context(cfg), &entry)?;
            tracing::info!(%course, %lab, %student, %event_type, timestamp, "entry recorded");

            let target = format!("{course}/{lab}/{student}");
            store.audit("event", &target, &format!("{event_type} at {timestamp}"))?;

            success(format!(
                "Recorded '{}' for {} on {}/{} at {}",
                event_type, student, course, lab, timestamp
            ));
        }

        EventAction::List { course, event_type } => {
            check_course(course)?;
            let store = open_store(cfg)?;
            let ctx = query_context(cfg);
            let format = cfg.timestamp_format()?;

            let entries = match event_type {
                Some(t) => store.get_course_events_by_type(&ctx, course, t)?,
                None => store.list_entries(&ctx, course)?,
            };

            if entries.is_empty() {
                warning(format!("No events found for course '{course}'."));
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::left("student"),
                Column::left("lab"),
                Column::left("event"),
                Column::right("timestamp"),
                Column::left("when"),
                Column::left("comment"),
            ]);

            for e in &entries {
                table.add_row(vec![
                    e.student.clone(),
                    e.lab.clone(),
                    e.event_type.clone(),
                    e.timestamp.to_string(),
                    format.render(e.timestamp).unwrap_or_default(),
                    colorize_optional(e.comment.as_deref().unwrap_or("--")),
                ]);
            }

            print!("{}", table.render());
        }
    }

    Ok(())
}
