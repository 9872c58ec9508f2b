use crate::cli::commands::{open_store, query_context};
use crate::cli::parser::{Commands, OverrideAction};
use crate::config::Config;
use crate::db::repository::ScoreStore;
use crate::errors::AppResult;
use crate::models::ScoreOverride;
use crate::models::validation::check_course;
use crate::ui::messages::{success, warning};
use crate::utils::colors::{RESET, color_for_score, colorize_optional};
use crate::utils::table::{Column, Table};
use std::collections::BTreeMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Override { action } = cmd else {
        return Ok(());
    };

    match action {
        OverrideAction::Set {
            course,
            lab,
            student,
            score,
            reason,
        } => {
            let ov = ScoreOverride::new(course, lab, student, *score, reason);
            ov.validate()?;

            let store = open_store(cfg)?;
            let ctx = query_context(cfg);

            // the verb is read before the upsert; concurrent admins may both see "created"
            let existed = store
                .get_score_override(&ctx, course, lab, student)?
                .is_some();
            store.create_score_override(&ctx, &ov)?;

            let verb = if existed { "updated" } else { "created" };
            tracing::info!(%course, %lab, %student, verb, "score override saved");
            store.audit(
                "override",
                &format!("{course}/{lab}/{student}"),
                &format!("score {} ({})", ov.score, ov.reason),
            )?;

            success(format!(
                "Override {verb}: {student} gets {score} on {course}/{lab}"
            ));
        }

        OverrideAction::List { course } => {
            check_course(course)?;
            let store = open_store(cfg)?;
            let ctx = query_context(cfg);

            let overrides = store.list_course_score_overrides(&ctx, course)?;
            if overrides.is_empty() {
                warning(format!("No overrides for course '{course}'."));
                return Ok(());
            }

            let base_scores: BTreeMap<String, i64> = store
                .list_lab_scores(&ctx, course)?
                .into_iter()
                .map(|l| (l.lab, l.base_score))
                .collect();

            let mut table = Table::new(vec![
                Column::left("lab"),
                Column::left("student"),
                Column::right("score"),
                Column::right("base"),
                Column::left("reason"),
            ]);

            for ov in &overrides {
                let base = base_scores.get(&ov.lab).copied();
                let color = color_for_score(ov.score, base);
                table.add_row(vec![
                    ov.lab.clone(),
                    ov.student.clone(),
                    format!("{color}{}{RESET}", ov.score),
                    colorize_optional(&base.map(|b| b.to_string()).unwrap_or_else(|| "--".into())),
                    ov.reason.clone(),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
