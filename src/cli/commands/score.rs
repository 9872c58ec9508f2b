use crate::cli::commands::{open_store, query_context};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::grader::Grader;
use crate::core::scoring::course_scores;
use crate::errors::AppResult;
use crate::models::validation::{check_course, check_lab, check_student};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Score {
        course,
        lab,
        student,
    } = cmd
    else {
        return Ok(());
    };

    check_course(course)?;

    let store = open_store(cfg)?;
    let ctx = query_context(cfg);
    let grader = Grader::new(&store, &cfg.scoring);

    match (lab, student) {
        (Some(lab), Some(student)) => {
            check_lab(lab)?;
            check_student(student)?;
            let score = grader.score_for_student(&ctx, course, lab, student)?;
            println!("{score}");
        }
        _ => {
            let scores = course_scores(&grader, &ctx, course, &cfg.events.finish)?;
            println!("{}", serde_json::to_string_pretty(&scores)?);
        }
    }

    Ok(())
}
