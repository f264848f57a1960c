use anyhow::Result;
use cpt_store::{Problem, QuickLink};
use serde::Serialize;

use crate::OutputFormat;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One summary line per problem
pub fn problem_line(problem: &Problem) -> String {
    let rating = problem
        .rating
        .map(|rating| format!(" {rating}"))
        .unwrap_or_default();
    let next = match problem.next_revision_date {
        Some(date) => format!("next {date}"),
        None => "done".to_string(),
    };
    format!(
        "{}  {} [{} {}{}]  level {}  {}",
        problem.id,
        problem.name,
        problem.source,
        problem.difficulty,
        rating,
        problem.revision_level,
        next
    )
}

pub fn print_problems(problems: &[Problem], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(problems),
        OutputFormat::Plain => {
            if problems.is_empty() {
                println!("(no problems)");
            }
            for problem in problems {
                println!("{}", problem_line(problem));
            }
            Ok(())
        }
    }
}

pub fn print_problem(problem: &Problem, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(problem),
        OutputFormat::Plain => {
            println!("{}", problem_line(problem));
            println!("  {}", problem.url);
            if let Some(link) = &problem.submission_link {
                println!("  submission: {link}");
            }
            if let Some(remarks) = &problem.remarks {
                println!("  remarks: {remarks}");
            }
            Ok(())
        }
    }
}

pub fn print_links(links: &[QuickLink], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(links),
        OutputFormat::Plain => {
            if links.is_empty() {
                println!("(no quick links)");
            }
            for link in links {
                println!("{}  {} ({})", link.id, link.name, link.url);
            }
            Ok(())
        }
    }
}
