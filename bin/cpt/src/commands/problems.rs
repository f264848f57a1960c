use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;
use cpt_app::{LinkBackend, ProblemBackend, Session, SortConfig, ViewCriteria, transfer};
use cpt_store::{ProblemDraft, ProblemId};

use crate::{EditArgs, ListArgs, OutputFormat, ProblemArgs, render};

pub async fn list<B>(session: &Session<B>, args: &ListArgs, format: OutputFormat) -> Result<()>
where
    B: ProblemBackend + LinkBackend,
{
    let criteria = ViewCriteria {
        search_term: args.search.clone(),
        source: args.source,
        difficulty: args.difficulty,
        sort: SortConfig::new(args.sort.key(), args.direction()),
    };
    render::print_problems(&session.visible(&criteria).await, format)
}

pub async fn due<B>(session: &Session<B>, format: OutputFormat) -> Result<()>
where
    B: ProblemBackend + LinkBackend,
{
    let due = session.due_today(Local::now().date_naive()).await;
    if matches!(format, OutputFormat::Plain) {
        println!("{} due today", due.len());
    }
    render::print_problems(&due, format)
}

pub async fn add<B>(session: &Session<B>, args: ProblemArgs, format: OutputFormat) -> Result<()>
where
    B: ProblemBackend + LinkBackend,
{
    let draft = ProblemDraft {
        name: args.name,
        url: args.url,
        source: args.source,
        difficulty: args.difficulty,
        rating: args.rating,
        submission_link: args.submission,
        remarks: args.remarks,
    };
    let created = session.add_problem(draft).await?;
    render::print_problem(&created, format)
}

pub async fn edit<B>(
    session: &Session<B>,
    id: &str,
    changes: EditArgs,
    format: OutputFormat,
) -> Result<()>
where
    B: ProblemBackend + LinkBackend,
{
    let id = ProblemId::from(id);
    let current = session
        .find(&id)
        .await
        .with_context(|| format!("No problem with id `{id}`"))?
        .to_draft();

    let draft = ProblemDraft {
        name: changes.name.unwrap_or(current.name),
        url: changes.url.unwrap_or(current.url),
        source: changes.source.unwrap_or(current.source),
        difficulty: changes.difficulty.unwrap_or(current.difficulty),
        rating: changes.rating.or(current.rating),
        submission_link: changes.submission.or(current.submission_link),
        remarks: changes.remarks.or(current.remarks),
    };
    let edited = session.edit_problem(&id, draft).await?;
    render::print_problem(&edited, format)
}

pub async fn revise<B>(session: &Session<B>, id: &str, format: OutputFormat) -> Result<()>
where
    B: ProblemBackend + LinkBackend,
{
    let revised = session.mark_revised(&ProblemId::from(id)).await?;
    render::print_problem(&revised, format)
}

pub async fn delete<B>(session: &Session<B>, id: &str) -> Result<()>
where
    B: ProblemBackend + LinkBackend,
{
    session.delete_problem(&ProblemId::from(id)).await?;
    Ok(())
}

pub async fn export<B>(session: &Session<B>, out: Option<PathBuf>) -> Result<()>
where
    B: ProblemBackend + LinkBackend,
{
    let json = session.export_snapshot().await?;
    let path = out.unwrap_or_else(|| {
        PathBuf::from(transfer::export_file_name(Local::now().date_naive()))
    });

    if path == Path::new("-") {
        println!("{json}");
        return Ok(());
    }
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Exported to {}", path.display());
    Ok(())
}

pub async fn import<B>(session: &Session<B>, file: &Path, format: OutputFormat) -> Result<()>
where
    B: ProblemBackend + LinkBackend,
{
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let imported = session.import_snapshot(&text).await?;

    match format {
        OutputFormat::Json => render::print_json(&imported),
        OutputFormat::Plain => {
            println!("Imported {} problems", imported.len());
            Ok(())
        }
    }
}
