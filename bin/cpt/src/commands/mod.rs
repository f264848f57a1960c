pub mod links;
pub mod prefs;
pub mod problems;

use anyhow::{Context, Result};
use cpt_app::{LinkBackend, ProblemBackend, Session};

use crate::{OutputFormat, StoreCommand};

/// Load the session from the store and run one command against it.
pub async fn run<B>(session: &Session<B>, command: StoreCommand, format: OutputFormat) -> Result<()>
where
    B: ProblemBackend + LinkBackend,
{
    session
        .refresh()
        .await
        .context("Failed to load from the problem store")?;

    match command {
        StoreCommand::List(args) => problems::list(session, &args, format).await,
        StoreCommand::Due => problems::due(session, format).await,
        StoreCommand::Add(args) => problems::add(session, args, format).await,
        StoreCommand::Edit { id, changes } => problems::edit(session, &id, changes, format).await,
        StoreCommand::Revise { id } => problems::revise(session, &id, format).await,
        StoreCommand::Delete { id } => problems::delete(session, &id).await,
        StoreCommand::Export { out } => problems::export(session, out).await,
        StoreCommand::Import { file } => problems::import(session, &file, format).await,
        StoreCommand::Links(command) => links::run(session, command, format).await,
    }
}
