mod commands;
mod offline;
mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use cpt_app::{
    AppConfig, HttpBackend, Selection, Session, SortDirection, SortKey, tracing::init_tracing,
};
use cpt_store::{Difficulty, Source};
use offline::OfflineFiles;

#[derive(Parser, Debug)]
#[command(name = "cpt", about = "Competitive programming revision tracker", version)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Local display preferences
    #[command(subcommand)]
    Prefs(PrefsCommand),

    #[command(flatten)]
    Store(StoreCommand),
}

#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// List problems, filtered and sorted
    List(ListArgs),

    /// Problems due for revision today
    Due,

    /// Add a problem
    Add(ProblemArgs),

    /// Change the details of a problem
    Edit {
        id: String,
        #[command(flatten)]
        changes: EditArgs,
    },

    /// Record a revision of a problem
    Revise { id: String },

    /// Delete a problem
    Delete { id: String },

    /// Write every problem to a JSON file
    Export {
        /// Output file (defaults to problem-tracker-YYYY-MM-DD.json, "-" for stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Add every problem of a JSON export
    Import { file: PathBuf },

    /// Quick links to practice sites
    #[command(subcommand)]
    Links(LinksCommand),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Case-insensitive text to look for in name, source, difficulty and remarks
    #[arg(long, default_value = "")]
    search: String,
    /// Source to show, or "all"
    #[arg(long, default_value = "all")]
    source: Selection<Source>,
    /// Difficulty to show, or "all"
    #[arg(long, default_value = "all")]
    difficulty: Selection<Difficulty>,
    #[arg(long, value_enum, default_value = "added-at")]
    sort: SortField,
    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortField {
    AddedAt,
    Name,
    Rating,
    NextRevisionDate,
}

impl SortField {
    const fn key(self) -> SortKey {
        match self {
            Self::AddedAt => SortKey::AddedAt,
            Self::Name => SortKey::Name,
            Self::Rating => SortKey::Rating,
            Self::NextRevisionDate => SortKey::NextRevisionDate,
        }
    }
}

impl ListArgs {
    const fn direction(&self) -> SortDirection {
        if self.asc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

#[derive(Args, Debug)]
struct ProblemArgs {
    name: String,
    url: String,
    #[arg(long)]
    source: Source,
    #[arg(long)]
    difficulty: Difficulty,
    #[arg(long)]
    rating: Option<u32>,
    #[arg(long)]
    submission: Option<String>,
    #[arg(long)]
    remarks: Option<String>,
}

#[derive(Args, Debug)]
struct EditArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    source: Option<Source>,
    #[arg(long)]
    difficulty: Option<Difficulty>,
    #[arg(long)]
    rating: Option<u32>,
    #[arg(long)]
    submission: Option<String>,
    #[arg(long)]
    remarks: Option<String>,
}

#[derive(Subcommand, Debug)]
enum LinksCommand {
    List,
    Add {
        name: String,
        url: String,
        /// Inline SVG markup for the logo
        #[arg(long)]
        logo: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    Show,
    SetHeading { heading: String },
    SetAccent { accent: String },
    Animations {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Set the current user, or clear it when no name is given
    User { name: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing(&config.env);

    match cli.command {
        Command::Prefs(command) => commands::prefs::run(&config, command, cli.format),
        Command::Store(command) if config.offline => {
            run_offline(&config, command, cli.format).await
        }
        Command::Store(command) => {
            let session = Session::new(HttpBackend::new(&config)?);
            commands::run(&session, command, cli.format).await
        }
    }
}

/// Run against the in-process store, backed by snapshot files.
async fn run_offline(config: &AppConfig, command: StoreCommand, format: OutputFormat) -> Result<()> {
    let files = OfflineFiles::new(config);
    let backend = Arc::new(files.open()?);
    let session = Session::new(Arc::clone(&backend));
    commands::run(&session, command, format).await?;
    files.save(&backend)
}
