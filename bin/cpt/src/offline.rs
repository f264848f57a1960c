//! Snapshot files behind the offline store.
//!
//! Problems are kept in the export format so the file doubles as a backup;
//! quick links sit beside them as a plain JSON array.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use cpt_app::{AppConfig, MemoryBackend, transfer};
use cpt_store::QuickLink;

#[derive(Debug, Clone)]
pub struct OfflineFiles {
    problems: PathBuf,
    links: PathBuf,
}

impl OfflineFiles {
    pub fn new(config: &AppConfig) -> Self {
        Self::from_paths(config.data_path(), config.links_path())
    }

    pub const fn from_paths(problems: PathBuf, links: PathBuf) -> Self {
        Self { problems, links }
    }

    /// Build the in-process store from whatever was saved; missing files start empty.
    pub fn open(&self) -> Result<MemoryBackend> {
        let problems = match read_optional(&self.problems)? {
            Some(text) => transfer::import(&text)?.to_problems()?,
            None => Vec::new(),
        };
        let links: Vec<QuickLink> = match read_optional(&self.links)? {
            Some(text) => serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse {}", self.links.display()))?,
            None => Vec::new(),
        };
        tracing::debug!(
            "Offline store holds {} problems and {} links",
            problems.len(),
            links.len()
        );
        Ok(MemoryBackend::with_tables(problems, links))
    }

    /// Write both collections back.
    pub fn save(&self, backend: &MemoryBackend) -> Result<()> {
        write(&self.problems, &transfer::export(&backend.problems())?)?;
        write(&self.links, &serde_json::to_string_pretty(&backend.links())?)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(text))
}

fn write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
