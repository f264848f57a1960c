use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use cpt_store::{
    NewProblem, Problem, ProblemId, QuickLink, QuickLinkDraft, QuickLinkId, Record,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    backend::{LinkBackend, ProblemBackend},
    error::AppError,
    transfer::ImportRecord,
};

#[derive(Debug, Default)]
struct Tables {
    problems: Vec<Problem>,
    links: Vec<QuickLink>,
}

/// In-process authoritative store.
///
/// Assigns uuid ids and the creation time, validates what it creates and
/// applies batch creation atomically.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: Mutex<Tables>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing records, e.g. snapshots loaded from disk.
    pub fn with_tables(problems: Vec<Problem>, links: Vec<QuickLink>) -> Self {
        Self {
            tables: Mutex::new(Tables { problems, links }),
        }
    }

    /// Every problem currently held, in creation order.
    pub fn problems(&self) -> Vec<Problem> {
        self.tables().problems.clone()
    }

    /// Every quick link currently held, in creation order.
    pub fn links(&self) -> Vec<QuickLink> {
        self.tables().links.clone()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn materialize(problem: NewProblem) -> Result<Problem, AppError> {
        problem.draft.validate()?;
        Ok(problem.into_problem(ProblemId::new(Uuid::new_v4().to_string()), Utc::now()))
    }
}

fn missing<T: Record>(id: &T::Id) -> AppError {
    AppError::Status {
        status: 404,
        message: format!("no record with id `{id}`"),
    }
}

#[async_trait]
impl ProblemBackend for MemoryBackend {
    async fn list_problems(&self) -> Result<Vec<Problem>, AppError> {
        Ok(self.problems())
    }

    async fn create_problem(&self, problem: &NewProblem) -> Result<Problem, AppError> {
        let created = Self::materialize(problem.clone())?;
        self.tables().problems.push(created.clone());
        Ok(created)
    }

    async fn update_problem(&self, id: &ProblemId, problem: &Problem) -> Result<Problem, AppError> {
        problem.to_draft().validate()?;

        let mut tables = self.tables();
        let stored = tables
            .problems
            .iter_mut()
            .find(|stored| &stored.id == id)
            .ok_or_else(|| missing::<Problem>(id))?;

        // Identity and creation time belong to the store
        *stored = Problem {
            id: stored.id.clone(),
            added_at: stored.added_at,
            ..problem.clone()
        };
        Ok(stored.clone())
    }

    async fn delete_problem(&self, id: &ProblemId) -> Result<(), AppError> {
        let mut tables = self.tables();
        let before = tables.problems.len();
        tables.problems.retain(|stored| &stored.id != id);
        if tables.problems.len() == before {
            return Err(missing::<Problem>(id));
        }
        Ok(())
    }

    async fn create_problems(&self, records: &[ImportRecord]) -> Result<Vec<Problem>, AppError> {
        let created = records
            .iter()
            .map(|record| {
                let problem: NewProblem =
                    serde_json::from_value(serde_json::Value::Object(record.clone()))
                        .map_err(|e| AppError::Validation(e.to_string()))?;
                Self::materialize(problem)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.tables().problems.extend(created.iter().cloned());
        Ok(created)
    }
}

#[async_trait]
impl LinkBackend for MemoryBackend {
    async fn list_links(&self) -> Result<Vec<QuickLink>, AppError> {
        Ok(self.links())
    }

    async fn create_link(&self, link: &QuickLinkDraft) -> Result<QuickLink, AppError> {
        link.validate()?;
        let created = link
            .clone()
            .into_link(QuickLinkId::new(Uuid::new_v4().to_string()));
        self.tables().links.push(created.clone());
        Ok(created)
    }

    async fn delete_link(&self, id: &QuickLinkId) -> Result<(), AppError> {
        let mut tables = self.tables();
        let before = tables.links.len();
        tables.links.retain(|stored| &stored.id != id);
        if tables.links.len() == before {
            return Err(missing::<QuickLink>(id));
        }
        Ok(())
    }
}
