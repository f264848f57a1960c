//! User actions against the store and the session mirror.
//!
//! Every mutation is confirm-then-apply: the backend call must succeed before
//! the repository changes, so a failed action leaves the view exactly as it
//! was. Actions on the same record are serialized; the repository lock is
//! never held across a backend call.

use std::{
    collections::HashMap,
    hash::Hash,
    sync::{Arc, Mutex, PoisonError},
};

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use cpt_store::{
    LoadOutcome, NewProblem, Problem, ProblemDraft, ProblemId, QuickLink, QuickLinkDraft,
    QuickLinkId, Repository,
};
use tokio::sync::{OwnedMutexGuard, RwLock};

use crate::{
    backend::{LinkBackend, ProblemBackend},
    due::compute_due_today,
    error::AppError,
    transfer,
    validation::{validate_link_draft, validate_problem_draft},
    view::{ViewCriteria, compute_visible},
};

/// One async lock per record id
#[derive(Debug)]
struct RecordLocks<K> {
    locks: Mutex<HashMap<K, Arc<tokio::sync::Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> RecordLocks<K> {
    fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock(&self, id: &K) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(id.clone()).or_default())
        };
        lock.lock_owned().await
    }

    /// Drop the lock for `id` unless another task still holds or awaits it.
    ///
    /// The caller must have released its own guard.
    fn forget(&self, id: &K) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks.get(id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(id);
        }
    }
}

#[derive(Debug)]
pub struct Session<B> {
    backend: B,
    repository: RwLock<Repository>,
    problem_locks: RecordLocks<ProblemId>,
    link_locks: RecordLocks<QuickLinkId>,
}

impl<B> Session<B>
where
    B: ProblemBackend + LinkBackend,
{
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            repository: RwLock::new(Repository::new()),
            problem_locks: RecordLocks::new(),
            link_locks: RecordLocks::new(),
        }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch both collections from the store.
    pub async fn refresh(&self) -> Result<(), AppError> {
        tokio::try_join!(self.refresh_problems(), self.refresh_links())?;
        Ok(())
    }

    /// Replace the problem mirror with the store's list.
    ///
    /// A response that arrives after a newer load or a confirmed mutation is
    /// discarded and reported as [`LoadOutcome::Stale`].
    pub async fn refresh_problems(&self) -> Result<LoadOutcome, AppError> {
        let ticket = self.repository.write().await.problems.begin_load();
        let problems = self.backend.list_problems().await?;
        let count = problems.len();

        let outcome = self
            .repository
            .write()
            .await
            .problems
            .complete_load(ticket, problems);
        log_load("problems", count, outcome);
        Ok(outcome)
    }

    pub async fn refresh_links(&self) -> Result<LoadOutcome, AppError> {
        let ticket = self.repository.write().await.links.begin_load();
        let links = self.backend.list_links().await?;
        let count = links.len();

        let outcome = self
            .repository
            .write()
            .await
            .links
            .complete_load(ticket, links);
        log_load("links", count, outcome);
        Ok(outcome)
    }

    pub async fn problems(&self) -> Vec<Problem> {
        self.repository.read().await.problems.as_slice().to_vec()
    }

    pub async fn links(&self) -> Vec<QuickLink> {
        self.repository.read().await.links.as_slice().to_vec()
    }

    pub async fn find(&self, id: &ProblemId) -> Option<Problem> {
        self.repository.read().await.problems.get(id).cloned()
    }

    /// The problem list as it should be displayed for `criteria`.
    pub async fn visible(&self, criteria: &ViewCriteria) -> Vec<Problem> {
        let repository = self.repository.read().await;
        compute_visible(repository.problems.as_slice(), criteria)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn due_today(&self, today: NaiveDate) -> Vec<Problem> {
        let repository = self.repository.read().await;
        compute_due_today(repository.problems.as_slice(), today)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn add_problem(&self, draft: ProblemDraft) -> Result<Problem, AppError> {
        self.add_problem_at(draft, Local::now().fixed_offset()).await
    }

    /// Create a problem first due two days after `now`.
    pub async fn add_problem_at(
        &self,
        draft: ProblemDraft,
        now: DateTime<FixedOffset>,
    ) -> Result<Problem, AppError> {
        let draft = validate_problem_draft(draft)?;
        let created = self
            .backend
            .create_problem(&NewProblem::scheduled(draft, &now))
            .await?;

        if self
            .repository
            .write()
            .await
            .problems
            .upsert(created.clone())
            .is_some()
        {
            tracing::debug!(id = %created.id, "Created problem was already loaded");
        }
        tracing::info!(id = %created.id, "Added problem \"{}\"", created.name);
        Ok(created)
    }

    /// Replace the editable fields of a problem, keeping its revision progress.
    pub async fn edit_problem(
        &self,
        id: &ProblemId,
        draft: ProblemDraft,
    ) -> Result<Problem, AppError> {
        let draft = validate_problem_draft(draft)?;
        let _guard = self.problem_locks.lock(id).await;

        let current = self.require(id).await?;
        self.save(id, &current.apply_edit(draft)).await
    }

    pub async fn mark_revised(&self, id: &ProblemId) -> Result<Problem, AppError> {
        self.mark_revised_at(id, Local::now().fixed_offset()).await
    }

    /// Record a review of `id` performed at `now`.
    pub async fn mark_revised_at(
        &self,
        id: &ProblemId,
        now: DateTime<FixedOffset>,
    ) -> Result<Problem, AppError> {
        let _guard = self.problem_locks.lock(id).await;

        let current = self.require(id).await?;
        let saved = self.save(id, &current.mark_revised(&now)).await?;
        match saved.next_revision_date {
            Some(date) => tracing::info!(
                id = %id,
                level = saved.revision_level,
                "Problem revised, next revision on {date}"
            ),
            None => tracing::info!(
                id = %id,
                level = saved.revision_level,
                "Problem revised, revision cycle complete"
            ),
        }
        Ok(saved)
    }

    pub async fn delete_problem(&self, id: &ProblemId) -> Result<(), AppError> {
        let guard = self.problem_locks.lock(id).await;

        self.require(id).await?;
        self.backend.delete_problem(id).await?;

        if self.repository.write().await.problems.remove(id).is_none() {
            tracing::warn!(id = %id, "Deleted problem was already gone from the session");
        }
        drop(guard);
        self.problem_locks.forget(id);
        tracing::info!(id = %id, "Deleted problem");
        Ok(())
    }

    /// Create every record of an import file.
    ///
    /// The whole file is rejected on a structural error, and nothing is added
    /// to the session unless the store accepted the full batch.
    pub async fn import_snapshot(&self, input: &str) -> Result<Vec<Problem>, AppError> {
        let snapshot = transfer::import(input)?;
        if snapshot.is_empty() {
            tracing::info!("Import file contained no problems");
            return Ok(Vec::new());
        }

        let created = self.backend.create_problems(snapshot.records()).await?;
        {
            let mut repository = self.repository.write().await;
            for problem in &created {
                if repository.problems.upsert(problem.clone()).is_some() {
                    tracing::debug!(id = %problem.id, "Imported problem was already loaded");
                }
            }
        }
        tracing::info!("Imported {} problems", created.len());
        Ok(created)
    }

    pub async fn export_snapshot(&self) -> Result<String, AppError> {
        transfer::export(self.repository.read().await.problems.as_slice())
    }

    pub async fn add_link(&self, draft: QuickLinkDraft) -> Result<QuickLink, AppError> {
        let draft = validate_link_draft(draft)?;
        let created = self.backend.create_link(&draft).await?;

        if self
            .repository
            .write()
            .await
            .links
            .upsert(created.clone())
            .is_some()
        {
            tracing::debug!(id = %created.id, "Created link was already loaded");
        }
        tracing::info!(id = %created.id, "Added quick link \"{}\"", created.name);
        Ok(created)
    }

    pub async fn delete_link(&self, id: &QuickLinkId) -> Result<(), AppError> {
        let guard = self.link_locks.lock(id).await;

        if !self.repository.read().await.links.contains(id) {
            return Err(AppError::NotFound(id.to_string()));
        }
        self.backend.delete_link(id).await?;

        if self.repository.write().await.links.remove(id).is_none() {
            tracing::warn!(id = %id, "Deleted link was already gone from the session");
        }
        drop(guard);
        self.link_locks.forget(id);
        Ok(())
    }

    async fn require(&self, id: &ProblemId) -> Result<Problem, AppError> {
        self.find(id)
            .await
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    /// Send an updated record and mirror what the store confirmed.
    async fn save(&self, id: &ProblemId, problem: &Problem) -> Result<Problem, AppError> {
        let saved = self.backend.update_problem(id, problem).await?;
        self.repository
            .write()
            .await
            .problems
            .replace(saved.clone())?;
        Ok(saved)
    }
}

fn log_load(collection: &str, count: usize, outcome: LoadOutcome) {
    match outcome {
        LoadOutcome::Applied { duplicates: 0 } => tracing::debug!("Loaded {count} {collection}"),
        LoadOutcome::Applied { duplicates } => tracing::warn!(
            "Loaded {count} {collection}, dropped {duplicates} with a repeated id"
        ),
        LoadOutcome::Stale => tracing::debug!("Discarded superseded {collection} list"),
    }
}
