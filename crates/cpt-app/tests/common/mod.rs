use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use cpt_app::{
    AppError, LinkBackend, MemoryBackend, ProblemBackend, Session, transfer::ImportRecord,
};
use cpt_store::{
    Difficulty, NewProblem, Problem, ProblemDraft, ProblemId, QuickLink, QuickLinkDraft,
    QuickLinkId, Source,
};

/// Parse an RFC 3339 timestamp with its offset
pub fn at(timestamp: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(timestamp).expect("Invalid timestamp")
}

pub fn draft(name: &str) -> ProblemDraft {
    ProblemDraft {
        name: name.to_string(),
        url: format!("https://leetcode.com/problems/{}", name.to_lowercase().replace(' ', "-")),
        source: Source::LeetCode,
        difficulty: Difficulty::Medium,
        rating: None,
        submission_link: None,
        remarks: None,
    }
}

/// Store wrapper that can fail writes, slow calls down and count traffic
#[derive(Debug, Default)]
pub struct TestBackend {
    pub inner: Arc<MemoryBackend>,
    fail_writes: AtomicBool,
    list_delay_ms: AtomicUsize,
    update_delay_ms: AtomicUsize,
    create_delay_ms: AtomicUsize,
    calls: AtomicUsize,
}

impl TestBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay list responses after the data has been read
    pub fn delay_lists(&self, millis: usize) {
        self.list_delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Delay updates before they reach the store
    pub fn delay_updates(&self, millis: usize) {
        self.update_delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Delay create responses after the store has kept the records
    pub fn delay_creates(&self, millis: usize) {
        self.create_delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Number of backend calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn write(&self) -> Result<(), AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Status {
                status: 503,
                message: "store unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn pause(delay: &AtomicUsize) {
        let millis = delay.load(Ordering::SeqCst) as u64;
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

#[async_trait]
impl ProblemBackend for TestBackend {
    async fn list_problems(&self) -> Result<Vec<Problem>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let problems = self.inner.list_problems().await?;
        Self::pause(&self.list_delay_ms).await;
        Ok(problems)
    }

    async fn create_problem(&self, problem: &NewProblem) -> Result<Problem, AppError> {
        self.write()?;
        let created = self.inner.create_problem(problem).await?;
        Self::pause(&self.create_delay_ms).await;
        Ok(created)
    }

    async fn update_problem(&self, id: &ProblemId, problem: &Problem) -> Result<Problem, AppError> {
        self.write()?;
        Self::pause(&self.update_delay_ms).await;
        self.inner.update_problem(id, problem).await
    }

    async fn delete_problem(&self, id: &ProblemId) -> Result<(), AppError> {
        self.write()?;
        self.inner.delete_problem(id).await
    }

    async fn create_problems(&self, records: &[ImportRecord]) -> Result<Vec<Problem>, AppError> {
        self.write()?;
        let created = self.inner.create_problems(records).await?;
        Self::pause(&self.create_delay_ms).await;
        Ok(created)
    }
}

#[async_trait]
impl LinkBackend for TestBackend {
    async fn list_links(&self) -> Result<Vec<QuickLink>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_links().await
    }

    async fn create_link(&self, link: &QuickLinkDraft) -> Result<QuickLink, AppError> {
        self.write()?;
        let created = self.inner.create_link(link).await?;
        Self::pause(&self.create_delay_ms).await;
        Ok(created)
    }

    async fn delete_link(&self, id: &QuickLinkId) -> Result<(), AppError> {
        self.write()?;
        self.inner.delete_link(id).await
    }
}

/// Session over a fresh test backend, already refreshed
pub async fn session() -> Session<Arc<TestBackend>> {
    session_with(TestBackend::new()).await
}

pub async fn session_with(backend: TestBackend) -> Session<Arc<TestBackend>> {
    let session = Session::new(Arc::new(backend));
    session.refresh().await.expect("Failed to load session");
    session
}
