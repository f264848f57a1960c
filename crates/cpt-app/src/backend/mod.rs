//! Access to the authoritative problem store.
//!
//! Every record returned here is trusted as-is: the session never re-derives
//! `id` or `addedAt`.

use async_trait::async_trait;
use cpt_store::{NewProblem, Problem, ProblemId, QuickLink, QuickLinkDraft, QuickLinkId};

use crate::{error::AppError, transfer::ImportRecord};

pub mod http;
pub mod memory;

pub use http::HttpBackend;
pub use memory::MemoryBackend;

#[async_trait]
pub trait ProblemBackend: Send + Sync {
    async fn list_problems(&self) -> Result<Vec<Problem>, AppError>;
    /// Create a problem; the store assigns `id` and `addedAt`.
    async fn create_problem(&self, problem: &NewProblem) -> Result<Problem, AppError>;
    async fn update_problem(&self, id: &ProblemId, problem: &Problem) -> Result<Problem, AppError>;
    async fn delete_problem(&self, id: &ProblemId) -> Result<(), AppError>;
    /// Create every record of an imported snapshot, validated by the store.
    async fn create_problems(&self, records: &[ImportRecord]) -> Result<Vec<Problem>, AppError>;
}

#[async_trait]
pub trait LinkBackend: Send + Sync {
    async fn list_links(&self) -> Result<Vec<QuickLink>, AppError>;
    async fn create_link(&self, link: &QuickLinkDraft) -> Result<QuickLink, AppError>;
    async fn delete_link(&self, id: &QuickLinkId) -> Result<(), AppError>;
}

#[async_trait]
impl<B: ProblemBackend + ?Sized> ProblemBackend for std::sync::Arc<B> {
    async fn list_problems(&self) -> Result<Vec<Problem>, AppError> {
        (**self).list_problems().await
    }

    async fn create_problem(&self, problem: &NewProblem) -> Result<Problem, AppError> {
        (**self).create_problem(problem).await
    }

    async fn update_problem(&self, id: &ProblemId, problem: &Problem) -> Result<Problem, AppError> {
        (**self).update_problem(id, problem).await
    }

    async fn delete_problem(&self, id: &ProblemId) -> Result<(), AppError> {
        (**self).delete_problem(id).await
    }

    async fn create_problems(&self, records: &[ImportRecord]) -> Result<Vec<Problem>, AppError> {
        (**self).create_problems(records).await
    }
}

#[async_trait]
impl<B: LinkBackend + ?Sized> LinkBackend for std::sync::Arc<B> {
    async fn list_links(&self) -> Result<Vec<QuickLink>, AppError> {
        (**self).list_links().await
    }

    async fn create_link(&self, link: &QuickLinkDraft) -> Result<QuickLink, AppError> {
        (**self).create_link(link).await
    }

    async fn delete_link(&self, id: &QuickLinkId) -> Result<(), AppError> {
        (**self).delete_link(id).await
    }
}
