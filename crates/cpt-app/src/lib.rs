//! Session layer of the practice tracker: talks to the problem store, keeps
//! the session mirror in sync and derives what the user sees.

pub mod backend;
pub mod config;
pub mod due;
pub mod error;
pub mod session;
pub mod settings;
pub mod tracing;
pub mod transfer;
pub mod validation;
pub mod view;

pub use backend::{HttpBackend, LinkBackend, MemoryBackend, ProblemBackend};
pub use config::{AppConfig, Environment};
pub use error::AppError;
pub use session::Session;
pub use view::{Selection, SortConfig, SortDirection, SortKey, ViewCriteria};
