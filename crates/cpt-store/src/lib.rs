//! Data model and in-memory repository for the practice tracker.
//!
//! The repository mirrors the authoritative store for the running session. It
//! never talks to the store itself: callers apply a change here only once the
//! store has confirmed it.

pub mod error;
pub mod models;
pub mod repositories;

pub use error::StoreError;
pub use models::{
    Difficulty, NewProblem, ParseEnumError, Problem, ProblemDraft, ProblemId, QuickLink,
    QuickLinkDraft, QuickLinkId, Source,
};
pub use repositories::{Collection, LoadOutcome, LoadTicket, Record, Repository};
