// Collections only change through `load`/`complete_load` or a confirmed
// mutation; every confirmed change supersedes loads still in flight.

mod collection;

use std::fmt::Display;
use std::hash::Hash;

pub use collection::{Collection, LoadOutcome, LoadTicket};

use crate::models::{Problem, ProblemId, QuickLink, QuickLinkId};

/// A record keyed by a store-assigned identifier.
pub trait Record {
    /// Identifier type, unique within a collection
    type Id: Eq + Hash + Display;

    /// Identifier the store assigned to this record
    fn id(&self) -> &Self::Id;
}

impl Record for Problem {
    type Id = ProblemId;

    fn id(&self) -> &ProblemId {
        &self.id
    }
}

impl Record for QuickLink {
    type Id = QuickLinkId;

    fn id(&self) -> &QuickLinkId {
        &self.id
    }
}

/// Session mirror of the authoritative store
#[derive(Debug, Clone, Default)]
pub struct Repository {
    /// Tracked problems, in store order
    pub problems: Collection<Problem>,
    /// Quick links to practice sites
    pub links: Collection<QuickLink>,
}

impl Repository {
    /// Empty mirror, filled by the first load
    pub fn new() -> Self {
        Self::default()
    }
}
