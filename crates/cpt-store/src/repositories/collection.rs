use std::collections::HashSet;

use crate::error::StoreError;

use super::Record;

/// Sequence number handed out when a load is started.
///
/// A ticket is only honored if nothing newer reached the collection while the
/// load was in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Result of completing a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The records replaced the collection, minus `duplicates` repeated ids
    Applied { duplicates: usize },
    /// A newer load or a confirmed mutation superseded this one; nothing changed
    Stale,
}

/// Ordered, id-keyed set of records mirrored from the authoritative store
#[derive(Debug, Clone)]
pub struct Collection<T> {
    records: Vec<T>,
    issued: u64,
    applied: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            issued: 0,
            applied: 0,
        }
    }
}

impl<T: Record> Collection<T> {
    /// Empty collection with no load in flight
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in display order
    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    /// Iterate records in display order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// Number of mirrored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is mirrored
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record with `id`, if mirrored
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Whether a record with `id` is mirrored
    pub fn contains(&self, id: &T::Id) -> bool {
        self.position(id).is_some()
    }

    /// Replace the whole collection unconditionally.
    ///
    /// Repeated ids keep their first occurrence; returns how many were dropped.
    pub fn load(&mut self, records: Vec<T>) -> usize {
        let (records, duplicates) = unique(records);
        self.records = records;
        self.commit();
        duplicates
    }

    /// Start a load whose result will arrive later.
    pub const fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Apply the result of a load started with [`Self::begin_load`].
    ///
    /// Out-of-order completions are discarded so an old response can never
    /// overwrite a newer one.
    pub fn complete_load(&mut self, ticket: LoadTicket, records: Vec<T>) -> LoadOutcome {
        if ticket.0 <= self.applied {
            return LoadOutcome::Stale;
        }
        let (records, duplicates) = unique(records);
        self.records = records;
        self.applied = ticket.0;
        LoadOutcome::Applied { duplicates }
    }

    /// Append a record whose id was assigned by the store.
    pub fn insert(&mut self, record: T) -> Result<(), StoreError> {
        if self.contains(record.id()) {
            return Err(StoreError::DuplicateId(record.id().to_string()));
        }
        self.records.push(record);
        self.commit();
        Ok(())
    }

    /// Replace the record sharing `record`'s id, returning the previous one.
    pub fn replace(&mut self, record: T) -> Result<T, StoreError> {
        let index = self
            .position(record.id())
            .ok_or_else(|| StoreError::NotFound(record.id().to_string()))?;
        let previous = std::mem::replace(&mut self.records[index], record);
        self.commit();
        Ok(previous)
    }

    /// Mirror a record the store just confirmed.
    ///
    /// A load that completed while the mutation was in flight may already
    /// hold the record; the confirmed copy then replaces it in place and the
    /// previous one is returned.
    pub fn upsert(&mut self, record: T) -> Option<T> {
        let previous = match self.position(record.id()) {
            Some(index) => Some(std::mem::replace(&mut self.records[index], record)),
            None => {
                self.records.push(record);
                None
            }
        };
        self.commit();
        previous
    }

    /// Remove the record with `id`. Returns `None` when it was not present.
    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let index = self.position(id)?;
        let removed = self.records.remove(index);
        self.commit();
        Some(removed)
    }

    /// Append many records at once.
    ///
    /// Either every record is appended or, if any id collides with an
    /// existing record or another record of the batch, none is.
    pub fn bulk_insert(&mut self, records: Vec<T>) -> Result<(), StoreError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if self.contains(record.id()) || !seen.insert(record.id()) {
                return Err(StoreError::DuplicateId(record.id().to_string()));
            }
        }
        self.records.extend(records);
        self.commit();
        Ok(())
    }

    fn position(&self, id: &T::Id) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    /// Mark the current contents as the newest confirmed state.
    const fn commit(&mut self) {
        self.issued += 1;
        self.applied = self.issued;
    }
}

/// Drop every record whose id was already seen, keeping order.
fn unique<T: Record>(records: Vec<T>) -> (Vec<T>, usize) {
    let total = records.len();
    let mut seen = HashSet::with_capacity(total);
    let kept: Vec<T> = records
        .into_iter()
        .filter(|record| seen.insert(record.id().to_string()))
        .collect();
    let duplicates = total - kept.len();
    (kept, duplicates)
}

impl<'a, T: Record> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
