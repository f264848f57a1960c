//! SRS (Spaced Repetition System) library for the practice tracker
//!
//! This crate owns the revision curve and the pure scheduling rules built on it.
//! Nothing in here reads the clock: every function takes the instant it should
//! schedule from, which keeps the rules trivially testable.

use chrono::{DateTime, Days, NaiveDate, TimeZone};

/// Day offsets of the revision curve, indexed by revision level.
///
/// * Level 0: 2 days
/// * Level 1: 3 days
/// * Level 2: 5 days
/// * Level 3: 7 days (1 week)
/// * Level 4: 11 days
/// * Level 5: 20 days (~3 weeks)
/// * Level 6: 30 days (1 month)
///
/// Levels past the end of the table have completed the cycle and are never
/// scheduled again.
pub const REVISION_INTERVALS: [u64; 7] = [2, 3, 5, 7, 11, 20, 30];

/// Get the interval in days for a given revision level.
///
/// Returns `None` once the level has advanced past the end of the table.
pub fn interval_at(level: u32) -> Option<u64> {
    REVISION_INTERVALS.get(level as usize).copied()
}

/// Whether a problem at `level` has finished its revision cycle.
pub fn is_cycle_complete(level: u32) -> bool {
    interval_at(level).is_none()
}

/// Compute the next revision date for a revision level.
///
/// The calendar date of `base` (in its own time zone) is advanced by the
/// interval for `level`. The time of day never leaks into the result, so two
/// instants on the same day always schedule the same date.
///
/// # Arguments
///
/// * `level` - The revision level to schedule
/// * `base` - The instant the level was reached (creation or review time)
///
/// # Returns
///
/// The due date, or `None` when `level` is past the end of
/// [`REVISION_INTERVALS`] (or the date would overflow the calendar).
pub fn next_revision_date<Tz: TimeZone>(level: u32, base: &DateTime<Tz>) -> Option<NaiveDate> {
    let days = interval_at(level)?;
    base.date_naive().checked_add_days(Days::new(days))
}

/// Whether a problem with the given next revision date is due on `today`.
///
/// Problems with no scheduled date are never due.
pub fn is_due(next_revision_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    next_revision_date.is_some_and(|date| date <= today)
}

/// Revision progress of a single problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionState {
    /// Number of completed reviews
    pub level: u32,
    /// When the problem is due again, `None` once the cycle is complete
    pub next_revision_date: Option<NaiveDate>,
}

impl RevisionState {
    /// State assigned to a freshly created problem.
    ///
    /// Creation counts as the effective review for level 0, so a new problem
    /// is first due two days after it was added.
    pub fn initial<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self {
            level: 0,
            next_revision_date: next_revision_date(0, now),
        }
    }

    /// Advance one level after a review performed at `now`.
    ///
    /// The level saturates instead of wrapping; the due date is always
    /// recomputed from the new level.
    pub fn advance<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Self {
        let level = self.level.saturating_add(1);
        Self {
            level,
            next_revision_date: next_revision_date(level, now),
        }
    }

    /// Whether the revision cycle is complete.
    pub fn is_complete(&self) -> bool {
        is_cycle_complete(self.level)
    }
}
