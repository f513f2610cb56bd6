//! Inclusive date-range intersection for leave requests.
//!
//! Two ranges overlap when they share at least one calendar day, boundaries
//! included: a single-day leave on the end date of another leave conflicts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::leave::LeaveRequest;

/// A closed range of calendar dates, `start <= end` by construction of a
/// validated leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Inclusive intersection test, symmetric in its arguments.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Inclusive day count of the range.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// True iff `candidate` intersects any of `existing`.
pub fn has_overlap(candidate: DateRange, existing: &[DateRange]) -> bool {
    existing.iter().any(|range| candidate.overlaps(range))
}

/// Ranges of the requests whose status blocks a new request (PENDING or
/// APPROVED); cancelled, rejected, and completed requests never block.
pub fn blocking_ranges<'a, I>(requests: I) -> Vec<DateRange>
where
    I: IntoIterator<Item = &'a LeaveRequest>,
{
    requests
        .into_iter()
        .filter(|req| req.status.blocks_overlap())
        .map(|req| req.range())
        .collect()
}
