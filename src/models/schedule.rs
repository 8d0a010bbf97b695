//! Schedule (plan) model.
//!
//! A plan is the output of one scheduling run: the start/end instant of
//! every placed task, the aggregated span of every touched milestone, and
//! the overall range across all placements. Plans are handed back to the
//! caller to persist or render; the scheduler keeps nothing.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// A closed interval [start, end] between two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First instant.
    pub start: NaiveDateTime,
    /// Last instant.
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Creates a range.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// A zero-length range at `instant`.
    pub fn point(instant: NaiveDateTime) -> Self {
        Self::new(instant, instant)
    }

    /// Length of the range.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether start and end coincide.
    #[inline]
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// Widens this range to cover `other`.
    pub fn extend(&mut self, other: &DateRange) {
        if other.start < self.start {
            self.start = other.start;
        }
        if other.end > self.end {
            self.end = other.end;
        }
    }

    /// Day of the start instant.
    pub fn start_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Day of the end instant.
    pub fn end_day(&self) -> NaiveDate {
        self.end.date()
    }
}

/// Widens `slot` to cover `range`, initializing it when empty.
pub(crate) fn widen(slot: &mut Option<DateRange>, range: &DateRange) {
    match slot {
        Some(existing) => existing.extend(range),
        None => *slot = Some(*range),
    }
}

/// The result of a scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePlan {
    /// Task ID → placed interval.
    pub tasks: BTreeMap<String, DateRange>,
    /// Milestone ID → minimum start / maximum end across its placed tasks.
    pub milestones: BTreeMap<String, DateRange>,
    /// Minimum start / maximum end across every placed task.
    pub range: Option<DateRange>,
}

impl SchedulePlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Placement of a task.
    pub fn task(&self, task_id: &str) -> Option<&DateRange> {
        self.tasks.get(task_id)
    }

    /// Aggregated span of a milestone.
    pub fn milestone(&self, milestone_id: &str) -> Option<&DateRange> {
        self.milestones.get(milestone_id)
    }

    /// Number of placed tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Latest end across all placements.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.range.map(|r| r.end)
    }
}
