//! Per-run scheduling state.
//!
//! One context belongs to exactly one top-level scheduling run and is
//! threaded by `&mut` through every recursive placement. Nothing here is
//! global, so concurrent runs never share a ledger.

use std::collections::BTreeMap;

use super::CapacityLedger;
use crate::models::{widen, DateRange, SchedulePlan, Task};

/// Ledger, memo cache, in-progress stack and aggregate ranges of a run.
#[derive(Debug, Clone, Default)]
pub struct SchedulingContext {
    ledger: CapacityLedger,
    placed: BTreeMap<String, DateRange>,
    stack: Vec<String>,
    range: Option<DateRange>,
    milestones: BTreeMap<String, DateRange>,
}

impl SchedulingContext {
    /// Fresh context with an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh context starting from a pre-loaded ledger.
    pub fn with_ledger(ledger: CapacityLedger) -> Self {
        Self {
            ledger,
            ..Default::default()
        }
    }

    /// The capacity ledger.
    pub fn ledger(&self) -> &CapacityLedger {
        &self.ledger
    }

    /// Mutable access to the ledger, e.g. to pre-load bookings.
    pub fn ledger_mut(&mut self) -> &mut CapacityLedger {
        &mut self.ledger
    }

    /// Memoized placement of a task.
    pub fn placement(&self, task_id: &str) -> Option<&DateRange> {
        self.placed.get(task_id)
    }

    /// Whether the task is currently being placed.
    pub fn is_in_progress(&self, task_id: &str) -> bool {
        self.stack.iter().any(|id| id == task_id)
    }

    /// Overall range across all placements so far.
    pub fn range(&self) -> Option<DateRange> {
        self.range
    }

    /// Aggregated range of a milestone so far.
    pub fn milestone_range(&self, milestone_id: &str) -> Option<&DateRange> {
        self.milestones.get(milestone_id)
    }

    pub(crate) fn enter(&mut self, task_id: &str) {
        self.stack.push(task_id.to_string());
    }

    pub(crate) fn leave(&mut self, task_id: &str) {
        if let Some(pos) = self.stack.iter().rposition(|id| id == task_id) {
            self.stack.truncate(pos);
        }
    }

    /// Memoizes a placement and folds it into the aggregate ranges.
    pub(crate) fn record(&mut self, task: &Task, range: DateRange) {
        self.placed.insert(task.id.clone(), range);
        widen(&mut self.range, &range);
        if let Some(mid) = &task.milestone {
            self.milestones
                .entry(mid.clone())
                .and_modify(|r| r.extend(&range))
                .or_insert(range);
        }
    }

    /// A snapshot of the run's output.
    pub fn plan(&self) -> SchedulePlan {
        SchedulePlan {
            tasks: self.placed.clone(),
            milestones: self.milestones.clone(),
            range: self.range,
        }
    }

    /// Consumes the context into the run's output.
    pub fn into_plan(self) -> SchedulePlan {
        SchedulePlan {
            tasks: self.placed,
            milestones: self.milestones,
            range: self.range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_record_aggregates() {
        let mut ctx = SchedulingContext::new();
        ctx.record(
            &Task::new("A").in_milestone("M1"),
            DateRange::new(at(2, 0), at(3, 4)),
        );
        ctx.record(
            &Task::new("B").in_milestone("M1"),
            DateRange::new(at(1, 0), at(2, 8)),
        );
        ctx.record(&Task::new("C"), DateRange::new(at(5, 0), at(5, 2)));

        assert_eq!(ctx.placement("A"), Some(&DateRange::new(at(2, 0), at(3, 4))));
        assert_eq!(
            ctx.milestone_range("M1"),
            Some(&DateRange::new(at(1, 0), at(3, 4)))
        );
        assert_eq!(ctx.range(), Some(DateRange::new(at(1, 0), at(5, 2))));

        let plan = ctx.into_plan();
        assert_eq!(plan.task_count(), 3);
        assert_eq!(plan.milestones.len(), 1);
    }

    #[test]
    fn test_stack_discipline() {
        let mut ctx = SchedulingContext::new();
        ctx.enter("A");
        ctx.enter("B");
        assert!(ctx.is_in_progress("A"));
        assert!(ctx.is_in_progress("B"));
        ctx.leave("B");
        assert!(!ctx.is_in_progress("B"));
        ctx.leave("A");
        assert!(!ctx.is_in_progress("A"));
    }

    #[test]
    fn test_with_ledger() {
        let mut ledger = CapacityLedger::new();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ledger
            .allocate(day, &crate::models::Resource::new("U1"), 120)
            .unwrap();
        let ctx = SchedulingContext::with_ledger(ledger);
        assert_eq!(ctx.ledger().used(day, "U1"), 120);
        assert!(ctx.plan().tasks.is_empty());
    }
}
