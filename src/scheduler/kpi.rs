//! Schedule status and quality metrics (KPIs).
//!
//! Classifies each task of a computed plan against its effective due date
//! and summarizes the plan.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Overdue | Not completed, effective due date before the horizon |
//! | Late | Placed end after the effective due date |
//! | Total Lateness | Sum of max(0, end - due) in minutes |
//! | Maximum Lateness | Largest single delay in minutes |
//! | On-Time Rate | Fraction of open, placed tasks that are on track |
//! | Late Milestones | Aggregated end after the milestone's anchor |
//! | Plan End | Latest end across all placements |
//!
//! A task's effective due date is its own, else its milestone's anchor.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{day_start, Milestone, SchedulePlan, Task};

/// Status of one task in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Marked completed.
    Completed,
    /// Due before the horizon and still open.
    Overdue,
    /// Placed to end after its due date.
    Late,
    /// Placed within its due date, or without one.
    OnTrack,
    /// Not present in the plan.
    Unscheduled,
}

impl TaskStatus {
    /// Whether the status needs attention.
    pub fn is_problem(self) -> bool {
        matches!(self, TaskStatus::Overdue | TaskStatus::Late)
    }
}

/// Plan quality indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleKpi {
    /// Status per task id.
    pub statuses: BTreeMap<String, TaskStatus>,
    /// Overdue task ids, in input order.
    pub overdue_tasks: Vec<String>,
    /// Late task ids, in input order.
    pub late_tasks: Vec<String>,
    /// Milestone ids whose aggregated end passes their anchor.
    pub late_milestones: Vec<String>,
    /// Sum of lateness across tasks (minutes).
    pub total_lateness_minutes: i64,
    /// Largest lateness of any single task (minutes).
    pub max_lateness_minutes: i64,
    /// Fraction of open, placed tasks that are on track (0.0..=1.0).
    pub on_time_rate: f64,
    /// Latest end across the plan.
    pub plan_end: Option<NaiveDateTime>,
}

impl ScheduleKpi {
    /// Computes KPIs for `plan`.
    ///
    /// # Arguments
    /// * `plan` - The computed placements.
    /// * `tasks` - The input tasks (due dates, completion).
    /// * `milestones` - The input milestones (anchors).
    /// * `horizon` - "Now"; tasks due before its midnight are overdue.
    pub fn calculate(plan: &SchedulePlan, tasks: &[Task], milestones: &[Milestone], horizon: NaiveDate) -> Self {
        let now = day_start(horizon);
        let anchors: HashMap<&str, NaiveDateTime> = milestones
            .iter()
            .filter_map(|m| m.anchor().map(|a| (m.id.as_str(), a)))
            .collect();

        let mut statuses = BTreeMap::new();
        let mut overdue_tasks = Vec::new();
        let mut late_tasks = Vec::new();
        let mut total_lateness: i64 = 0;
        let mut max_lateness: i64 = 0;
        let mut on_track: usize = 0;
        let mut counted: usize = 0;

        for task in tasks {
            let due = task.due_at.or_else(|| {
                task.milestone
                    .as_deref()
                    .and_then(|mid| anchors.get(mid).copied())
            });
            let placed = plan.task(&task.id);

            let status = classify(task, due, placed.map(|r| r.end), now);
            match status {
                TaskStatus::Overdue => overdue_tasks.push(task.id.clone()),
                TaskStatus::Late => late_tasks.push(task.id.clone()),
                _ => {}
            }

            if let (Some(due), Some(range)) = (due, placed) {
                if !task.completed && range.end > due {
                    let lateness = (range.end - due).num_minutes();
                    total_lateness += lateness;
                    max_lateness = max_lateness.max(lateness);
                }
            }

            if placed.is_some() && !task.completed {
                counted += 1;
                if status == TaskStatus::OnTrack {
                    on_track += 1;
                }
            }
            statuses.insert(task.id.clone(), status);
        }

        let late_milestones = milestones
            .iter()
            .filter(|m| {
                matches!(
                    (m.anchor(), plan.milestone(&m.id)),
                    (Some(anchor), Some(range)) if range.end > anchor
                )
            })
            .map(|m| m.id.clone())
            .collect();

        let on_time_rate = if counted == 0 {
            1.0
        } else {
            on_track as f64 / counted as f64
        };

        Self {
            statuses,
            overdue_tasks,
            late_tasks,
            late_milestones,
            total_lateness_minutes: total_lateness,
            max_lateness_minutes: max_lateness,
            on_time_rate,
            plan_end: plan.end(),
        }
    }

    /// Status of one task.
    pub fn status(&self, task_id: &str) -> Option<TaskStatus> {
        self.statuses.get(task_id).copied()
    }

    /// Whether the plan meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_lateness_minutes: i64, min_on_time_rate: f64) -> bool {
        self.max_lateness_minutes <= max_lateness_minutes && self.on_time_rate >= min_on_time_rate
    }
}

fn classify(task: &Task, due: Option<NaiveDateTime>, end: Option<NaiveDateTime>, now: NaiveDateTime) -> TaskStatus {
    if task.completed {
        return TaskStatus::Completed;
    }
    if due.is_some_and(|d| d < now) {
        return TaskStatus::Overdue;
    }
    match (end, due) {
        (None, _) => TaskStatus::Unscheduled,
        (Some(end), Some(due)) if end > due => TaskStatus::Late,
        _ => TaskStatus::OnTrack,
    }
}
