//! Task model.
//!
//! A task is a unit of work with a remaining duration, optional date
//! anchors, assigned resources and dependency edges to other tasks.
//!
//! # Dependency Edges
//! `predecessors` must finish before this task starts; `successors` start
//! after it finishes. Either side may be supplied: the scheduler's task
//! graph merges both declarations into one edge set.
//!
//! # Anchors
//! - `due_at`: when the task is due.
//! - `scheduled_at`: a previously computed or user-pinned target end
//!   (e.g. the day a bar was dragged to). Takes priority over bounds when
//!   seeding the placement.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{minutes_into, MINUTES_PER_DAY};

/// A task to be placed on the calendar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Work still to be done (minutes).
    #[serde(default)]
    pub remaining_minutes: u32,
    /// Due date. `None` = no deadline.
    #[serde(default)]
    pub due_at: Option<NaiveDateTime>,
    /// Fixed or previously scheduled target date.
    #[serde(default)]
    pub scheduled_at: Option<NaiveDateTime>,
    /// Completed tasks are not pulled into dependency chains.
    #[serde(default)]
    pub completed: bool,
    /// Assigned resource IDs.
    #[serde(default)]
    pub resources: Vec<String>,
    /// Tasks that must finish before this one.
    #[serde(default)]
    pub predecessors: Vec<String>,
    /// Tasks that wait for this one.
    #[serde(default)]
    pub successors: Vec<String>,
    /// Owning milestone.
    #[serde(default)]
    pub milestone: Option<String>,
}

impl Task {
    /// Creates a new task with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the remaining work (minutes).
    pub fn with_remaining(mut self, minutes: u32) -> Self {
        self.remaining_minutes = minutes;
        self
    }

    /// Sets the due date.
    pub fn with_due(mut self, due_at: NaiveDateTime) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Sets the scheduled (pinned) date.
    pub fn with_scheduled(mut self, scheduled_at: NaiveDateTime) -> Self {
        self.scheduled_at = Some(scheduled_at);
        self
    }

    /// Pins the task to end on `day`: the scheduled date becomes the last
    /// minute of that day.
    pub fn pinned_to(self, day: NaiveDate) -> Self {
        self.with_scheduled(end_of_day(day))
    }

    /// Marks the task completed.
    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Assigns a resource.
    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resources.push(resource_id.into());
        self
    }

    /// Adds a predecessor (a task that must finish first).
    pub fn with_predecessor(mut self, task_id: impl Into<String>) -> Self {
        self.predecessors.push(task_id.into());
        self
    }

    /// Adds a successor (a task that waits for this one).
    pub fn with_successor(mut self, task_id: impl Into<String>) -> Self {
        self.successors.push(task_id.into());
        self
    }

    /// Sets the owning milestone.
    pub fn in_milestone(mut self, milestone_id: impl Into<String>) -> Self {
        self.milestone = Some(milestone_id.into());
        self
    }

    /// Whether there is no work left to place.
    pub fn is_zero_length(&self) -> bool {
        self.remaining_minutes == 0
    }

    /// Whether the task has no assigned resources.
    pub fn is_unassigned(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Last minute of `day` (23:59), the instant a pinned date resolves to.
pub fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    minutes_into(day, MINUTES_PER_DAY - 1)
}
