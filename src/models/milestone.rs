//! Milestone model.
//!
//! A milestone groups tasks. The scheduler never changes a milestone's
//! own dates; it reports the aggregated span of its tasks instead.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::task::end_of_day;

/// A milestone owning zero or more tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Milestone {
    /// Unique milestone identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Due date.
    #[serde(default)]
    pub due_at: Option<NaiveDateTime>,
    /// Previously scheduled or pinned date.
    #[serde(default)]
    pub scheduled_at: Option<NaiveDateTime>,
}

impl Milestone {
    /// Creates a new milestone with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Sets the milestone name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the due date.
    pub fn with_due(mut self, due_at: NaiveDateTime) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Sets the scheduled date.
    pub fn with_scheduled(mut self, scheduled_at: NaiveDateTime) -> Self {
        self.scheduled_at = Some(scheduled_at);
        self
    }

    /// Pins the milestone to the last minute of `day`.
    pub fn pinned_to(self, day: NaiveDate) -> Self {
        self.with_scheduled(end_of_day(day))
    }

    /// The date this milestone is anchored to: its scheduled date if set,
    /// otherwise its due date.
    pub fn anchor(&self) -> Option<NaiveDateTime> {
        self.scheduled_at.or(self.due_at)
    }

    /// Whether the milestone is anchored to a date.
    pub fn is_anchored(&self) -> bool {
        self.anchor().is_some()
    }
}
