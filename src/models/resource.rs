//! Resource (assignee) model.
//!
//! A resource is a person (or anything else with a daily budget of
//! minutes) that tasks are assigned to. Each resource has a daily
//! capacity and the work-week policy of its owning context.
//!
//! Resources are read-only inputs to a scheduling run.

use serde::{Deserialize, Serialize};

use super::WorkWeek;

/// Default daily capacity: an eight-hour day.
pub const DEFAULT_WORKDAY_MINUTES: u32 = 480;

/// Minutes in one calendar day; no resource can exceed this.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A resource that tasks can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Minutes of work this resource can absorb per working day.
    pub daily_capacity_minutes: u32,
    /// Which weekdays this resource works.
    #[serde(default)]
    pub work_week: WorkWeek,
}

impl Resource {
    /// Creates a resource with an eight-hour day and a five-day week.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            daily_capacity_minutes: DEFAULT_WORKDAY_MINUTES,
            work_week: WorkWeek::default(),
        }
    }

    /// Sets the resource name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the daily capacity in minutes.
    pub fn with_daily_capacity(mut self, minutes: u32) -> Self {
        self.daily_capacity_minutes = minutes;
        self
    }

    /// Sets the work-week policy.
    pub fn with_work_week(mut self, work_week: WorkWeek) -> Self {
        self.work_week = work_week;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_builder() {
        let r = Resource::new("U1")
            .with_name("Alice")
            .with_daily_capacity(360)
            .with_work_week(WorkWeek::SixDay);

        assert_eq!(r.id, "U1");
        assert_eq!(r.name, "Alice");
        assert_eq!(r.daily_capacity_minutes, 360);
        assert_eq!(r.work_week, WorkWeek::SixDay);
    }

    #[test]
    fn test_resource_defaults() {
        let r = Resource::new("U1");
        assert_eq!(r.daily_capacity_minutes, DEFAULT_WORKDAY_MINUTES);
        assert_eq!(r.work_week, WorkWeek::FiveDay);
    }

    #[test]
    fn test_resource_deserialize() {
        let r: Resource =
            serde_json::from_str(r#"{"id":"U2","daily_capacity_minutes":420,"work_week":7}"#)
                .unwrap();
        assert_eq!(r.daily_capacity_minutes, 420);
        assert_eq!(r.work_week, WorkWeek::SevenDay);
        assert!(r.name.is_empty());
    }
}
