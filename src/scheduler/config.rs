//! Scheduler configuration.
//!
//! Everything that used to come from "the current user" (time zone,
//! work week, length of a working day) is passed in explicitly here.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{day_start, WorkWeek, DEFAULT_WORKDAY_MINUTES};

/// Default bound on the capacity search, in working days (~14 years of
/// five-day weeks).
pub const DEFAULT_MAX_PROBE_DAYS: u32 = 3660;

/// Per-run scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// "Now": nothing is placed before midnight of this day.
    pub horizon: NaiveDate,
    /// Working-day policy of the scheduling context.
    #[serde(default)]
    pub work_week: WorkWeek,
    /// Length of a working day for tasks without resources (minutes).
    #[serde(default = "default_workday_minutes")]
    pub workday_minutes: u32,
    /// How many working days the capacity search may probe.
    #[serde(default = "default_max_probe_days")]
    pub max_probe_days: u32,
}

fn default_workday_minutes() -> u32 {
    DEFAULT_WORKDAY_MINUTES
}

fn default_max_probe_days() -> u32 {
    DEFAULT_MAX_PROBE_DAYS
}

impl SchedulerConfig {
    /// Creates a configuration starting at `horizon`.
    pub fn new(horizon: NaiveDate) -> Self {
        Self {
            horizon,
            work_week: WorkWeek::default(),
            workday_minutes: DEFAULT_WORKDAY_MINUTES,
            max_probe_days: DEFAULT_MAX_PROBE_DAYS,
        }
    }

    /// Creates a configuration starting at today's local date.
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    /// Sets the work-week policy.
    pub fn with_work_week(mut self, work_week: WorkWeek) -> Self {
        self.work_week = work_week;
        self
    }

    /// Sets the working-day length (minutes).
    pub fn with_workday_minutes(mut self, minutes: u32) -> Self {
        self.workday_minutes = minutes;
        self
    }

    /// Sets the capacity search limit (working days).
    pub fn with_max_probe_days(mut self, days: u32) -> Self {
        self.max_probe_days = days;
        self
    }

    /// Midnight of the horizon day.
    pub fn now(&self) -> NaiveDateTime {
        day_start(self.horizon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let horizon = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let config = SchedulerConfig::new(horizon)
            .with_work_week(WorkWeek::SixDay)
            .with_workday_minutes(420)
            .with_max_probe_days(30);

        assert_eq!(config.work_week, WorkWeek::SixDay);
        assert_eq!(config.workday_minutes, 420);
        assert_eq!(config.max_probe_days, 30);
        assert_eq!(config.now(), horizon.and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: SchedulerConfig = serde_json::from_str(r#"{"horizon":"2024-01-01"}"#).unwrap();
        assert_eq!(config.work_week, WorkWeek::FiveDay);
        assert_eq!(config.workday_minutes, DEFAULT_WORKDAY_MINUTES);
        assert_eq!(config.max_probe_days, DEFAULT_MAX_PROBE_DAYS);
    }

    #[test]
    fn test_config_rejects_bad_week() {
        let result =
            serde_json::from_str::<SchedulerConfig>(r#"{"horizon":"2024-01-01","work_week":2}"#);
        assert!(result.is_err());
    }
}
