//! Work-week calendar.
//!
//! Working-day arithmetic over a days-per-week policy. All functions are
//! pure: the same day and policy always give the same answer.
//!
//! # Policies
//!
//! | Days per week | Excluded weekdays |
//! |---------------|-------------------|
//! | 7 | none |
//! | 6 | Sunday |
//! | 5 | Saturday, Sunday |
//!
//! # Time Model
//! Days are `NaiveDate` and instants are `NaiveDateTime`, both in the
//! caller's local time. An instant at midnight + N minutes sits N minutes
//! into that day's capacity.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Direction of a placement search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward later dates.
    Forward,
    /// Toward earlier dates.
    Backward,
}

impl Direction {
    /// One calendar day in this direction.
    #[inline]
    fn unit(self) -> TimeDelta {
        match self {
            Direction::Forward => TimeDelta::days(1),
            Direction::Backward => TimeDelta::days(-1),
        }
    }

    /// Whether this is the backward direction.
    #[inline]
    pub fn is_backward(self) -> bool {
        self == Direction::Backward
    }
}

/// Days-per-week working policy.
///
/// Serialized as the number of working days (`5`, `6` or `7`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WorkWeek {
    /// Monday to Friday.
    #[default]
    FiveDay,
    /// Monday to Saturday.
    SixDay,
    /// Every day.
    SevenDay,
}

impl WorkWeek {
    /// Builds a policy from a days-per-week count.
    pub fn from_days(days: u8) -> Result<Self, ScheduleError> {
        match days {
            5 => Ok(WorkWeek::FiveDay),
            6 => Ok(WorkWeek::SixDay),
            7 => Ok(WorkWeek::SevenDay),
            other => Err(ScheduleError::InvalidWorkWeek(other)),
        }
    }

    /// Number of working days per week.
    pub fn days_per_week(self) -> u8 {
        match self {
            WorkWeek::FiveDay => 5,
            WorkWeek::SixDay => 6,
            WorkWeek::SevenDay => 7,
        }
    }

    /// Whether `day` is a working day under this policy.
    pub fn is_working_day(self, day: NaiveDate) -> bool {
        match day.weekday() {
            Weekday::Sat => self.days_per_week() >= 6,
            Weekday::Sun => self.days_per_week() >= 7,
            _ => true,
        }
    }

    /// First working day strictly after `day`.
    pub fn next_working_day(self, day: NaiveDate) -> NaiveDate {
        self.step(day, Direction::Forward)
    }

    /// Last working day strictly before `day`.
    pub fn previous_working_day(self, day: NaiveDate) -> NaiveDate {
        self.step(day, Direction::Backward)
    }

    /// Moves one working day in `direction`.
    pub fn step(self, day: NaiveDate, direction: Direction) -> NaiveDate {
        self.align(day + direction.unit(), direction)
    }

    /// Returns `day` if it is a working day, otherwise the nearest working
    /// day in `direction`.
    pub fn align(self, day: NaiveDate, direction: Direction) -> NaiveDate {
        let mut day = day;
        while !self.is_working_day(day) {
            day += direction.unit();
        }
        day
    }
}

impl TryFrom<u8> for WorkWeek {
    type Error = ScheduleError;

    fn try_from(days: u8) -> Result<Self, Self::Error> {
        WorkWeek::from_days(days)
    }
}

impl From<WorkWeek> for u8 {
    fn from(week: WorkWeek) -> Self {
        week.days_per_week()
    }
}

/// Midnight at the start of `day`.
#[inline]
pub fn day_start(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// The instant `minutes` into `day`.
#[inline]
pub fn minutes_into(day: NaiveDate, minutes: u32) -> NaiveDateTime {
    day_start(day) + TimeDelta::minutes(i64::from(minutes))
}

/// First day whose midnight is at or after `instant`.
pub fn ceil_day(instant: NaiveDateTime) -> NaiveDate {
    if instant.time() == NaiveTime::MIN {
        instant.date()
    } else {
        instant.date() + TimeDelta::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_five_day_week_skips_weekend() {
        let week = WorkWeek::FiveDay;
        // 2024-01-05 is a Friday
        assert_eq!(week.next_working_day(date(2024, 1, 5)), date(2024, 1, 8));
        assert_eq!(week.previous_working_day(date(2024, 1, 8)), date(2024, 1, 5));
        assert!(!week.is_working_day(date(2024, 1, 6)));
        assert!(!week.is_working_day(date(2024, 1, 7)));
    }

    #[test]
    fn test_six_day_week_keeps_saturday() {
        let week = WorkWeek::SixDay;
        assert_eq!(week.next_working_day(date(2024, 1, 5)), date(2024, 1, 6));
        assert_eq!(week.next_working_day(date(2024, 1, 6)), date(2024, 1, 8));
        assert_eq!(week.previous_working_day(date(2024, 1, 8)), date(2024, 1, 6));
    }

    #[test]
    fn test_seven_day_week() {
        let week = WorkWeek::SevenDay;
        assert_eq!(week.next_working_day(date(2024, 1, 5)), date(2024, 1, 6));
        assert_eq!(week.previous_working_day(date(2024, 1, 7)), date(2024, 1, 6));
    }

    #[test]
    fn test_never_returns_excluded_day() {
        for week in [WorkWeek::FiveDay, WorkWeek::SixDay, WorkWeek::SevenDay] {
            let mut day = date(2024, 1, 1);
            for _ in 0..60 {
                let next = week.next_working_day(day);
                let prev = week.previous_working_day(day);
                assert!(week.is_working_day(next));
                assert!(week.is_working_day(prev));
                assert!(next > day && prev < day);
                day += TimeDelta::days(1);
            }
        }
    }

    #[test]
    fn test_full_week_returns_to_same_weekday() {
        for week in [WorkWeek::FiveDay, WorkWeek::SixDay, WorkWeek::SevenDay] {
            let start = date(2024, 1, 3); // Wednesday
            let mut forward = start;
            let mut backward = start;
            for _ in 0..week.days_per_week() {
                forward = week.next_working_day(forward);
                backward = week.previous_working_day(backward);
            }
            assert_eq!(forward, start + TimeDelta::days(7));
            assert_eq!(backward, start - TimeDelta::days(7));
        }
    }

    #[test]
    fn test_align() {
        let week = WorkWeek::FiveDay;
        let saturday = date(2024, 1, 6);
        assert_eq!(week.align(saturday, Direction::Forward), date(2024, 1, 8));
        assert_eq!(week.align(saturday, Direction::Backward), date(2024, 1, 5));
        assert_eq!(week.align(date(2024, 1, 3), Direction::Forward), date(2024, 1, 3));
    }

    #[test]
    fn test_work_week_from_days() {
        assert_eq!(WorkWeek::from_days(6).unwrap(), WorkWeek::SixDay);
        assert!(matches!(
            WorkWeek::from_days(4),
            Err(ScheduleError::InvalidWorkWeek(4))
        ));
    }

    #[test]
    fn test_work_week_serde() {
        let week: WorkWeek = serde_json::from_str("6").unwrap();
        assert_eq!(week, WorkWeek::SixDay);
        assert_eq!(serde_json::to_string(&WorkWeek::FiveDay).unwrap(), "5");
        assert!(serde_json::from_str::<WorkWeek>("3").is_err());
    }

    #[test]
    fn test_instant_helpers() {
        let day = date(2024, 1, 2);
        assert_eq!(minutes_into(day, 90).time(), NaiveTime::from_hms_opt(1, 30, 0).unwrap());
        assert_eq!(ceil_day(day_start(day)), day);
        assert_eq!(ceil_day(minutes_into(day, 1)), date(2024, 1, 3));
    }
}
