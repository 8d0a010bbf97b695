//! Capacity ledger and allocator.
//!
//! Records minutes committed per (day, resource) during one scheduling
//! run and answers whether a task's remaining work fits.
//!
//! # Allocation Model
//! A task needing `d` minutes on a resource with daily capacity `c`
//! consumes `min(d, c)` minutes per working day of that resource, starting
//! at the candidate day, until `d` is used up. A day fits if its already
//! committed minutes plus the day's share stay within `c`. Each day's
//! share is placed right after the minutes already committed that day, so
//! the returned instants are offsets into the day's capacity.
//!
//! Probing (`has_capacity`, `preview`) never mutates; `commit` is only
//! called after a successful probe, so there is no rollback path.

use std::collections::HashMap;
use std::iter;

use chrono::NaiveDate;
use tracing::trace;

use crate::error::{Result, ScheduleError};
use crate::models::{day_start, minutes_into, DateRange, Direction, Resource, MINUTES_PER_DAY};

/// Minutes committed per day and resource within one run.
///
/// Grows monotonically; nothing is ever released.
#[derive(Debug, Clone, Default)]
pub struct CapacityLedger {
    used: HashMap<NaiveDate, HashMap<String, u32>>,
}

impl CapacityLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Minutes already committed for `resource_id` on `day`.
    pub fn used(&self, day: NaiveDate, resource_id: &str) -> u32 {
        self.used
            .get(&day)
            .and_then(|by_resource| by_resource.get(resource_id))
            .copied()
            .unwrap_or(0)
    }

    /// Minutes still free for `resource` on `day`.
    pub fn free(&self, day: NaiveDate, resource: &Resource) -> u32 {
        resource
            .daily_capacity_minutes
            .saturating_sub(self.used(day, &resource.id))
    }

    /// Records minutes consumed outside the run (fixed bookings, leave).
    ///
    /// Fails instead of exceeding the resource's capacity.
    pub fn allocate(&mut self, day: NaiveDate, resource: &Resource, minutes: u32) -> Result<()> {
        let capacity = checked_capacity(resource)?;
        let used = self.used(day, &resource.id);
        if used.checked_add(minutes).map_or(true, |total| total > capacity) {
            return Err(ScheduleError::OverAllocation {
                resource_id: resource.id.clone(),
                day,
                used,
                requested: minutes,
                capacity,
            });
        }
        self.add(day, &resource.id, minutes);
        Ok(())
    }

    /// Whether every resource can absorb `minutes` of work starting at
    /// `start`.
    ///
    /// Trivially true with no resources or no work.
    pub fn has_capacity(&self, resources: &[&Resource], minutes: u32, start: NaiveDate) -> Result<bool> {
        for resource in resources {
            let capacity = checked_capacity(resource)?;
            for (day, share) in daily_shares(resource, capacity, minutes, start) {
                let used = self.used(day, &resource.id);
                trace!(resource = %resource.id, %day, used, share, capacity, "probing");
                if used + share > capacity {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Commits `minutes` of work for every resource starting at `start`.
    ///
    /// Returns the latest first-segment start and the latest last-segment
    /// end across the resources. With no resources or no work the result
    /// is a zero-length range at midnight of `start`.
    pub fn commit(&mut self, resources: &[&Resource], minutes: u32, start: NaiveDate) -> Result<DateRange> {
        let (range, bookings) = self.layout(resources, minutes, start)?;
        for (day, resource_id, share) in bookings {
            self.add(day, resource_id, share);
        }
        Ok(range)
    }

    /// The range `commit` would return, without booking anything.
    pub fn preview(&self, resources: &[&Resource], minutes: u32, start: NaiveDate) -> Result<DateRange> {
        self.layout(resources, minutes, start).map(|(range, _)| range)
    }

    /// Computes the committed range and the (day, resource, minutes)
    /// bookings behind it. Each booking lands on its own key, so offsets
    /// can all be read before any is written.
    fn layout<'r>(
        &self,
        resources: &[&'r Resource],
        minutes: u32,
        start: NaiveDate,
    ) -> Result<(DateRange, Vec<(NaiveDate, &'r str, u32)>)> {
        let anchor = day_start(start);
        let mut bookings = Vec::new();
        if resources.is_empty() || minutes == 0 {
            return Ok((DateRange::point(anchor), bookings));
        }

        let mut range: Option<DateRange> = None;
        for &resource in resources {
            let capacity = checked_capacity(resource)?;
            let mut first = None;
            let mut last = anchor;
            for (day, share) in daily_shares(resource, capacity, minutes, start) {
                let offset = self.used(day, &resource.id);
                first.get_or_insert(minutes_into(day, offset));
                last = minutes_into(day, offset + share);
                bookings.push((day, resource.id.as_str(), share));
            }
            let segment = DateRange::new(first.unwrap_or(anchor), last);
            range = Some(match range {
                None => segment,
                Some(r) => DateRange::new(r.start.max(segment.start), r.end.max(segment.end)),
            });
        }
        Ok((range.unwrap_or_else(|| DateRange::point(anchor)), bookings))
    }

    /// All non-empty (day, resource, minutes) entries.
    pub fn entries(&self) -> impl Iterator<Item = (NaiveDate, &str, u32)> + '_ {
        self.used.iter().flat_map(|(day, by_resource)| {
            by_resource
                .iter()
                .map(move |(rid, minutes)| (*day, rid.as_str(), *minutes))
        })
    }

    /// Whether nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    fn add(&mut self, day: NaiveDate, resource_id: &str, minutes: u32) {
        *self
            .used
            .entry(day)
            .or_default()
            .entry(resource_id.to_string())
            .or_insert(0) += minutes;
    }
}

fn checked_capacity(resource: &Resource) -> Result<u32> {
    match resource.daily_capacity_minutes {
        0 => Err(ScheduleError::MissingResourceCapacity {
            resource_id: resource.id.clone(),
        }),
        minutes if minutes > MINUTES_PER_DAY => Err(ScheduleError::InvalidCapacity {
            resource_id: resource.id.clone(),
            minutes,
        }),
        minutes => Ok(minutes),
    }
}

/// Per-day shares of `minutes` for one resource, over its working days
/// from `start` on. `capacity` must be positive.
fn daily_shares(
    resource: &Resource,
    capacity: u32,
    minutes: u32,
    start: NaiveDate,
) -> impl Iterator<Item = (NaiveDate, u32)> + '_ {
    let mut remaining = minutes;
    let mut day = resource.work_week.align(start, Direction::Forward);
    iter::from_fn(move || {
        if remaining == 0 {
            return None;
        }
        let share = remaining.min(capacity);
        let current = day;
        remaining -= share;
        day = resource.work_week.next_working_day(day);
        Some((current, share))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkWeek;
    use chrono::NaiveDateTime;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        date(d).and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = CapacityLedger::new();
        let r = Resource::new("U1");
        assert!(ledger.is_empty());
        assert_eq!(ledger.used(date(1), "U1"), 0);
        assert_eq!(ledger.free(date(1), &r), 480);
    }

    #[test]
    fn test_has_capacity_rejects_partial_day() {
        let r = Resource::new("U1");
        let mut ledger = CapacityLedger::new();
        ledger.allocate(date(1), &r, 300).unwrap();

        // 300 + 240 > 480
        assert!(!ledger.has_capacity(&[&r], 240, date(1)).unwrap());
        assert!(ledger.has_capacity(&[&r], 180, date(1)).unwrap());
        assert!(ledger.has_capacity(&[&r], 240, date(2)).unwrap());
    }

    #[test]
    fn test_has_capacity_is_pure() {
        let r = Resource::new("U1");
        let ledger = CapacityLedger::new();
        assert!(ledger.has_capacity(&[&r], 2000, date(1)).unwrap());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_multi_day_needs_full_days() {
        let r = Resource::new("U1");
        let mut ledger = CapacityLedger::new();
        ledger.allocate(date(2), &r, 60).unwrap();

        // 3 days from Monday touches Tuesday, which is partly booked
        assert!(!ledger.has_capacity(&[&r], 1440, date(1)).unwrap());
        assert!(ledger.has_capacity(&[&r], 1440, date(3)).unwrap());
    }

    #[test]
    fn test_commit_offsets_into_day() {
        let r = Resource::new("U1");
        let mut ledger = CapacityLedger::new();
        ledger.allocate(date(1), &r, 120).unwrap();

        let range = ledger.commit(&[&r], 240, date(1)).unwrap();
        assert_eq!(range.start, at(1, 2, 0));
        assert_eq!(range.end, at(1, 6, 0));
        assert_eq!(ledger.used(date(1), "U1"), 360);
    }

    #[test]
    fn test_commit_spans_weekend() {
        let r = Resource::new("U1");
        let mut ledger = CapacityLedger::new();

        // Friday 5th, 600 minutes: 480 Friday, 120 Monday
        let range = ledger.commit(&[&r], 600, date(5)).unwrap();
        assert_eq!(range.start, at(5, 0, 0));
        assert_eq!(range.end, at(8, 2, 0));
        assert_eq!(ledger.used(date(5), "U1"), 480);
        assert_eq!(ledger.used(date(6), "U1"), 0);
        assert_eq!(ledger.used(date(8), "U1"), 120);
    }

    #[test]
    fn test_commit_aligns_to_resource_week() {
        let r = Resource::new("U1").with_work_week(WorkWeek::FiveDay);
        let mut ledger = CapacityLedger::new();
        let range = ledger.commit(&[&r], 60, date(6)).unwrap(); // Saturday
        assert_eq!(range.start, at(8, 0, 0));
        assert_eq!(ledger.used(date(6), "U1"), 0);
    }

    #[test]
    fn test_commit_multiple_resources() {
        let a = Resource::new("A");
        let b = Resource::new("B").with_daily_capacity(240);
        let mut ledger = CapacityLedger::new();
        ledger.allocate(date(1), &a, 60).unwrap();

        let range = ledger.commit(&[&a, &b], 300, date(1)).unwrap();
        // A: Mon 01:00..06:00; B: Mon 00:00..04:00, Tue 00:00..01:00
        assert_eq!(range.start, at(1, 1, 0));
        assert_eq!(range.end, at(2, 1, 0));
        assert_eq!(ledger.used(date(1), "A"), 360);
        assert_eq!(ledger.used(date(1), "B"), 240);
        assert_eq!(ledger.used(date(2), "B"), 60);
    }

    #[test]
    fn test_commit_without_resources_is_point() {
        let mut ledger = CapacityLedger::new();
        let range = ledger.commit(&[], 240, date(3)).unwrap();
        assert!(range.is_point());
        assert_eq!(range.start, at(3, 0, 0));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_zero_capacity_fails_fast() {
        let r = Resource::new("U0").with_daily_capacity(0);
        let ledger = CapacityLedger::new();
        let err = ledger.has_capacity(&[&r], 60, date(1)).unwrap_err();
        assert!(matches!(err, ScheduleError::MissingResourceCapacity { .. }));
    }

    #[test]
    fn test_allocate_rejects_overflow() {
        let r = Resource::new("U1");
        let mut ledger = CapacityLedger::new();
        ledger.allocate(date(1), &r, 400).unwrap();
        let err = ledger.allocate(date(1), &r, 100).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::OverAllocation { used: 400, requested: 100, capacity: 480, .. }
        ));
        assert_eq!(ledger.used(date(1), "U1"), 400);

        let err = ledger.allocate(date(1), &r, u32::MAX).unwrap_err();
        assert!(matches!(err, ScheduleError::OverAllocation { used: 400, .. }));
        assert_eq!(ledger.used(date(1), "U1"), 400);
    }

    #[test]
    fn test_preview_matches_commit() {
        let r = Resource::new("U1");
        let mut ledger = CapacityLedger::new();
        ledger.allocate(date(8), &r, 60).unwrap();

        let preview = ledger.preview(&[&r], 600, date(5)).unwrap();
        assert_eq!(ledger.used(date(5), "U1"), 0);
        let committed = ledger.commit(&[&r], 600, date(5)).unwrap();
        assert_eq!(preview, committed);
        // Friday 00:00..08:00, Monday 01:00..03:00
        assert_eq!(committed.start, at(5, 0, 0));
        assert_eq!(committed.end, at(8, 3, 0));
        assert_eq!(ledger.used(date(8), "U1"), 180);
    }

    #[test]
    fn test_preview_shows_weekend_shift() {
        // Saturday start for a five-day resource lands on Monday
        let r = Resource::new("U1").with_work_week(WorkWeek::FiveDay);
        let ledger = CapacityLedger::new();
        let range = ledger.preview(&[&r], 480, date(6)).unwrap();
        assert_eq!(range.end, at(8, 8, 0));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_entries() {
        let r = Resource::new("U1");
        let mut ledger = CapacityLedger::new();
        ledger.commit(&[&r], 960, date(1)).unwrap();
        let mut entries: Vec<_> = ledger.entries().collect();
        entries.sort();
        assert_eq!(entries, vec![(date(1), "U1", 480), (date(2), "U1", 480)]);
    }
}
