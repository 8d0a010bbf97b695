//! Anchor resolution.
//!
//! Decides where the capacity search for a task starts and which way it
//! moves. Three forces compete:
//!
//! - a `before` bound: the task must end by this instant (a successor or
//!   an external drag needs it done),
//! - an `after` bound: the task may not start before this instant (its
//!   predecessors end there),
//! - the task's own due date and pinned schedule date.
//!
//! # Rules
//! 1. With a schedule date or a bound, seed from it (schedule date first).
//!    The search runs backward unless only `after` is given.
//! 2. Backward: the tightest of `before`, due date and schedule date is the
//!    deadline; the start day is the last working day whose share of the
//!    work still ends by it, walked back over the working days the
//!    remaining work needs.
//! 3. Forward: a binding `after` wins. Otherwise the tighter of due date
//!    and schedule date pulls the task just in time (backward from that
//!    deadline), unless that would start before `after`, in which case it
//!    starts at `after`.
//! 4. Nothing starts before the horizon or before `after`; a day that
//!    would is clamped to that floor and the direction becomes forward.
//! 5. Without schedule date or bounds: the horizon, forward.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use super::SchedulerConfig;
use crate::error::{Result, ScheduleError};
use crate::models::{ceil_day, Direction};

/// Optional placement bounds for one task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    /// The task must end no later than this.
    pub before: Option<NaiveDateTime>,
    /// The task must start no earlier than this.
    pub after: Option<NaiveDateTime>,
}

impl Bounds {
    /// No bounds.
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds external bounds, rejecting `after` later than `before`.
    pub fn new(before: Option<NaiveDateTime>, after: Option<NaiveDateTime>) -> Result<Self> {
        if let (Some(before), Some(after)) = (before, after) {
            if after > before {
                return Err(ScheduleError::InvalidAnchor { before, after });
            }
        }
        Ok(Self { before, after })
    }

    /// Only a `before` bound.
    pub fn ending_before(before: NaiveDateTime) -> Self {
        Self {
            before: Some(before),
            after: None,
        }
    }

    /// Only an `after` bound.
    pub fn starting_after(after: NaiveDateTime) -> Self {
        Self {
            before: None,
            after: Some(after),
        }
    }

    /// Tightens `before` to `instant` if it is earlier.
    pub fn tighten_before(&mut self, instant: NaiveDateTime) {
        self.before = Some(self.before.map_or(instant, |b| b.min(instant)));
    }

    /// Tightens `after` to `instant` if it is later.
    pub fn tighten_after(&mut self, instant: NaiveDateTime) {
        self.after = Some(self.after.map_or(instant, |a| a.max(instant)));
    }

    /// Whether neither bound is set.
    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

/// Remaining work expressed as whole working days plus leftover minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkSpan {
    /// Full working days.
    pub days: u32,
    /// Minutes beyond the full days.
    pub rem: u32,
    /// Minutes in one working day.
    pub workday: u32,
}

impl WorkSpan {
    /// Splits `minutes` into days of `workday_minutes`.
    pub fn of(minutes: u32, workday_minutes: u32) -> Self {
        let workday = workday_minutes.max(1);
        Self {
            days: minutes / workday,
            rem: minutes % workday,
            workday,
        }
    }

    /// Minutes booked on the last working day.
    pub fn last_share(&self) -> u32 {
        match (self.days, self.rem) {
            (_, rem) if rem > 0 => rem,
            (0, _) => 0,
            _ => self.workday,
        }
    }

    /// Working days touched by the work (at least one).
    pub fn working_days(&self) -> u32 {
        (self.days + u32::from(self.rem > 0)).max(1)
    }
}

/// The anchor-relevant facts of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorTarget {
    /// Pinned or previously computed schedule date.
    pub scheduled_at: Option<NaiveDateTime>,
    /// Effective due date (own, else the milestone's anchor).
    pub due_at: Option<NaiveDateTime>,
    /// Remaining work.
    pub span: WorkSpan,
}

/// Where and which way to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// First day to probe.
    pub day: NaiveDate,
    /// Search direction.
    pub direction: Direction,
    /// Earliest allowed start day (horizon or `after`, whichever is later).
    pub floor: NaiveDate,
    /// Instant a backward search must end by; `None` when searching forward.
    pub deadline: Option<NaiveDateTime>,
}

/// Anchor arithmetic over one configuration.
#[derive(Debug, Clone, Copy)]
pub struct AnchorResolver<'a> {
    config: &'a SchedulerConfig,
}

impl<'a> AnchorResolver<'a> {
    /// Creates a resolver.
    pub fn new(config: &'a SchedulerConfig) -> Self {
        Self { config }
    }

    /// Resolves direction and seed day from the schedule date and bounds.
    pub fn resolve(&self, target: &AnchorTarget, bounds: &Bounds) -> Anchor {
        let seed = target
            .scheduled_at
            .map(|t| t.date())
            .or(bounds.before.map(|t| t.date()))
            .or(bounds.after.map(ceil_day));

        match seed {
            Some(seed) => {
                let direction = if bounds.before.is_none() && bounds.after.is_some() {
                    Direction::Forward
                } else {
                    Direction::Backward
                };
                self.override_day(target, seed, bounds, direction)
            }
            None => self.clamp(self.config.horizon, Direction::Forward, self.floor(bounds), None),
        }
    }

    /// Refines a seed day into the day the capacity search starts from.
    ///
    /// The result is a working day no earlier than the floor.
    pub fn override_day(
        &self,
        target: &AnchorTarget,
        seed: NaiveDate,
        bounds: &Bounds,
        direction: Direction,
    ) -> Anchor {
        let own_deadline = [target.due_at, target.scheduled_at].into_iter().flatten().min();
        let (day, direction, deadline) = match direction {
            Direction::Backward => match own_deadline.into_iter().chain(bounds.before).min() {
                Some(deadline) => (
                    self.start_for_deadline(deadline, target.span),
                    Direction::Backward,
                    Some(deadline),
                ),
                None => (seed, Direction::Backward, None),
            },
            Direction::Forward => {
                let after_day = bounds.after.map(ceil_day);
                match (after_day, own_deadline) {
                    (Some(after_day), _) if after_day > seed => (after_day, Direction::Forward, None),
                    (after_day, Some(deadline)) => {
                        let just_in_time = self.start_for_deadline(deadline, target.span);
                        match after_day {
                            // Too late for the deadline: as soon as allowed.
                            Some(after_day) if just_in_time < after_day => (after_day, Direction::Forward, None),
                            _ => (just_in_time, Direction::Backward, Some(deadline)),
                        }
                    }
                    _ => (seed, Direction::Forward, None),
                }
            }
        };
        self.clamp(day, direction, self.floor(bounds), deadline)
    }

    /// Start day for work of `span` that must end by `deadline`.
    ///
    /// The deadline's own day counts only if the last day's share fits
    /// before the deadline's time of day; midnight always excludes it.
    pub fn start_for_deadline(&self, deadline: NaiveDateTime, span: WorkSpan) -> NaiveDate {
        let week = self.config.work_week;
        let day = deadline.date();
        let minutes_before = deadline.time().num_seconds_from_midnight() / 60;
        let fits = minutes_before > 0 && minutes_before >= span.last_share();
        let last = if fits || !week.is_working_day(day) {
            day
        } else {
            day - TimeDelta::days(1)
        };
        let mut day = week.align(last, Direction::Backward);
        for _ in 1..span.working_days() {
            day = week.previous_working_day(day);
        }
        day
    }

    fn floor(&self, bounds: &Bounds) -> NaiveDate {
        let horizon = self.config.horizon;
        bounds.after.map_or(horizon, |a| ceil_day(a).max(horizon))
    }

    fn clamp(
        &self,
        day: NaiveDate,
        direction: Direction,
        floor: NaiveDate,
        deadline: Option<NaiveDateTime>,
    ) -> Anchor {
        let week = self.config.work_week;
        let forward_from_floor = Anchor {
            day: week.align(floor, Direction::Forward),
            direction: Direction::Forward,
            floor,
            deadline: None,
        };
        if day < floor {
            return forward_from_floor;
        }
        let aligned = week.align(day, direction);
        if aligned < floor {
            return forward_from_floor;
        }
        Anchor {
            day: aligned,
            direction,
            floor,
            deadline: deadline.filter(|_| direction.is_backward()),
        }
    }
}
