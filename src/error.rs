//! Error types for scheduling runs.
//!
//! Only hard failures are represented here. Dependency cycles, busy days
//! and backward searches that hit the horizon are absorbed by the engine.
//! After any error the [`SchedulingContext`](crate::scheduler::SchedulingContext)
//! of the failed run must be discarded.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that abort a scheduling run.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Structural problems in the supplied tasks, milestones or resources.
    #[error("invalid scheduling input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),

    /// A resource with no daily capacity reached the allocator.
    #[error("resource '{resource_id}' has no daily capacity")]
    MissingResourceCapacity { resource_id: String },

    /// A resource claims more minutes than a calendar day holds.
    #[error("resource '{resource_id}' capacity of {minutes} minutes exceeds one day")]
    InvalidCapacity { resource_id: String, minutes: u32 },

    /// Days-per-week outside the supported 5/6/7 policies.
    #[error("unsupported work week of {0} days (expected 5, 6 or 7)")]
    InvalidWorkWeek(u8),

    /// External bounds that cannot both hold.
    #[error("bound 'after' ({after}) is later than bound 'before' ({before})")]
    InvalidAnchor {
        before: NaiveDateTime,
        after: NaiveDateTime,
    },

    /// A pre-loaded allocation would push a resource over its capacity.
    #[error(
        "resource '{resource_id}' over-allocated on {day}: {used} + {requested} > {capacity} minutes"
    )]
    OverAllocation {
        resource_id: String,
        day: NaiveDate,
        used: u32,
        requested: u32,
        capacity: u32,
    },

    /// A root or bound refers to a task that is not part of the input.
    #[error("unknown task '{0}'")]
    UnknownTask(String),

    /// The capacity search gave up.
    #[error("no free capacity for task '{task_id}' within {days} working days of {from}")]
    CapacityNotFound {
        task_id: String,
        from: NaiveDate,
        days: u32,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}
