//! Capacity-aware Gantt scheduling.
//!
//! Places project tasks on a calendar so that dependencies are respected,
//! due dates are met just in time where possible, and no resource is booked
//! beyond its daily capacity.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Milestone`, `Resource`,
//!   `WorkWeek`, `DateRange`, `SchedulePlan`
//! - **`scheduler`**: `GanttScheduler`, the capacity ledger, anchor
//!   resolution, dependency walks and KPIs
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling
//!   references, capacities)
//! - **`error`**: `ScheduleError` and the crate `Result`
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use u_gantt::models::{Resource, Task};
//! use u_gantt::scheduler::{GanttScheduler, ScheduleRequest, SchedulerConfig};
//!
//! let horizon = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let due = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap().and_hms_opt(23, 59, 0).unwrap();
//! let request = ScheduleRequest::new(
//!     vec![Task::new("T1").with_remaining(480).with_resource("U1").with_due(due)],
//!     vec![Resource::new("U1")],
//!     SchedulerConfig::new(horizon),
//! );
//!
//! let plan = GanttScheduler::new(&request).unwrap().schedule().unwrap();
//! // Placed just in time: the due day itself
//! assert_eq!(plan.task("T1").unwrap().start_day(), due.date());
//! ```
//!
//! # Logging
//!
//! Diagnostics go through `tracing`; the crate never installs a subscriber.

pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{Result, ScheduleError};
