//! Scheduling domain models.
//!
//! Provides the data types a scheduling run consumes and produces.
//! Project-management flavoured, but nothing here knows about storage
//! or rendering.
//!
//! # Domain Mappings
//!
//! | u-gantt | Project tool | Agency | Maintenance |
//! |---------|--------------|--------|-------------|
//! | Task | Ticket | Deliverable | Work order |
//! | Milestone | Release | Campaign | Outage window |
//! | Resource | Developer | Designer | Technician |
//! | SchedulePlan | Gantt chart | Staffing plan | Shift roster |

mod calendar;
mod milestone;
mod resource;
mod schedule;
mod task;

pub use calendar::{ceil_day, day_start, minutes_into, Direction, WorkWeek};
pub use milestone::Milestone;
pub use resource::{Resource, DEFAULT_WORKDAY_MINUTES, MINUTES_PER_DAY};
pub use schedule::{DateRange, SchedulePlan};
pub(crate) use schedule::widen;
pub use task::{end_of_day, Task};
