//! Capacity-aware Gantt scheduler and KPI evaluation.
//!
//! # Algorithm
//!
//! `GanttScheduler` places each task by resolving an anchor day and search
//! direction from its due date, pinned date and bounds, recursively placing
//! its dependency chain first, then probing a per-(day, resource) capacity
//! ledger day by day. Placement is greedy and memoized: each task is placed
//! once per run, in input order. It is not optimal, but it is deterministic
//! and respects every resource's daily capacity.
//!
//! # Building Blocks
//!
//! - [`CapacityLedger`]: committed minutes per day and resource
//! - [`AnchorResolver`]: start day and direction from dates and bounds
//! - [`collect_chain`]: cycle-safe dependency walk
//! - [`SchedulingContext`]: per-run ledger, memo and in-progress stack
//!
//! # KPI
//!
//! `ScheduleKpi` classifies tasks (overdue, late, on track) against their
//! effective due dates and reports lateness, on-time rate and late
//! milestones.

mod anchor;
mod collector;
mod config;
mod context;
mod engine;
mod graph;
mod kpi;
mod ledger;

pub use anchor::{Anchor, AnchorResolver, AnchorTarget, Bounds, WorkSpan};
pub use collector::{collect_chain, Walk, WalkState};
pub use config::{SchedulerConfig, DEFAULT_MAX_PROBE_DAYS};
pub use context::SchedulingContext;
pub use engine::{GanttScheduler, ScheduleRequest};
pub use graph::TaskGraph;
pub use kpi::{ScheduleKpi, TaskStatus};
pub use ledger::CapacityLedger;
