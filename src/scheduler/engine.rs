//! Recursive Gantt scheduler.
//!
//! # Algorithm
//!
//! For each root task (bounded roots first, then input order):
//!
//! 1. Return the memoized placement, or nothing if the task is already
//!    being placed further up the stack (a cycle).
//! 2. Resolve an initial anchor from the task's dates and bounds.
//! 3. Collect the dependency chain and place it recursively from the back,
//!    each member bounded by the span of the members placed before it.
//! 4. Tighten the task's bounds with the chain's span: a predecessor chain
//!    sets `after` to its latest end, a successor chain sets `before` to
//!    the midnight of its earliest start.
//! 5. Re-resolve the anchor with those bounds.
//! 6. Zero-length or unassigned tasks collapse to a point at the anchor
//!    day. Otherwise probe the ledger day by day in the anchor direction.
//!    A backward probe is accepted only if the work would also end by the
//!    anchor's deadline; a backward search that would drop below the floor
//!    turns forward.
//! 7. Commit, memoize, and fold into the milestone and overall ranges.
//!
//! # Complexity
//! Each task is placed once; each placement walks its transitive
//! dependencies once, so O(n · (n + e)) plus the probed days.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::anchor::{Anchor, AnchorResolver, AnchorTarget, Bounds, WorkSpan};
use super::collector::{collect_chain, Walk, WalkState};
use super::{SchedulerConfig, SchedulingContext, TaskGraph};
use crate::error::{Result, ScheduleError};
use crate::models::{day_start, widen, DateRange, Direction, Milestone, Resource, SchedulePlan, Task};
use crate::validation::validate_input;

/// Input container for a scheduling run.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Tasks to place.
    pub tasks: Vec<Task>,
    /// Milestones the tasks belong to.
    pub milestones: Vec<Milestone>,
    /// Assignable resources.
    pub resources: Vec<Resource>,
    /// Horizon and calendar policy.
    pub config: SchedulerConfig,
    /// External bounds per root task (drag/edit constraints).
    pub bounds: HashMap<String, Bounds>,
}

impl ScheduleRequest {
    /// Creates a new request.
    pub fn new(tasks: Vec<Task>, resources: Vec<Resource>, config: SchedulerConfig) -> Self {
        Self {
            tasks,
            milestones: Vec::new(),
            resources,
            config,
            bounds: HashMap::new(),
        }
    }

    /// Sets the milestones.
    pub fn with_milestones(mut self, milestones: Vec<Milestone>) -> Self {
        self.milestones = milestones;
        self
    }

    /// Constrains one root task.
    pub fn with_bounds(mut self, task_id: impl Into<String>, bounds: Bounds) -> Self {
        self.bounds.insert(task_id.into(), bounds);
        self
    }
}

/// Capacity-aware recursive scheduler over one request.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_gantt::models::{Resource, Task};
/// use u_gantt::scheduler::{GanttScheduler, ScheduleRequest, SchedulerConfig};
///
/// let horizon = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let tasks = vec![
///     Task::new("A").with_remaining(960).with_resource("U1"),
///     Task::new("B").with_remaining(240).with_resource("U1").with_predecessor("A"),
/// ];
/// let request = ScheduleRequest::new(tasks, vec![Resource::new("U1")], SchedulerConfig::new(horizon));
///
/// let plan = GanttScheduler::new(&request).unwrap().schedule().unwrap();
/// assert!(plan.task("A").unwrap().end <= plan.task("B").unwrap().start);
/// ```
#[derive(Debug)]
pub struct GanttScheduler<'a> {
    request: &'a ScheduleRequest,
    graph: TaskGraph<'a>,
}

impl<'a> GanttScheduler<'a> {
    /// Validates the request and indexes it.
    pub fn new(request: &'a ScheduleRequest) -> Result<Self> {
        validate_input(&request.tasks, &request.milestones, &request.resources)
            .map_err(ScheduleError::InvalidInput)?;
        let graph = TaskGraph::new(&request.tasks, &request.milestones, &request.resources);
        if let Some(unknown) = request.bounds.keys().find(|id| graph.task(id).is_none()) {
            return Err(ScheduleError::UnknownTask(unknown.clone()));
        }
        Ok(Self { request, graph })
    }

    /// The run's configuration.
    pub fn config(&self) -> &'a SchedulerConfig {
        &self.request.config
    }

    /// Places every task in a fresh context and returns the plan.
    pub fn schedule(&self) -> Result<SchedulePlan> {
        let mut ctx = SchedulingContext::new();
        self.run(&mut ctx)?;
        Ok(ctx.into_plan())
    }

    /// Places every task into `ctx`.
    ///
    /// Roots with external bounds go first so the edited task gets first
    /// claim on capacity.
    pub fn run(&self, ctx: &mut SchedulingContext) -> Result<()> {
        let (bounded, free): (Vec<&str>, Vec<&str>) = self
            .graph
            .task_ids()
            .partition(|id| self.request.bounds.contains_key(*id));

        for id in bounded.into_iter().chain(free) {
            let bounds = self.request.bounds.get(id).copied().unwrap_or_default();
            self.place_task(ctx, id, bounds)?;
        }
        Ok(())
    }

    /// Places one root task (and whatever it depends on) into `ctx`.
    pub fn place_root(&self, ctx: &mut SchedulingContext, task_id: &str, bounds: Bounds) -> Result<DateRange> {
        let task = self
            .graph
            .task(task_id)
            .ok_or_else(|| ScheduleError::UnknownTask(task_id.to_string()))?;
        match self.place_task(ctx, &task.id, bounds)? {
            Some(range) => Ok(range),
            // Only reachable if the caller is itself mid-placement.
            None => ctx
                .placement(task_id)
                .copied()
                .ok_or_else(|| ScheduleError::UnknownTask(task_id.to_string())),
        }
    }

    /// Places a task, returning its range, or `None` when it is already on
    /// the in-progress stack.
    pub fn place_task(
        &self,
        ctx: &mut SchedulingContext,
        task_id: &str,
        bounds: Bounds,
    ) -> Result<Option<DateRange>> {
        if let Some(range) = ctx.placement(task_id) {
            return Ok(Some(*range));
        }
        if ctx.is_in_progress(task_id) {
            debug!(task = %task_id, "already being placed, skipping");
            return Ok(None);
        }
        let task = self
            .graph
            .task(task_id)
            .ok_or_else(|| ScheduleError::UnknownTask(task_id.to_string()))?;

        ctx.enter(&task.id);
        let placed = self.place_entered(ctx, task, bounds);
        ctx.leave(&task.id);

        let range = placed?;
        ctx.record(task, range);
        info!(
            task = %task.id,
            minutes = task.remaining_minutes,
            start = %range.start,
            end = %range.end,
            "placed"
        );
        Ok(Some(range))
    }

    fn place_entered(&self, ctx: &mut SchedulingContext, task: &'a Task, bounds: Bounds) -> Result<DateRange> {
        let config = self.config();
        let resolver = AnchorResolver::new(config);
        let resources = self.graph.resources_of(task);
        let target = self.anchor_target(task, &resources);

        let initial = resolver.resolve(&target, &bounds);
        debug!(
            task = %task.id,
            day = %initial.day,
            direction = ?initial.direction,
            before = ?bounds.before,
            after = ?bounds.after,
            "initial anchor"
        );

        let walk = Walk::for_task(&self.graph, task);
        let mut chain = collect_chain(&self.graph, &task.id, &mut WalkState::new());
        chain.retain(|id| *id != task.id);
        if !chain.is_empty() {
            debug!(task = %task.id, ?walk, ?chain, "dependency chain");
        }

        let mut chain_range: Option<DateRange> = None;
        while let Some(dep) = chain.pop() {
            let dep_bounds = chain_range.map_or_else(Bounds::none, |r| chain_bounds(walk, &r));
            if let Some(range) = self.place_task(ctx, dep, dep_bounds)? {
                widen(&mut chain_range, &range);
            }
        }

        let mut bounds = bounds;
        if let Some(r) = chain_range {
            match walk {
                Walk::Predecessors => bounds.tighten_after(r.end),
                Walk::Successors => bounds.tighten_before(day_start(r.start.date())),
            }
        }

        let direction = resolver.resolve(&target, &bounds).direction;
        let seed = task.scheduled_at.map_or(config.horizon, |t| t.date());
        let anchor = resolver.override_day(&target, seed, &bounds, direction);
        debug!(
            task = %task.id,
            day = %anchor.day,
            direction = ?anchor.direction,
            floor = %anchor.floor,
            "resolved anchor"
        );

        if task.is_zero_length() || task.is_unassigned() {
            return Ok(DateRange::point(day_start(anchor.day)));
        }

        let day = self.find_free_day(ctx, task, &resources, anchor)?;
        ctx.ledger_mut().commit(&resources, task.remaining_minutes, day)
    }

    fn anchor_target(&self, task: &Task, resources: &[&Resource]) -> AnchorTarget {
        let workday = resources
            .iter()
            .map(|r| r.daily_capacity_minutes)
            .filter(|m| *m > 0)
            .min()
            .unwrap_or(self.config().workday_minutes);
        AnchorTarget {
            scheduled_at: task.scheduled_at,
            due_at: task
                .due_at
                .or_else(|| self.graph.milestone_of(task).and_then(Milestone::anchor)),
            span: WorkSpan::of(task.remaining_minutes, workday),
        }
    }

    fn find_free_day(
        &self,
        ctx: &SchedulingContext,
        task: &Task,
        resources: &[&Resource],
        anchor: Anchor,
    ) -> Result<NaiveDate> {
        let config = self.config();
        let week = config.work_week;
        let minutes = task.remaining_minutes;
        let Anchor {
            mut day,
            mut direction,
            floor,
            deadline,
        } = anchor;

        for _ in 0..config.max_probe_days {
            if ctx.ledger().has_capacity(resources, minutes, day)? {
                // Resource weeks may push the work past the deadline.
                let late = match deadline.filter(|_| direction.is_backward()) {
                    Some(deadline) => ctx.ledger().preview(resources, minutes, day)?.end > deadline,
                    None => false,
                };
                if !late {
                    return Ok(day);
                }
                debug!(task = %task.id, %day, ?deadline, "would end past deadline");
            } else {
                debug!(task = %task.id, %day, ?direction, "no capacity");
            }
            day = week.step(day, direction);
            if direction.is_backward() && day < floor {
                day = week.align(floor, Direction::Forward);
                direction = Direction::Forward;
                debug!(task = %task.id, %day, "switching direction");
            }
        }

        Err(ScheduleError::CapacityNotFound {
            task_id: task.id.clone(),
            from: anchor.day,
            days: config.max_probe_days,
        })
    }
}

fn chain_bounds(walk: Walk, placed: &DateRange) -> Bounds {
    match walk {
        Walk::Predecessors => Bounds::starting_after(placed.end),
        Walk::Successors => Bounds::ending_before(day_start(placed.start.date())),
    }
}
