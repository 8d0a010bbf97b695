//! Dependency chain collection.
//!
//! Depth-first walk from a task over its predecessors, or over its
//! successors when the task belongs to an anchored milestone (the chain
//! toward the milestone date matters more than what came before). The
//! result lists the task first, then its dependencies, de-duplicated in
//! first-seen order. The scheduler places the list from the back, so the
//! most distant dependencies are placed first.
//!
//! # Cycles
//! A task already on the walk stack is returned as `[task]` without
//! recursing, so cyclic graphs still produce a finite chain.

use std::collections::HashSet;

use super::TaskGraph;
use crate::models::Task;

/// Which edges a walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Follow tasks that must finish first.
    Predecessors,
    /// Follow tasks that wait on this one.
    Successors,
}

impl Walk {
    /// Walk orientation for `task`.
    pub fn for_task(graph: &TaskGraph<'_>, task: &Task) -> Self {
        if graph.milestone_of(task).is_some_and(|m| m.is_anchored()) {
            Walk::Successors
        } else {
            Walk::Predecessors
        }
    }
}

/// Stack and expansion bookkeeping for one collection.
///
/// The stack is pushed and popped by the call that owns each level.
#[derive(Debug, Default)]
pub struct WalkState<'a> {
    stack: Vec<&'a str>,
    expanded: HashSet<&'a str>,
}

impl<'a> WalkState<'a> {
    /// Fresh state for one top-level collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is currently being walked.
    pub fn is_on_stack(&self, id: &str) -> bool {
        self.stack.contains(&id)
    }
}

/// Collects the dependency chain of `task_id`.
pub fn collect_chain<'a>(graph: &TaskGraph<'a>, task_id: &'a str, state: &mut WalkState<'a>) -> Vec<&'a str> {
    if state.is_on_stack(task_id) {
        return vec![task_id];
    }
    // Everything below an already expanded task is in the chain already.
    if state.expanded.contains(task_id) {
        return Vec::new();
    }
    let Some(task) = graph.task(task_id) else {
        return Vec::new();
    };

    state.stack.push(task_id);

    let mut chain = Vec::new();
    if !task.completed {
        chain.push(task_id);
    }
    let next = match Walk::for_task(graph, task) {
        Walk::Predecessors => graph.predecessors(task_id),
        Walk::Successors => graph.successors(task_id),
    };
    for &dep in next {
        chain.extend(collect_chain(graph, dep, state));
    }

    state.stack.pop();
    state.expanded.insert(task_id);

    dedup_in_order(&mut chain);
    chain
}

fn dedup_in_order(chain: &mut Vec<&str>) {
    let mut seen = HashSet::new();
    chain.retain(|id| seen.insert(*id));
}
