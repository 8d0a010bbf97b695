//! Task graph index.
//!
//! Borrows the run's input and answers the lookups the scheduler needs:
//! task by ID, merged predecessor/successor edges, owning milestone and
//! assigned resources. Edge lists keep input order so that runs are
//! deterministic.

use std::collections::HashMap;

use crate::models::{Milestone, Resource, Task};

/// Read-only index over one run's tasks, milestones and resources.
#[derive(Debug, Clone)]
pub struct TaskGraph<'a> {
    order: Vec<&'a str>,
    tasks: HashMap<&'a str, &'a Task>,
    predecessors: HashMap<&'a str, Vec<&'a str>>,
    successors: HashMap<&'a str, Vec<&'a str>>,
    milestones: HashMap<&'a str, &'a Milestone>,
    resources: HashMap<&'a str, &'a Resource>,
}

impl<'a> TaskGraph<'a> {
    /// Builds the index.
    ///
    /// A task may declare an edge from either end; both declarations land
    /// in the same edge set. References to unknown tasks are dropped
    /// (validation reports them).
    pub fn new(tasks: &'a [Task], milestones: &'a [Milestone], resources: &'a [Resource]) -> Self {
        let mut graph = Self {
            order: tasks.iter().map(|t| t.id.as_str()).collect(),
            tasks: tasks.iter().map(|t| (t.id.as_str(), t)).collect(),
            predecessors: HashMap::new(),
            successors: HashMap::new(),
            milestones: milestones.iter().map(|m| (m.id.as_str(), m)).collect(),
            resources: resources.iter().map(|r| (r.id.as_str(), r)).collect(),
        };

        for task in tasks {
            for pred in &task.predecessors {
                graph.add_edge(pred, &task.id);
            }
            for succ in &task.successors {
                graph.add_edge(&task.id, succ);
            }
        }
        graph
    }

    fn add_edge(&mut self, from: &'a str, to: &'a str) {
        if from == to || !self.tasks.contains_key(from) || !self.tasks.contains_key(to) {
            return;
        }
        let succs = self.successors.entry(from).or_default();
        if !succs.contains(&to) {
            succs.push(to);
        }
        let preds = self.predecessors.entry(to).or_default();
        if !preds.contains(&from) {
            preds.push(from);
        }
    }

    /// Looks up a task.
    pub fn task(&self, id: &str) -> Option<&'a Task> {
        self.tasks.get(id).copied()
    }

    /// Task IDs in input order.
    pub fn task_ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.order.iter().copied()
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the graph has no tasks.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tasks that must finish before `id`.
    pub fn predecessors(&self, id: &str) -> &[&'a str] {
        self.predecessors.get(id).map_or(&[], Vec::as_slice)
    }

    /// Tasks waiting for `id`.
    pub fn successors(&self, id: &str) -> &[&'a str] {
        self.successors.get(id).map_or(&[], Vec::as_slice)
    }

    /// The milestone owning `task`.
    pub fn milestone_of(&self, task: &Task) -> Option<&'a Milestone> {
        task.milestone
            .as_deref()
            .and_then(|mid| self.milestones.get(mid).copied())
    }

    /// Resources assigned to `task`, in assignment order.
    pub fn resources_of(&self, task: &Task) -> Vec<&'a Resource> {
        task.resources
            .iter()
            .filter_map(|rid| self.resources.get(rid.as_str()).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_merged_from_both_ends() {
        let tasks = vec![
            Task::new("A").with_successor("B"),
            Task::new("B").with_predecessor("A"),
            Task::new("C").with_predecessor("B"),
        ];
        let graph = TaskGraph::new(&tasks, &[], &[]);

        assert_eq!(graph.successors("A"), &["B"]);
        assert_eq!(graph.predecessors("B"), &["A"]);
        assert_eq!(graph.successors("B"), &["C"]);
        assert!(graph.predecessors("A").is_empty());
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.task_ids().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_unknown_and_self_edges_dropped() {
        let tasks = vec![Task::new("A").with_predecessor("ZZ").with_successor("A")];
        let graph = TaskGraph::new(&tasks, &[], &[]);
        assert!(graph.predecessors("A").is_empty());
        assert!(graph.successors("A").is_empty());
    }

    #[test]
    fn test_lookups() {
        let tasks = vec![Task::new("A").with_resource("U1").with_resource("U9").in_milestone("M1")];
        let milestones = vec![Milestone::new("M1")];
        let resources = vec![Resource::new("U1")];
        let graph = TaskGraph::new(&tasks, &milestones, &resources);

        let task = graph.task("A").unwrap();
        assert_eq!(graph.milestone_of(task).unwrap().id, "M1");
        let assigned: Vec<_> = graph.resources_of(task).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(assigned, vec!["U1"]);
        assert!(graph.task("B").is_none());
        assert!(!graph.is_empty());
    }
}
