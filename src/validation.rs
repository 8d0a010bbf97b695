//! Input validation for scheduling runs.
//!
//! Checks structural integrity of tasks, milestones and resources before
//! scheduling. Detects:
//! - Duplicate IDs (and a resource assigned twice to one task)
//! - Missing resource, dependency and milestone references
//! - Self-dependencies
//! - Resources without usable daily capacity
//!
//! Dependency cycles are deliberately not reported: the dependency
//! collector truncates them and every task in a cycle is still placed.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Milestone, Resource, Task, MINUTES_PER_DAY};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A task is assigned a resource that doesn't exist.
    InvalidResourceReference,
    /// A dependency edge points at a missing task or at the task itself.
    InvalidDependency,
    /// A task belongs to a milestone that doesn't exist.
    InvalidMilestoneReference,
    /// A resource has zero daily capacity.
    MissingCapacity,
    /// A resource has more daily capacity than a day holds.
    InvalidCapacity,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a scheduling run.
///
/// Checks:
/// 1. No duplicate resource, milestone or task IDs
/// 2. Every resource has 1..=1440 minutes of daily capacity
/// 3. Every assigned resource exists and is assigned at most once per task
/// 4. Every predecessor/successor exists and is not the task itself
/// 5. Every milestone reference exists
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    tasks: &[Task],
    milestones: &[Milestone],
    resources: &[Resource],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut resource_ids = HashSet::new();
    for r in resources {
        if !resource_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate resource ID: {}", r.id),
            ));
        }
        if r.daily_capacity_minutes == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingCapacity,
                format!("Resource '{}' has no daily capacity", r.id),
            ));
        } else if r.daily_capacity_minutes > MINUTES_PER_DAY {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!(
                    "Resource '{}' has {} minutes of daily capacity (max {MINUTES_PER_DAY})",
                    r.id, r.daily_capacity_minutes
                ),
            ));
        }
    }

    let mut milestone_ids = HashSet::new();
    for m in milestones {
        if !milestone_ids.insert(m.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate milestone ID: {}", m.id),
            ));
        }
    }

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
    }

    for task in tasks {
        let mut assigned = HashSet::new();
        for rid in &task.resources {
            if !resource_ids.contains(rid.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidResourceReference,
                    format!("Task '{}' references unknown resource '{}'", task.id, rid),
                ));
            }
            if !assigned.insert(rid.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Task '{}' assigns resource '{}' twice", task.id, rid),
                ));
            }
        }

        for dep in task.predecessors.iter().chain(&task.successors) {
            if dep == &task.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDependency,
                    format!("Task '{}' depends on itself", task.id),
                ));
            } else if !task_ids.contains(dep.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDependency,
                    format!("Task '{}' references unknown task '{}'", task.id, dep),
                ));
            }
        }

        if let Some(mid) = &task.milestone {
            if !milestone_ids.contains(mid.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidMilestoneReference,
                    format!("Task '{}' references unknown milestone '{}'", task.id, mid),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resources() -> Vec<Resource> {
        vec![
            Resource::new("U1").with_name("Alice"),
            Resource::new("U2").with_name("Bob").with_daily_capacity(360),
        ]
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task::new("T1").with_remaining(480).with_resource("U1"),
            Task::new("T2")
                .with_remaining(240)
                .with_resource("U2")
                .with_predecessor("T1")
                .in_milestone("M1"),
        ]
    }

    fn sample_milestones() -> Vec<Milestone> {
        vec![Milestone::new("M1")]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_tasks(), &sample_milestones(), &sample_resources()).is_ok());
    }

    #[test]
    fn test_duplicate_task_id() {
        let tasks = vec![Task::new("T1"), Task::new("T1")];
        let errors = validate_input(&tasks, &[], &[]).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("task")));
    }

    #[test]
    fn test_duplicate_resource_id() {
        let resources = vec![Resource::new("U1"), Resource::new("U1")];
        let errors = validate_input(&[], &[], &resources).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("resource")));
    }

    #[test]
    fn test_duplicate_assignment() {
        let tasks = vec![Task::new("T1").with_resource("U1").with_resource("U1")];
        let errors = validate_input(&tasks, &[], &sample_resources()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("twice"));
    }

    #[test]
    fn test_zero_capacity() {
        let resources = vec![Resource::new("U1").with_daily_capacity(0)];
        let errors = validate_input(&[], &[], &resources).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::MissingCapacity));
    }

    #[test]
    fn test_capacity_over_one_day() {
        let resources = vec![Resource::new("U1").with_daily_capacity(MINUTES_PER_DAY + 1)];
        let errors = validate_input(&[], &[], &resources).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidCapacity));
    }

    #[test]
    fn test_invalid_resource_reference() {
        let tasks = vec![Task::new("T1").with_resource("NONEXISTENT")];
        let errors = validate_input(&tasks, &[], &sample_resources()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidResourceReference));
    }

    #[test]
    fn test_invalid_dependency() {
        let tasks = vec![
            Task::new("T1").with_predecessor("NONEXISTENT"),
            Task::new("T2").with_successor("T2"),
        ];
        let errors = validate_input(&tasks, &[], &[]).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::InvalidDependency)
                .count(),
            2
        );
    }

    #[test]
    fn test_invalid_milestone() {
        let tasks = vec![Task::new("T1").in_milestone("M9")];
        let errors = validate_input(&tasks, &sample_milestones(), &[]).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidMilestoneReference));
    }

    #[test]
    fn test_cycle_is_not_an_error() {
        // T1 → T2 → T3 → T1
        let tasks = vec![
            Task::new("T1").with_predecessor("T3"),
            Task::new("T2").with_predecessor("T1"),
            Task::new("T3").with_predecessor("T2"),
        ];
        assert!(validate_input(&tasks, &[], &[]).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let tasks = vec![
            Task::new("T1").with_resource("UNKNOWN"),
            Task::new("T1").in_milestone("M9"),
        ];
        let errors = validate_input(&tasks, &[], &[]).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
