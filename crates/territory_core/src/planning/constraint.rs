//! Bottleneck resolution for one outcome.
//!
//! # Invariants
//! - The stored reference is never trusted blindly: a referenced task that
//!   is `done` counts as cleared.
//! - Missing or dangling references resolve to "no active constraint".
//! - Resolution is a pure read of the outcome.

use crate::model::outcome::{Outcome, Task};
use serde::Serialize;

/// Diagnostic view of an outcome's constraint reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "task", rename_all = "snake_case")]
pub enum ConstraintState<'a> {
    /// Reference points at a pending task.
    Active(&'a Task),
    /// Reference points at a task that is already done.
    Cleared(&'a Task),
    /// Reference names a task id the outcome does not contain.
    Stale,
    /// No reference stored.
    Unset,
}

impl<'a> ConstraintState<'a> {
    /// Classifies the outcome's stored constraint reference.
    pub fn of(outcome: &'a Outcome) -> Self {
        let Some(task_id) = outcome.constraint_task_id.as_deref() else {
            return Self::Unset;
        };
        match outcome.task(task_id) {
            Some(task) if task.is_pending() => Self::Active(task),
            Some(task) => Self::Cleared(task),
            None => Self::Stale,
        }
    }

    /// Returns the task only when the constraint is still live.
    pub fn active(self) -> Option<&'a Task> {
        match self {
            Self::Active(task) => Some(task),
            _ => None,
        }
    }
}

/// Returns the outcome's live bottleneck task, if any.
pub fn resolve_constraint(outcome: &Outcome) -> Option<&Task> {
    ConstraintState::of(outcome).active()
}
