//! Outcome (deal) and task domain model.
//!
//! # Responsibility
//! - Define the deal record and the tasks blocking it.
//! - Keep the bottleneck as a single optional reference on the outcome.
//!
//! # Invariants
//! - At most one task is the constraint: `constraint_task_id` is the only
//!   place that marks it, so two bottlenecks cannot be represented.
//! - Task ids are unique within one outcome (checked by `validate`).
//! - Task age is never negative.

use crate::model::account::AccountId;
use crate::model::elapsed_days;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type OutcomeId = String;
pub type TaskId = String;

/// Closed set of parties that can own a blocking task.
///
/// Ordering follows the display name so owner buckets iterate
/// alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOwner {
    /// The internal field rep using the dashboard.
    Rep,
    Vendor,
    InsideSales,
    Customer,
}

impl TaskOwner {
    pub const ALL: [TaskOwner; 4] = [
        TaskOwner::Customer,
        TaskOwner::InsideSales,
        TaskOwner::Rep,
        TaskOwner::Vendor,
    ];

    /// Display name, also the sort key.
    pub fn label(self) -> &'static str {
        match self {
            Self::Rep => "Rep",
            Self::Vendor => "Vendor",
            Self::InsideSales => "Inside Sales",
            Self::Customer => "Customer",
        }
    }
}

impl Ord for TaskOwner {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label().cmp(other.label())
    }
}

impl PartialOrd for TaskOwner {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for TaskOwner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for owner names that are not part of the closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOwner(pub String);

impl Display for UnknownOwner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown task owner `{}`; expected rep|vendor|inside_sales|customer",
            self.0
        )
    }
}

impl Error for UnknownOwner {}

impl FromStr for TaskOwner {
    type Err = UnknownOwner;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "rep" => Ok(Self::Rep),
            "vendor" => Ok(Self::Vendor),
            "inside_sales" => Ok(Self::InsideSales),
            "customer" => Ok(Self::Customer),
            _ => Err(UnknownOwner(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Done,
}

/// Deal lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Active,
    AtRisk,
    Deferred,
    #[serde(alias = "verified")]
    Completed,
}

impl OutcomeStatus {
    /// Active and at-risk deals count toward the open pipeline.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Active | Self::AtRisk)
    }
}

/// One unit of work blocking progress on a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub owner: TaskOwner,
    pub status: TaskStatus,
    /// Unix epoch milliseconds.
    pub created_at_ms: i64,
}

impl Task {
    /// Creates a pending task.
    pub fn pending(
        id: impl Into<TaskId>,
        description: impl Into<String>,
        owner: TaskOwner,
        created_at_ms: i64,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            owner,
            status: TaskStatus::Pending,
            created_at_ms,
        }
    }

    /// Returns `true` until the task is marked done.
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    /// Whole days since creation, clamped at zero under clock skew.
    pub fn age_days(&self, now_ms: i64) -> u32 {
        elapsed_days(self.created_at_ms, now_ms)
    }
}

/// Structural problems found by `Outcome::validate`.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeValidationError {
    DuplicateTaskId { outcome_id: OutcomeId, task_id: TaskId },
    InvalidValue { outcome_id: OutcomeId, value: f64 },
}

impl Display for OutcomeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTaskId {
                outcome_id,
                task_id,
            } => write!(f, "outcome {outcome_id} lists task {task_id} more than once"),
            Self::InvalidValue { outcome_id, value } => write!(
                f,
                "outcome {outcome_id} value must be finite and >= 0, got {value}"
            ),
        }
    }
}

impl Error for OutcomeValidationError {}

/// A sales deal tied to one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub id: OutcomeId,
    pub title: String,
    pub account_id: AccountId,
    pub value: f64,
    pub status: OutcomeStatus,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// The single bottleneck. May be stale; resolve through
    /// `planning::constraint::resolve_constraint`.
    #[serde(default)]
    pub constraint_task_id: Option<TaskId>,
}

impl Outcome {
    /// Creates an active outcome with no tasks.
    pub fn new(
        id: impl Into<OutcomeId>,
        title: impl Into<String>,
        account_id: impl Into<AccountId>,
        value: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            account_id: account_id.into(),
            value,
            status: OutcomeStatus::Active,
            tasks: Vec::new(),
            constraint_task_id: None,
        }
    }

    /// Adds a task; `constraint == true` moves the bottleneck reference to it.
    pub fn with_task(mut self, task: Task, constraint: bool) -> Self {
        if constraint {
            self.constraint_task_id = Some(task.id.clone());
        }
        self.tasks.push(task);
        self
    }

    /// Replaces the lifecycle status.
    pub fn with_status(mut self, status: OutcomeStatus) -> Self {
        self.status = status;
        self
    }

    /// Looks up a task by id within this outcome only.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Checks structural invariants. A dangling `constraint_task_id` is a
    /// normal lifecycle state and is not reported here.
    pub fn validate(&self) -> Result<(), OutcomeValidationError> {
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(OutcomeValidationError::InvalidValue {
                outcome_id: self.id.clone(),
                value: self.value,
            });
        }
        let mut seen = HashSet::with_capacity(self.tasks.len());
        for task in &self.tasks {
            if !seen.insert(task.id.as_str()) {
                return Err(OutcomeValidationError::DuplicateTaskId {
                    outcome_id: self.id.clone(),
                    task_id: task.id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Outcome, OutcomeValidationError, Task, TaskOwner};
    use crate::model::MILLIS_PER_DAY;

    #[test]
    fn owner_order_follows_display_name() {
        let mut owners = vec![
            TaskOwner::Vendor,
            TaskOwner::Rep,
            TaskOwner::Customer,
            TaskOwner::InsideSales,
        ];
        owners.sort();
        assert_eq!(owners, TaskOwner::ALL.to_vec());
    }

    #[test]
    fn owner_parses_loose_spellings() {
        assert_eq!("Inside Sales".parse::<TaskOwner>().unwrap(), TaskOwner::InsideSales);
        assert_eq!("inside-sales".parse::<TaskOwner>().unwrap(), TaskOwner::InsideSales);
        assert_eq!(" REP ".parse::<TaskOwner>().unwrap(), TaskOwner::Rep);
        assert!("partner".parse::<TaskOwner>().is_err());
    }

    #[test]
    fn task_age_clamps_clock_skew() {
        let task = Task::pending("t1", "call", TaskOwner::Rep, 10 * MILLIS_PER_DAY);
        assert_eq!(task.age_days(12 * MILLIS_PER_DAY), 2);
        assert_eq!(task.age_days(0), 0);
    }

    #[test]
    fn validate_rejects_duplicate_task_ids() {
        let outcome = Outcome::new("o1", "Deal", "a1", 10.0)
            .with_task(Task::pending("t1", "a", TaskOwner::Rep, 0), false)
            .with_task(Task::pending("t1", "b", TaskOwner::Vendor, 0), true);
        assert_eq!(
            outcome.validate().unwrap_err(),
            OutcomeValidationError::DuplicateTaskId {
                outcome_id: "o1".to_string(),
                task_id: "t1".to_string(),
            }
        );
    }

    #[test]
    fn validate_accepts_dangling_constraint_reference() {
        let mut outcome = Outcome::new("o1", "Deal", "a1", 10.0);
        outcome.constraint_task_id = Some("gone".to_string());
        assert!(outcome.validate().is_ok());
        assert!(Outcome::new("o2", "Bad", "a1", -1.0).validate().is_err());
    }
}
