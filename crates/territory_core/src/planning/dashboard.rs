//! Hit-list and waiting-room projections built on ranking and resolution.
//!
//! # Invariants
//! - Every view is derived from the input slices only; no clock reads.
//! - Waiting-room buckets exclude rep-owned and done tasks; the action
//!   list holds only rep-owned pending ones.

use crate::model::account::{Account, RevenueTier, TierThresholds};
use crate::model::outcome::{Outcome, OutcomeStatus, Task, TaskOwner};
use crate::planning::constraint::ConstraintState;
use crate::planning::ranking::{rank_outcomes, RankMode, RankQuery, RankedOutcome};
use serde::Serialize;
use std::collections::BTreeMap;

/// Headline counters for the command-center strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Outcomes in `active` or `at_risk`.
    pub open_outcomes: usize,
    /// Non-completed outcomes whose live constraint belongs to the rep.
    pub rep_blockers: usize,
    /// Summed value of non-completed outcomes with a live constraint.
    pub blocked_value: f64,
    /// Constraint references pointing at done tasks.
    pub cleared_constraints: usize,
    /// Constraint references naming missing tasks.
    pub stale_constraints: usize,
}

/// Counts open outcomes and classifies every constraint reference.
pub fn summarize(outcomes: &[Outcome]) -> DashboardSummary {
    let mut summary = DashboardSummary::default();
    for outcome in outcomes {
        if outcome.status.is_open() {
            summary.open_outcomes += 1;
        }
        if outcome.status == OutcomeStatus::Completed {
            continue;
        }
        match ConstraintState::of(outcome) {
            ConstraintState::Active(task) => {
                summary.blocked_value += outcome.value;
                if task.owner == TaskOwner::Rep {
                    summary.rep_blockers += 1;
                }
            }
            ConstraintState::Cleared(_) => summary.cleared_constraints += 1,
            ConstraintState::Stale => summary.stale_constraints += 1,
            ConstraintState::Unset => {}
        }
    }
    summary
}

/// The `limit` most impactful live constraints.
pub fn top_constraints(outcomes: &[Outcome], limit: usize, now_ms: i64) -> Vec<RankedOutcome<'_>> {
    take_ranked(outcomes, RankMode::Impact, limit, now_ms)
}

/// The `limit` longest-stalled live constraints.
pub fn aging_risks(outcomes: &[Outcome], limit: usize, now_ms: i64) -> Vec<RankedOutcome<'_>> {
    take_ranked(outcomes, RankMode::Age, limit, now_ms)
}

fn take_ranked(
    outcomes: &[Outcome],
    mode: RankMode,
    limit: usize,
    now_ms: i64,
) -> Vec<RankedOutcome<'_>> {
    let mut items = rank_outcomes(outcomes, &RankQuery::new(mode), now_ms).into_flat();
    items.truncate(limit);
    items
}

/// A pending task the rep is waiting on someone else to clear.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaitingItem<'a> {
    pub outcome: &'a Outcome,
    pub task: &'a Task,
    pub age_days: u32,
    pub score: f64,
}

/// Pending tasks owned by other parties, bucketed by owner.
///
/// Buckets are ordered by `value × task age` descending, then outcome id and
/// task id ascending.
pub fn waiting_room(outcomes: &[Outcome], now_ms: i64) -> BTreeMap<TaskOwner, Vec<WaitingItem<'_>>> {
    let mut groups: BTreeMap<TaskOwner, Vec<WaitingItem<'_>>> = BTreeMap::new();
    for outcome in outcomes
        .iter()
        .filter(|outcome| outcome.status != OutcomeStatus::Completed)
    {
        for task in outcome
            .tasks
            .iter()
            .filter(|task| task.is_pending() && task.owner != TaskOwner::Rep)
        {
            let age_days = task.age_days(now_ms);
            groups.entry(task.owner).or_default().push(WaitingItem {
                outcome,
                task,
                age_days,
                score: outcome.value * f64::from(age_days),
            });
        }
    }
    for items in groups.values_mut() {
        items.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.outcome.id.cmp(&b.outcome.id))
                .then_with(|| a.task.id.cmp(&b.task.id))
        });
    }
    groups
}

/// A pending task the rep owns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionItem<'a> {
    pub outcome: &'a Outcome,
    pub task: &'a Task,
}

/// The rep's own pending tasks on non-completed outcomes, at most `limit`.
///
/// Outcomes keep input order and tasks keep their order within the outcome.
pub fn action_list(outcomes: &[Outcome], limit: usize) -> Vec<ActionItem<'_>> {
    outcomes
        .iter()
        .filter(|outcome| outcome.status != OutcomeStatus::Completed)
        .flat_map(|outcome| {
            outcome
                .tasks
                .iter()
                .filter(|task| task.is_pending() && task.owner == TaskOwner::Rep)
                .map(move |task| ActionItem { outcome, task })
        })
        .take(limit)
        .collect()
}

/// An account of the requested tier with its first live constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttentionItem<'a> {
    pub account: &'a Account,
    pub outcome: &'a Outcome,
    pub constraint: &'a Task,
}

/// Accounts of `tier` that have at least one non-completed outcome with a
/// live constraint. Accounts keep input order; the first matching outcome
/// (input order) is reported.
pub fn tier_attention<'a>(
    accounts: &'a [Account],
    outcomes: &'a [Outcome],
    tier: RevenueTier,
    thresholds: &TierThresholds,
) -> Vec<AttentionItem<'a>> {
    accounts
        .iter()
        .filter(|account| account.tier(thresholds) == tier)
        .filter_map(|account| {
            outcomes
                .iter()
                .filter(|outcome| {
                    outcome.account_id == account.id && outcome.status != OutcomeStatus::Completed
                })
                .find_map(|outcome| {
                    ConstraintState::of(outcome)
                        .active()
                        .map(|constraint| AttentionItem {
                            account,
                            outcome,
                            constraint,
                        })
                })
        })
        .collect()
}
