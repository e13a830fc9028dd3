//! Urgency ordering of blocked outcomes.
//!
//! # Responsibility
//! - Pair each open outcome with its live constraint and score it.
//! - Order by impact, age or owner; optionally bucket by owner.
//!
//! # Invariants
//! - Completed outcomes and outcomes without an active constraint are
//!   never ranked.
//! - Every sort mode ends with an outcome-id tie-break, so identical input
//!   always yields identical output.
//! - Owner filtering happens before ordering and grouping.

use crate::model::outcome::{Outcome, OutcomeStatus, Task, TaskOwner};
use crate::planning::constraint::resolve_constraint;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Scoring function for the `impact` mode.
///
/// `value × age_days` is the default business heuristic. It has never been
/// validated against real outcomes, so callers may plug in another weighting.
pub trait UrgencyScorer {
    fn score(&self, outcome: &Outcome, constraint: &Task, age_days: u32) -> f64;
}

impl<F> UrgencyScorer for F
where
    F: Fn(&Outcome, &Task, u32) -> f64,
{
    fn score(&self, outcome: &Outcome, constraint: &Task, age_days: u32) -> f64 {
        self(outcome, constraint, age_days)
    }
}

/// Deal value multiplied by constraint age in days.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpactScorer;

impl UrgencyScorer for ImpactScorer {
    fn score(&self, outcome: &Outcome, _constraint: &Task, age_days: u32) -> f64 {
        outcome.value * f64::from(age_days)
    }
}

/// Deal value spread over the days it has been stalled (plus one).
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuePerDayScorer;

impl UrgencyScorer for ValuePerDayScorer {
    fn score(&self, outcome: &Outcome, _constraint: &Task, age_days: u32) -> f64 {
        outcome.value / (f64::from(age_days) + 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMode {
    #[default]
    Impact,
    Age,
    Owner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRankMode(pub String);

impl Display for UnknownRankMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown rank mode `{}`; expected impact|age|owner", self.0)
    }
}

impl Error for UnknownRankMode {}

impl FromStr for RankMode {
    type Err = UnknownRankMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "impact" => Ok(Self::Impact),
            "age" => Ok(Self::Age),
            "owner" => Ok(Self::Owner),
            other => Err(UnknownRankMode(other.to_string())),
        }
    }
}

/// Ranking request options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankQuery {
    pub mode: RankMode,
    pub group_by_owner: bool,
    /// Keep only constraints owned by this party.
    pub owner: Option<TaskOwner>,
}

impl RankQuery {
    /// Creates a flat, unfiltered query for `mode`.
    pub fn new(mode: RankMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Buckets the result by constraint owner.
    pub fn grouped(mut self) -> Self {
        self.group_by_owner = true;
        self
    }

    /// Keeps only constraints owned by `owner`.
    pub fn owned_by(mut self, owner: TaskOwner) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// One blocked outcome with its live constraint and derived keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedOutcome<'a> {
    pub outcome: &'a Outcome,
    pub constraint: &'a Task,
    pub age_days: u32,
    pub score: f64,
}

/// Ordered result, flat or bucketed by constraint owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "items", rename_all = "snake_case")]
pub enum Ranking<'a> {
    Flat(Vec<RankedOutcome<'a>>),
    ByOwner(BTreeMap<TaskOwner, Vec<RankedOutcome<'a>>>),
}

impl<'a> Ranking<'a> {
    /// Number of ranked outcomes across all buckets.
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(items) => items.len(),
            Self::ByOwner(groups) => groups.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens into one list; grouped rankings yield buckets in owner order.
    pub fn into_flat(self) -> Vec<RankedOutcome<'a>> {
        match self {
            Self::Flat(items) => items,
            Self::ByOwner(groups) => groups.into_values().flatten().collect(),
        }
    }
}

/// Ranks outcomes with the default impact scorer.
pub fn rank_outcomes<'a>(outcomes: &'a [Outcome], query: &RankQuery, now_ms: i64) -> Ranking<'a> {
    rank_outcomes_with(outcomes, query, now_ms, &ImpactScorer)
}

/// Ranks outcomes with a caller-supplied scorer.
pub fn rank_outcomes_with<'a, S>(
    outcomes: &'a [Outcome],
    query: &RankQuery,
    now_ms: i64,
    scorer: &S,
) -> Ranking<'a>
where
    S: UrgencyScorer + ?Sized,
{
    let mut ranked = blocked_outcomes(outcomes, now_ms, scorer)
        .filter(|item| query.owner.map_or(true, |owner| item.constraint.owner == owner))
        .collect::<Vec<_>>();
    sort_ranked(&mut ranked, query.mode);

    if query.group_by_owner {
        Ranking::ByOwner(group_by_owner(ranked))
    } else {
        Ranking::Flat(ranked)
    }
}

/// Buckets an already ordered list by constraint owner, keeping order.
pub fn group_by_owner(ranked: Vec<RankedOutcome<'_>>) -> BTreeMap<TaskOwner, Vec<RankedOutcome<'_>>> {
    let mut groups: BTreeMap<TaskOwner, Vec<RankedOutcome<'_>>> = BTreeMap::new();
    for item in ranked {
        groups.entry(item.constraint.owner).or_default().push(item);
    }
    groups
}

fn blocked_outcomes<'a, 's, S>(
    outcomes: &'a [Outcome],
    now_ms: i64,
    scorer: &'s S,
) -> impl Iterator<Item = RankedOutcome<'a>> + 's
where
    'a: 's,
    S: UrgencyScorer + ?Sized,
{
    outcomes
        .iter()
        .filter(|outcome| outcome.status != OutcomeStatus::Completed)
        .filter_map(move |outcome| {
            let constraint = resolve_constraint(outcome)?;
            let age_days = constraint.age_days(now_ms);
            Some(RankedOutcome {
                outcome,
                constraint,
                age_days,
                score: scorer.score(outcome, constraint, age_days),
            })
        })
}

fn sort_ranked(items: &mut [RankedOutcome<'_>], mode: RankMode) {
    items.sort_by(|a, b| {
        let primary = match mode {
            RankMode::Impact => b.score.total_cmp(&a.score),
            RankMode::Age => b.age_days.cmp(&a.age_days),
            RankMode::Owner => a
                .constraint
                .owner
                .cmp(&b.constraint.owner)
                .then_with(|| b.age_days.cmp(&a.age_days)),
        };
        primary.then_with(|| by_outcome_id(a, b))
    });
}

fn by_outcome_id(a: &RankedOutcome<'_>, b: &RankedOutcome<'_>) -> Ordering {
    a.outcome.id.cmp(&b.outcome.id)
}
