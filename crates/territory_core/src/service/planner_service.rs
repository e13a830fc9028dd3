//! Planner use-case service.
//!
//! # Responsibility
//! - Bind configuration (home base, caps, thresholds, sections) to the pure
//!   planning functions.
//! - Emit one metadata-only log event per use-case call.
//!
//! # Invariants
//! - The service holds no per-request state; every call works on the
//!   borrowed input only.
//! - Degradations (excluded accounts, truncation) are returned as data.

use crate::config::{ConfigError, PlannerConfig};
use crate::model::account::{Account, ActivityBand, RevenueTier, SectionId};
use crate::model::outcome::{Outcome, Task, TaskOwner};
use crate::planning::constraint::resolve_constraint;
use crate::planning::dashboard::{
    action_list, aging_risks, summarize, tier_attention, top_constraints, waiting_room,
    ActionItem, AttentionItem, DashboardSummary, WaitingItem,
};
use crate::planning::ranking::{rank_outcomes, RankQuery, RankedOutcome, Ranking};
use crate::route::builder::{build_route, Route, RouteSelection};
use crate::route::export::{export_route, RouteExport, RouteExportError};
use crate::territory::partition::{partition_by_section, SectionPartition};
use crate::territory::section::SectionLookup;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Route plan plus the selection ids that could not be routed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan<'a> {
    pub route: Route<'a>,
    /// Selected accounts lacking a coordinate.
    pub ungeocoded_count: usize,
    /// Selected ids not present in the account list.
    pub unknown_ids: Vec<String>,
}

/// One territory-table row: an account with its derived columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountRow<'a> {
    pub account: &'a Account,
    pub section: Option<SectionId>,
    pub tier: RevenueTier,
    pub activity: ActivityBand,
}

/// Command-center bundle rendered by the hit-list page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitList<'a> {
    pub summary: DashboardSummary,
    pub top_constraints: Vec<RankedOutcome<'a>>,
    pub aging_risks: Vec<RankedOutcome<'a>>,
    pub action_list: Vec<ActionItem<'a>>,
    pub waiting_room: BTreeMap<TaskOwner, Vec<WaitingItem<'a>>>,
    pub tier_a_attention: Vec<AttentionItem<'a>>,
}

/// Facade over the planning core for one configured territory.
pub struct PlannerService {
    config: PlannerConfig,
    sections: SectionLookup,
}

impl PlannerService {
    /// Validates `config` and builds the section lookup once.
    pub fn new(config: PlannerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sections = config.section_lookup()?;
        Ok(Self { config, sections })
    }

    /// Returns the validated configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Returns the section table built from the configuration.
    pub fn sections(&self) -> &SectionLookup {
        &self.sections
    }

    /// Resolves one outcome's live bottleneck.
    pub fn resolve_constraint<'a>(&self, outcome: &'a Outcome) -> Option<&'a Task> {
        let resolved = resolve_constraint(outcome);
        debug!(
            "event=constraint_resolve module=planning status=ok outcome_id={} active={}",
            outcome.id,
            resolved.is_some()
        );
        resolved
    }

    /// Ranks blocked outcomes for `query`.
    pub fn rank<'a>(&self, outcomes: &'a [Outcome], query: &RankQuery, now_ms: i64) -> Ranking<'a> {
        let ranking = rank_outcomes(outcomes, query, now_ms);
        info!(
            "event=rank_outcomes module=planning status=ok mode={:?} grouped={} input={} ranked={}",
            query.mode,
            query.group_by_owner,
            outcomes.len(),
            ranking.len()
        );
        ranking
    }

    /// Filters accounts to the selected sections.
    pub fn partition<'a>(
        &self,
        accounts: &'a [Account],
        selected: &BTreeSet<SectionId>,
    ) -> SectionPartition<'a> {
        let partition = partition_by_section(accounts, selected, &self.sections);
        if partition.excluded_count > 0 {
            warn!(
                "event=partition_sections module=territory status=degraded excluded={}",
                partition.excluded_count
            );
        }
        info!(
            "event=partition_sections module=territory status=ok selected={} input={} kept={}",
            selected.len(),
            accounts.len(),
            partition.accounts.len()
        );
        partition
    }

    /// Derives section, revenue tier and activity band for each account.
    pub fn account_rows<'a>(
        &self,
        accounts: &[&'a Account],
        now_ms: i64,
    ) -> Vec<AccountRow<'a>> {
        let rows = accounts
            .iter()
            .map(|&account| AccountRow {
                account,
                section: self.sections.resolve(account),
                tier: account.tier(&self.config.tier_thresholds),
                activity: account.activity_band(now_ms, &self.config.activity_bands),
            })
            .collect::<Vec<_>>();
        debug!(
            "event=account_rows module=territory status=ok rows={} never_touched={}",
            rows.len(),
            rows.iter()
                .filter(|row| row.activity == ActivityBand::Never)
                .count()
        );
        rows
    }

    /// Plans a route from the home base over the accounts named in
    /// `selection`, in selection order.
    pub fn plan_route<'a>(&self, accounts: &'a [Account], selection: &[String]) -> RoutePlan<'a> {
        let by_id = accounts
            .iter()
            .map(|account| (account.id.as_str(), account))
            .collect::<BTreeMap<_, _>>();

        let mut seen = BTreeSet::new();
        let mut unknown_ids = Vec::new();
        let mut picked = Vec::with_capacity(selection.len());
        for id in selection {
            if !seen.insert(id.as_str()) {
                continue;
            }
            match by_id.get(id.as_str()) {
                Some(account) => picked.push(*account),
                None => unknown_ids.push(id.clone()),
            }
        }

        let selection = RouteSelection::from_accounts(picked);
        let route = build_route(self.config.home_base, &selection.stops);
        if selection.excluded_count > 0 || !unknown_ids.is_empty() {
            warn!(
                "event=route_build module=route status=degraded ungeocoded={} unknown={}",
                selection.excluded_count,
                unknown_ids.len()
            );
        }
        info!(
            "event=route_build module=route status=ok stops={} total_distance={:.4}",
            route.stops.len(),
            route.total_distance
        );

        RoutePlan {
            route,
            ungeocoded_count: selection.excluded_count,
            unknown_ids,
        }
    }

    /// Exports with `max_stops`, or the configured cap when `None`.
    pub fn export(
        &self,
        route: &Route<'_>,
        max_stops: Option<usize>,
    ) -> Result<RouteExport, RouteExportError> {
        let cap = max_stops.unwrap_or(self.config.max_route_stops);
        let exported = export_route(route.origin, &route.stops, cap)?;
        info!(
            "event=route_export module=route status=ok waypoints={} truncated={} omitted={} uri_truncated={}",
            exported.waypoints.len(),
            exported.truncated,
            exported.omitted_count,
            exported.uri_truncated
        );
        Ok(exported)
    }

    /// Builds the command-center bundle.
    pub fn hit_list<'a>(
        &self,
        accounts: &'a [Account],
        outcomes: &'a [Outcome],
        limit: usize,
        now_ms: i64,
    ) -> HitList<'a> {
        let hit_list = HitList {
            summary: summarize(outcomes),
            top_constraints: top_constraints(outcomes, limit, now_ms),
            aging_risks: aging_risks(outcomes, limit, now_ms),
            action_list: action_list(outcomes, limit),
            waiting_room: waiting_room(outcomes, now_ms),
            tier_a_attention: tier_attention(
                accounts,
                outcomes,
                RevenueTier::A,
                &self.config.tier_thresholds,
            ),
        };
        info!(
            "event=hit_list module=planning status=ok open={} rep_blockers={} actions={} stale={}",
            hit_list.summary.open_outcomes,
            hit_list.summary.rep_blockers,
            hit_list.action_list.len(),
            hit_list.summary.stale_constraints
        );
        hit_list
    }
}

#[cfg(test)]
mod tests {
    use super::PlannerService;
    use crate::config::{ConfigError, PlannerConfig};
    use crate::model::account::{Account, ActivityBand, ActivityBands, RevenueTier, SectionId};
    use crate::model::geo::Coordinate;
    use crate::model::outcome::{Outcome, Task, TaskOwner};
    use crate::model::MILLIS_PER_DAY;

    fn at(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut config = PlannerConfig::default();
        config.max_route_stops = 0;
        assert!(matches!(
            PlannerService::new(config),
            Err(ConfigError::InvalidStopCap(0))
        ));
    }

    #[test]
    fn plan_route_reports_unknown_and_ungeocoded_ids() {
        let mut config = PlannerConfig::default();
        config.home_base = at(0.0, 0.0);
        let service = PlannerService::new(config).unwrap();
        let accounts = vec![
            Account::new("far", "Far").with_coordinate(at(0.0, 5.0)),
            Account::new("near", "Near").with_coordinate(at(0.0, 1.0)),
            Account::new("blank", "No Geo"),
        ];
        let selection = ["far", "blank", "ghost", "near", "far"]
            .map(String::from)
            .to_vec();

        let plan = service.plan_route(&accounts, &selection);
        let order = plan
            .route
            .stops
            .iter()
            .map(|stop| stop.account.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, ["near", "far"]);
        assert_eq!(plan.ungeocoded_count, 1);
        assert_eq!(plan.unknown_ids, ["ghost"]);
    }

    #[test]
    fn export_uses_configured_cap_by_default() {
        let mut config = PlannerConfig::default();
        config.home_base = at(0.0, 0.0);
        config.max_route_stops = 2;
        let service = PlannerService::new(config).unwrap();
        let accounts = (1..=3)
            .map(|i| Account::new(format!("a{i}"), "Stop").with_coordinate(at(0.0, f64::from(i))))
            .collect::<Vec<_>>();
        let ids = accounts.iter().map(|a| a.id.clone()).collect::<Vec<_>>();
        let plan = service.plan_route(&accounts, &ids);

        let exported = service.export(&plan.route, None).unwrap();
        assert_eq!(exported.waypoints.len(), 2);
        assert!(exported.truncated);

        let exported = service.export(&plan.route, Some(5)).unwrap();
        assert!(!exported.truncated);
    }

    #[test]
    fn hit_list_bundles_dashboard_views() {
        let service = PlannerService::new(PlannerConfig::default()).unwrap();
        let accounts = vec![Account::new("acct", "Big Co").with_revenue(150_000.0)];
        let outcomes = vec![
            Outcome::new("o1", "Deal", "acct", 10_000.0)
                .with_task(Task::pending("t1", "call", TaskOwner::Rep, 0), true)
                .with_task(Task::pending("t2", "sign", TaskOwner::Customer, 0), false),
        ];

        let hit_list = service.hit_list(&accounts, &outcomes, 3, 4 * MILLIS_PER_DAY);
        assert_eq!(hit_list.summary.rep_blockers, 1);
        assert_eq!(hit_list.top_constraints[0].score, 40_000.0);
        assert_eq!(hit_list.waiting_room[&TaskOwner::Customer].len(), 1);
        assert_eq!(hit_list.action_list.len(), 1);
        assert_eq!(hit_list.action_list[0].task.id, "t1");
        assert_eq!(hit_list.tier_a_attention.len(), 1);
    }

    #[test]
    fn account_rows_use_configured_bands_and_sections() {
        let mut config = PlannerConfig::default();
        config.activity_bands = ActivityBands {
            recent_days: 7,
            cooling_days: 14,
        };
        let service = PlannerService::new(config).unwrap();
        let section = SectionId::new(3).unwrap();
        let now = 100 * MILLIS_PER_DAY;
        let mut touched = Account::new("a1", "Touched")
            .with_section(section)
            .with_revenue(120_000.0);
        touched.last_activity_ms = Some(now - 10 * MILLIS_PER_DAY);
        let quiet = Account::new("a2", "Quiet");
        let accounts = [&touched, &quiet];

        let rows = service.account_rows(&accounts, now);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].account.id, "a1");
        assert_eq!(rows[0].section, Some(section));
        assert_eq!(rows[0].tier, RevenueTier::A);
        // 10 days is cooling under the 7/14 bands, recent under the defaults.
        assert_eq!(rows[0].activity, ActivityBand::Cooling);
        assert_eq!(rows[1].section, None);
        assert_eq!(rows[1].tier, RevenueTier::C);
        assert_eq!(rows[1].activity, ActivityBand::Never);
    }
}
