//! Constraint prioritization and route planning core for the territory
//! dashboard.
//! This crate is the single source of truth for planning invariants; it
//! performs no network or storage I/O.

pub mod config;
pub mod logging;
pub mod model;
pub mod planning;
pub mod route;
pub mod service;
pub mod territory;

pub use config::{ConfigError, PlannerConfig};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::account::{
    Account, AccountId, ActivityBand, ActivityBands, RevenueTier, SectionId, TierThresholds,
};
pub use model::geo::{Coordinate, CoordinateError};
pub use model::outcome::{
    Outcome, OutcomeId, OutcomeStatus, OutcomeValidationError, Task, TaskId, TaskOwner, TaskStatus,
};
pub use model::snapshot::Snapshot;
pub use planning::constraint::{resolve_constraint, ConstraintState};
pub use planning::ranking::{
    rank_outcomes, rank_outcomes_with, ImpactScorer, RankMode, RankQuery, RankedOutcome, Ranking,
    UrgencyScorer, ValuePerDayScorer,
};
pub use route::builder::{
    build_route, GeoStop, NearestNeighborPlanner, Route, RoutePlanner, RouteSelection, RouteStop,
};
pub use route::export::{
    export_route, RouteExport, RouteExportError, Waypoint, MAX_DIRECTIONS_STOPS,
};
pub use service::planner_service::{AccountRow, HitList, PlannerService, RoutePlan};
pub use territory::partition::{partition_by_section, SectionPartition};
pub use territory::search::{
    search_accounts, sort_accounts, AccountSortField, SortDirection, UnknownSortField,
};
pub use territory::section::{SectionEntry, SectionLookup};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
