//! Field-visit sequencing.
//!
//! # Responsibility
//! - Split a selection into routable (geocoded) stops and excluded accounts.
//! - Order stops from an origin with a greedy nearest-neighbor heuristic.
//!
//! # Invariants
//! - Ungeocoded accounts are rejected before planning, never mid-algorithm.
//! - The planned route is a permutation of its input stops.
//! - Equidistant candidates are taken in input order.
//!
//! Nearest neighbor is an approximation, not an optimal tour. Selections are
//! human-curated (tens of stops), so the O(n²) scan is acceptable.

use crate::model::account::Account;
use crate::model::geo::Coordinate;
use serde::Serialize;

/// Distances closer than this are treated as ties.
pub const DISTANCE_TOLERANCE: f64 = 1e-12;

/// An account proven to carry a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoStop<'a> {
    pub account: &'a Account,
    pub coordinate: Coordinate,
}

impl<'a> GeoStop<'a> {
    /// Returns `None` for ungeocoded accounts.
    pub fn from_account(account: &'a Account) -> Option<Self> {
        account.coordinate.map(|coordinate| Self {
            account,
            coordinate,
        })
    }
}

/// Routable stops plus the count of accounts that could not be routed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteSelection<'a> {
    pub stops: Vec<GeoStop<'a>>,
    pub excluded_count: usize,
}

impl<'a> RouteSelection<'a> {
    /// Splits accounts into stops and an excluded count, keeping input order.
    pub fn from_accounts<I>(accounts: I) -> Self
    where
        I: IntoIterator<Item = &'a Account>,
    {
        let mut selection = Self::default();
        for account in accounts {
            match GeoStop::from_account(account) {
                Some(stop) => selection.stops.push(stop),
                None => selection.excluded_count += 1,
            }
        }
        selection
    }
}

/// One visit in planned order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteStop<'a> {
    /// 1-based position for display.
    pub stop_number: usize,
    pub account: &'a Account,
    pub coordinate: Coordinate,
    /// Distance from the previous stop (or the origin).
    pub leg_distance: f64,
}

/// Planned visit order from a fixed origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route<'a> {
    pub origin: Coordinate,
    pub stops: Vec<RouteStop<'a>>,
    pub total_distance: f64,
}

impl Route<'_> {
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Strategy seam for stop ordering.
pub trait RoutePlanner {
    fn plan<'a>(&self, origin: Coordinate, stops: &[GeoStop<'a>]) -> Route<'a>;
}

/// Greedy nearest-neighbor tour construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborPlanner;

impl RoutePlanner for NearestNeighborPlanner {
    fn plan<'a>(&self, origin: Coordinate, stops: &[GeoStop<'a>]) -> Route<'a> {
        // Remaining stops kept in input order so ties resolve to the earliest.
        let mut pool: Vec<GeoStop<'a>> = stops.to_vec();
        let mut ordered = Vec::with_capacity(pool.len());
        let mut current = origin;
        let mut total_distance = 0.0;

        while !pool.is_empty() {
            let distances = pool
                .iter()
                .map(|candidate| current.distance_to(&candidate.coordinate))
                .collect::<Vec<_>>();
            let nearest = distances.iter().copied().fold(f64::INFINITY, f64::min);
            // Earliest candidate within tolerance of the minimum wins.
            let best_index = distances
                .iter()
                .position(|distance| *distance <= nearest + DISTANCE_TOLERANCE)
                .unwrap_or(0);
            let best_distance = distances[best_index];

            let next = pool.remove(best_index);
            total_distance += best_distance;
            current = next.coordinate;
            ordered.push(RouteStop {
                stop_number: ordered.len() + 1,
                account: next.account,
                coordinate: next.coordinate,
                leg_distance: best_distance,
            });
        }

        Route {
            origin,
            stops: ordered,
            total_distance,
        }
    }
}

/// Plans a route with the default nearest-neighbor heuristic.
pub fn build_route<'a>(origin: Coordinate, stops: &[GeoStop<'a>]) -> Route<'a> {
    NearestNeighborPlanner.plan(origin, stops)
}
