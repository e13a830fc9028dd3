//! Hand-off payload for external turn-by-turn navigation.
//!
//! # Invariants
//! - At most `max_stops` waypoints are emitted; overflow sets `truncated`.
//! - The URI never carries more than `MAX_DIRECTIONS_STOPS` stops; a longer
//!   waypoint list sets `uri_truncated`.
//! - A zero cap is a caller bug and is rejected.
//! - No I/O: the URI is returned, never opened.

use crate::model::geo::Coordinate;
use crate::route::builder::RouteStop;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

/// Google Maps directions endpoint (URLs API, `api=1`).
pub const DIRECTIONS_BASE_URL: &str = "https://www.google.com/maps/dir/";

/// Stops the directions link can carry: nine waypoints plus the destination.
pub const MAX_DIRECTIONS_STOPS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteExportError {
    /// `max_stops` must be at least 1.
    InvalidStopCap(usize),
    Uri(url::ParseError),
}

impl Display for RouteExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStopCap(value) => {
                write!(f, "max_stops must be >= 1, got {value}")
            }
            Self::Uri(err) => write!(f, "failed to build navigation uri: {err}"),
        }
    }
}

impl Error for RouteExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidStopCap(_) => None,
            Self::Uri(err) => Some(err),
        }
    }
}

impl From<url::ParseError> for RouteExportError {
    fn from(value: url::ParseError) -> Self {
        Self::Uri(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub stop_number: usize,
    pub account_id: String,
    pub name: String,
    pub coordinate: Coordinate,
}

/// Navigation payload; `truncated` signals dropped tail stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteExport {
    pub origin: Coordinate,
    pub waypoints: Vec<Waypoint>,
    pub truncated: bool,
    pub omitted_count: usize,
    /// Directions link, `None` when there is nothing to visit.
    pub uri: Option<String>,
    /// The link ends early because the waypoint list exceeds the
    /// navigation target's stop limit.
    pub uri_truncated: bool,
}

/// Caps an ordered stop list and renders the navigation payload.
pub fn export_route(
    origin: Coordinate,
    stops: &[RouteStop<'_>],
    max_stops: usize,
) -> Result<RouteExport, RouteExportError> {
    if max_stops == 0 {
        return Err(RouteExportError::InvalidStopCap(max_stops));
    }

    let kept = &stops[..stops.len().min(max_stops)];
    let omitted_count = stops.len() - kept.len();
    let waypoints = kept
        .iter()
        .map(|stop| Waypoint {
            stop_number: stop.stop_number,
            account_id: stop.account.id.clone(),
            name: stop.account.name.clone(),
            coordinate: stop.coordinate,
        })
        .collect::<Vec<_>>();

    let linked = &waypoints[..waypoints.len().min(MAX_DIRECTIONS_STOPS)];
    let uri = match linked.split_last() {
        Some((destination, via)) => Some(directions_uri(origin, destination, via)?),
        None => None,
    };
    let uri_truncated = linked.len() < waypoints.len();

    Ok(RouteExport {
        origin,
        waypoints,
        truncated: omitted_count > 0,
        omitted_count,
        uri,
        uri_truncated,
    })
}

fn directions_uri(
    origin: Coordinate,
    destination: &Waypoint,
    via: &[Waypoint],
) -> Result<String, RouteExportError> {
    let mut uri = Url::parse(DIRECTIONS_BASE_URL)?;
    {
        let mut query = uri.query_pairs_mut();
        query
            .append_pair("api", "1")
            .append_pair("origin", &origin.to_query_value())
            .append_pair("destination", &destination.coordinate.to_query_value());
        if !via.is_empty() {
            let joined = via
                .iter()
                .map(|waypoint| waypoint.coordinate.to_query_value())
                .collect::<Vec<_>>()
                .join("|");
            query.append_pair("waypoints", &joined);
        }
        query.append_pair("travelmode", "driving");
    }
    Ok(uri.into())
}
