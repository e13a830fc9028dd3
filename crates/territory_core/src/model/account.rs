//! Account domain model.
//!
//! # Responsibility
//! - Describe one physical customer location as delivered by the data layer.
//! - Derive revenue tier and activity recency without storing them.
//!
//! # Invariants
//! - `coordinate == None` means the account is ungeocoded and cannot be routed.
//! - `section`, when present, is a valid `SectionId` (1..=9).

use crate::model::elapsed_days;
use crate::model::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable account identifier from the external source (e.g. a CRM id).
pub type AccountId = String;

/// Lowest valid territory section number.
pub const MIN_SECTION: u8 = 1;
/// Highest valid territory section number.
pub const MAX_SECTION: u8 = 9;

/// Error raised when a section number is outside the fixed territory grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionOutOfRange(pub u8);

impl Display for SectionOutOfRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "section {} is outside {MIN_SECTION}..={MAX_SECTION}",
            self.0
        )
    }
}

impl Error for SectionOutOfRange {}

/// Numbered territory partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SectionId(u8);

impl SectionId {
    /// Creates a section id, rejecting numbers outside 1..=9.
    pub fn new(value: u8) -> Result<Self, SectionOutOfRange> {
        if (MIN_SECTION..=MAX_SECTION).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SectionOutOfRange(value))
        }
    }

    /// Returns the raw section number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Every section of the grid in ascending order.
    pub fn all() -> impl Iterator<Item = SectionId> {
        (MIN_SECTION..=MAX_SECTION).map(SectionId)
    }
}

impl TryFrom<u8> for SectionId {
    type Error = SectionOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SectionId> for u8 {
    fn from(value: SectionId) -> Self {
        value.0
    }
}

impl Display for SectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Revenue bucket used for map pin weight and attention lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RevenueTier {
    A,
    B,
    C,
}

/// Minimum annual revenue for tiers A and B. Everything below B is C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub a_min: f64,
    pub b_min: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            a_min: 100_000.0,
            b_min: 25_000.0,
        }
    }
}

impl RevenueTier {
    /// Buckets annual revenue; thresholds are inclusive lower bounds.
    pub fn from_revenue(revenue: f64, thresholds: &TierThresholds) -> Self {
        if revenue >= thresholds.a_min {
            Self::A
        } else if revenue >= thresholds.b_min {
            Self::B
        } else {
            Self::C
        }
    }
}

/// Recency bucket of an account's last recorded touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityBand {
    Recent,
    Cooling,
    Stale,
    Never,
}

/// Day limits separating the activity bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityBands {
    /// Strictly fewer days than this is `Recent`.
    pub recent_days: u32,
    /// Strictly fewer days than this (and not recent) is `Cooling`.
    pub cooling_days: u32,
}

impl Default for ActivityBands {
    fn default() -> Self {
        Self {
            recent_days: 30,
            cooling_days: 90,
        }
    }
}

impl ActivityBand {
    /// Buckets days since the last touch; no touch at all is `Never`.
    pub fn classify(last_activity_ms: Option<i64>, now_ms: i64, bands: &ActivityBands) -> Self {
        let Some(last) = last_activity_ms else {
            return Self::Never;
        };
        let days = elapsed_days(last, now_ms);
        if days < bands.recent_days {
            Self::Recent
        } else if days < bands.cooling_days {
            Self::Cooling
        } else {
            Self::Stale
        }
    }
}

/// A physical customer location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    /// Precomputed section (polygon containment upstream). Wins over `city`.
    #[serde(default)]
    pub section: Option<SectionId>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub annual_revenue: f64,
    /// Unix epoch milliseconds of the last logged activity.
    #[serde(default)]
    pub last_activity_ms: Option<i64>,
}

impl Account {
    /// Creates an ungeocoded, unassigned account with zero revenue.
    pub fn new(id: impl Into<AccountId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate: None,
            section: None,
            city: None,
            state: None,
            industry: None,
            annual_revenue: 0.0,
            last_activity_ms: None,
        }
    }

    /// Sets the geocoded location.
    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    /// Sets a precomputed section.
    pub fn with_section(mut self, section: SectionId) -> Self {
        self.section = Some(section);
        self
    }

    /// Sets the city used for section lookup.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Sets annual revenue.
    pub fn with_revenue(mut self, annual_revenue: f64) -> Self {
        self.annual_revenue = annual_revenue;
        self
    }

    /// Returns `true` when the account can be routed.
    pub fn is_geocoded(&self) -> bool {
        self.coordinate.is_some()
    }

    /// Revenue tier under `thresholds`.
    pub fn tier(&self, thresholds: &TierThresholds) -> RevenueTier {
        RevenueTier::from_revenue(self.annual_revenue, thresholds)
    }

    /// Recency band of the last logged activity as of `now_ms`.
    pub fn activity_band(&self, now_ms: i64, bands: &ActivityBands) -> ActivityBand {
        ActivityBand::classify(self.last_activity_ms, now_ms, bands)
    }
}
