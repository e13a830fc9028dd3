//! Planner configuration.
//!
//! # Responsibility
//! - Hold tunables (home base, export cap, tier and activity thresholds).
//! - Carry the city → section table supplied by the operator.
//!
//! # Invariants
//! - Every field has a default, so a partial config document is valid.
//! - `validate` must pass before a `PlannerService` is built from it.

use crate::model::account::{ActivityBands, TierThresholds};
use crate::model::geo::Coordinate;
use crate::territory::section::{SectionEntry, SectionError, SectionLookup};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Waypoint cap of the default navigation target (nine via points plus
/// the destination).
pub const DEFAULT_MAX_ROUTE_STOPS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidStopCap(usize),
    InvalidTierThresholds { a_min: f64, b_min: f64 },
    InvalidActivityBands { recent_days: u32, cooling_days: u32 },
    Sections(SectionError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStopCap(value) => {
                write!(f, "max_route_stops must be >= 1, got {value}")
            }
            Self::InvalidTierThresholds { a_min, b_min } => write!(
                f,
                "tier thresholds must satisfy a_min >= b_min >= 0, got a_min={a_min} b_min={b_min}"
            ),
            Self::InvalidActivityBands {
                recent_days,
                cooling_days,
            } => write!(
                f,
                "activity bands must satisfy recent_days < cooling_days, got {recent_days} and {cooling_days}"
            ),
            Self::Sections(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sections(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SectionError> for ConfigError {
    fn from(value: SectionError) -> Self {
        Self::Sections(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Fixed route origin.
    pub home_base: Coordinate,
    pub max_route_stops: usize,
    pub tier_thresholds: TierThresholds,
    pub activity_bands: ActivityBands,
    pub sections: Vec<SectionEntry>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            home_base: default_home_base(),
            max_route_stops: DEFAULT_MAX_ROUTE_STOPS,
            tier_thresholds: TierThresholds::default(),
            activity_bands: ActivityBands::default(),
            sections: Vec::new(),
        }
    }
}

// Geographic center of the contiguous US.
fn default_home_base() -> Coordinate {
    match Coordinate::new(39.0, -98.0) {
        Ok(coordinate) => coordinate,
        Err(_) => unreachable!("constant coordinate is in range"),
    }
}

impl PlannerConfig {
    /// Checks caps, thresholds, bands and the section table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_route_stops == 0 {
            return Err(ConfigError::InvalidStopCap(self.max_route_stops));
        }
        let TierThresholds { a_min, b_min } = self.tier_thresholds;
        if !a_min.is_finite() || !b_min.is_finite() || b_min < 0.0 || a_min < b_min {
            return Err(ConfigError::InvalidTierThresholds { a_min, b_min });
        }
        let ActivityBands {
            recent_days,
            cooling_days,
        } = self.activity_bands;
        if recent_days >= cooling_days {
            return Err(ConfigError::InvalidActivityBands {
                recent_days,
                cooling_days,
            });
        }
        self.section_lookup()?;
        Ok(())
    }

    /// Builds the city → section table.
    pub fn section_lookup(&self) -> Result<SectionLookup, SectionError> {
        SectionLookup::from_entries(&self.sections)
    }
}
