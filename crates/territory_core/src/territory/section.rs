//! Section labels and the city → section lookup table.
//!
//! # Responsibility
//! - Hold human labels for the fixed section grid.
//! - Resolve an account to its section in O(1).
//!
//! # Invariants
//! - A precomputed `Account::section` always wins over city lookup.
//! - A city registered under two different sections is ambiguous and
//!   resolves to "unassigned", never to an arbitrary pick.

use crate::model::account::{Account, SectionId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// One configured section with the cities it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub id: SectionId,
    pub label: String,
    #[serde(default)]
    pub cities: Vec<String>,
}

/// Errors from building a lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionError {
    DuplicateSection(SectionId),
    EmptyLabel(SectionId),
}

impl Display for SectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSection(id) => write!(f, "section {id} is configured more than once"),
            Self::EmptyLabel(id) => write!(f, "section {id} label must not be blank"),
        }
    }
}

impl Error for SectionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CityMatch {
    Section(SectionId),
    Ambiguous,
}

/// Static mapping of city names and section labels.
#[derive(Debug, Clone, Default)]
pub struct SectionLookup {
    labels: BTreeMap<SectionId, String>,
    cities: HashMap<String, CityMatch>,
}

impl SectionLookup {
    /// Builds the table from configured entries.
    pub fn from_entries(entries: &[SectionEntry]) -> Result<Self, SectionError> {
        let mut lookup = Self::default();
        for entry in entries {
            let label = entry.label.trim();
            if label.is_empty() {
                return Err(SectionError::EmptyLabel(entry.id));
            }
            if lookup.labels.insert(entry.id, label.to_string()).is_some() {
                return Err(SectionError::DuplicateSection(entry.id));
            }
            for city in &entry.cities {
                let key = normalize_city(city);
                if key.is_empty() {
                    continue;
                }
                lookup
                    .cities
                    .entry(key)
                    .and_modify(|current| {
                        if *current != CityMatch::Section(entry.id) {
                            *current = CityMatch::Ambiguous;
                        }
                    })
                    .or_insert(CityMatch::Section(entry.id));
            }
        }
        Ok(lookup)
    }

    /// Section for a city name, or `None` when unknown or ambiguous.
    pub fn section_for_city(&self, city: &str) -> Option<SectionId> {
        match self.cities.get(&normalize_city(city)) {
            Some(CityMatch::Section(id)) => Some(*id),
            Some(CityMatch::Ambiguous) | None => None,
        }
    }

    /// Resolves an account: precomputed section first, then city lookup.
    pub fn resolve(&self, account: &Account) -> Option<SectionId> {
        account.section.or_else(|| {
            account
                .city
                .as_deref()
                .and_then(|city| self.section_for_city(city))
        })
    }

    /// Configured label, falling back to `Section N`.
    pub fn label(&self, id: SectionId) -> String {
        self.labels
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Section {id}"))
    }
}

/// Trims, collapses inner whitespace and case-folds a city name.
pub fn normalize_city(city: &str) -> String {
    WHITESPACE_RE
        .replace_all(city.trim(), " ")
        .to_lowercase()
}
