//! Free-text account search and column sorting for the territory table.
//!
//! # Invariants
//! - Sorting is total: equal keys fall back to ascending account id.
//! - Missing text fields sort as the empty string; missing activity sorts
//!   before any timestamp.

use crate::model::account::Account;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Case-insensitive substring match over name, city, state and industry.
///
/// A blank query returns every account. Input order is preserved.
pub fn search_accounts<'a>(accounts: &'a [Account], query: &str) -> Vec<&'a Account> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return accounts.iter().collect();
    }

    accounts
        .iter()
        .filter(|account| {
            std::iter::once(Some(account.name.as_str()))
                .chain([
                    account.city.as_deref(),
                    account.state.as_deref(),
                    account.industry.as_deref(),
                ])
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Sortable column of the territory table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountSortField {
    #[default]
    Name,
    City,
    State,
    Industry,
    LastActivity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortField(pub String);

impl Display for UnknownSortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown sort field `{}`; expected name|city|state|industry|last_activity",
            self.0
        )
    }
}

impl Error for UnknownSortField {}

impl FromStr for AccountSortField {
    type Err = UnknownSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "city" => Ok(Self::City),
            "state" => Ok(Self::State),
            "industry" => Ok(Self::Industry),
            "last_activity" | "lastactivity" | "last-activity" => Ok(Self::LastActivity),
            other => Err(UnknownSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sorts `accounts` in place by `field`.
///
/// Text columns compare case-insensitively. `direction` applies to the
/// column only; the id tie-break is always ascending.
pub fn sort_accounts(
    accounts: &mut [&Account],
    field: AccountSortField,
    direction: SortDirection,
) {
    accounts.sort_by(|a, b| {
        let primary = compare_field(a, b, field);
        let primary = match direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    });
}

fn compare_field(a: &Account, b: &Account, field: AccountSortField) -> Ordering {
    match field {
        AccountSortField::Name => folded(Some(&a.name)).cmp(&folded(Some(&b.name))),
        AccountSortField::City => folded(a.city.as_ref()).cmp(&folded(b.city.as_ref())),
        AccountSortField::State => folded(a.state.as_ref()).cmp(&folded(b.state.as_ref())),
        AccountSortField::Industry => {
            folded(a.industry.as_ref()).cmp(&folded(b.industry.as_ref()))
        }
        AccountSortField::LastActivity => a.last_activity_ms.cmp(&b.last_activity_ms),
    }
}

fn folded(value: Option<&String>) -> String {
    value.map(|text| text.to_lowercase()).unwrap_or_default()
}
