//! Multi-section account filtering and grouping.
//!
//! # Invariants
//! - Empty selection means "all accounts", unassigned ones included.
//! - Section-filtered views never contain unassigned accounts; they are
//!   counted in `excluded_count` instead.
//! - When present, `groups` holds exactly the accounts of `accounts`.

use crate::model::account::{Account, SectionId};
use crate::territory::section::SectionLookup;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Filtered account list with optional per-section grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPartition<'a> {
    /// Accounts in input order.
    pub accounts: Vec<&'a Account>,
    /// Present only when more than one section was selected.
    pub groups: Option<BTreeMap<SectionId, Vec<&'a Account>>>,
    /// Accounts dropped because no section could be resolved.
    pub excluded_count: usize,
}

/// Filters `accounts` down to `selected` sections.
pub fn partition_by_section<'a>(
    accounts: &'a [Account],
    selected: &BTreeSet<SectionId>,
    lookup: &SectionLookup,
) -> SectionPartition<'a> {
    if selected.is_empty() {
        return SectionPartition {
            accounts: accounts.iter().collect(),
            groups: None,
            excluded_count: 0,
        };
    }

    let mut filtered = Vec::new();
    let mut grouped: BTreeMap<SectionId, Vec<&'a Account>> = BTreeMap::new();
    let mut excluded_count = 0;
    for account in accounts {
        match lookup.resolve(account) {
            Some(section) if selected.contains(&section) => {
                filtered.push(account);
                grouped.entry(section).or_default().push(account);
            }
            Some(_) => {}
            None => excluded_count += 1,
        }
    }

    SectionPartition {
        accounts: filtered,
        groups: (selected.len() > 1).then_some(grouped),
        excluded_count,
    }
}

#[cfg(test)]
mod tests {
    use super::partition_by_section;
    use crate::model::account::{Account, SectionId};
    use crate::territory::section::SectionLookup;
    use std::collections::BTreeSet;

    #[test]
    fn single_section_selection_has_no_groups() {
        let section = SectionId::new(4).unwrap();
        let accounts = vec![
            Account::new("a1", "One").with_section(section),
            Account::new("a2", "Two"),
        ];
        let selected = BTreeSet::from([section]);
        let partition = partition_by_section(&accounts, &selected, &SectionLookup::default());

        assert_eq!(partition.accounts.len(), 1);
        assert_eq!(partition.accounts[0].id, "a1");
        assert!(partition.groups.is_none());
        assert_eq!(partition.excluded_count, 1);
    }
}
