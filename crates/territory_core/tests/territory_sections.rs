use std::collections::BTreeSet;
use territory_core::{partition_by_section, Account, SectionEntry, SectionId, SectionLookup};

fn section(id: u8) -> SectionId {
    SectionId::new(id).unwrap()
}

fn lookup() -> SectionLookup {
    SectionLookup::from_entries(&[
        SectionEntry {
            id: section(1),
            label: "North Metro".to_string(),
            cities: vec!["Liberty".to_string(), "Gladstone".to_string()],
        },
        SectionEntry {
            id: section(2),
            label: "South Metro".to_string(),
            cities: vec!["Olathe".to_string(), "Lenexa".to_string()],
        },
        SectionEntry {
            id: section(3),
            label: "Rural East".to_string(),
            cities: vec!["Sedalia".to_string()],
        },
    ])
    .unwrap()
}

fn accounts() -> Vec<Account> {
    vec![
        Account::new("a1", "Liberty Tool").with_city("liberty"),
        Account::new("a2", "Olathe Supply").with_city(" Olathe "),
        Account::new("a3", "Mystery Co").with_city("Atlantis"),
        Account::new("a4", "Polygon Placed").with_section(section(3)),
        Account::new("a5", "Lenexa Labs").with_city("LENEXA"),
        Account::new("a6", "No City"),
    ]
}

fn ids(list: &[&Account]) -> Vec<String> {
    list.iter().map(|account| account.id.clone()).collect()
}

#[test]
fn empty_selection_keeps_every_account() {
    let accounts = accounts();
    let partition = partition_by_section(&accounts, &BTreeSet::new(), &lookup());

    assert_eq!(partition.accounts.len(), accounts.len());
    assert!(partition.groups.is_none());
    assert_eq!(partition.excluded_count, 0);
}

#[test]
fn section_filter_drops_unassigned_and_counts_them() {
    let accounts = accounts();
    let selected = BTreeSet::from([section(2)]);
    let partition = partition_by_section(&accounts, &selected, &lookup());

    assert_eq!(ids(&partition.accounts), ["a2", "a5"]);
    assert!(partition.groups.is_none());
    // a3 (unknown city) and a6 (no city) cannot be placed.
    assert_eq!(partition.excluded_count, 2);
}

#[test]
fn multi_section_selection_groups_without_loss() {
    let accounts = accounts();
    let selected = BTreeSet::from([section(1), section(2), section(3)]);
    let partition = partition_by_section(&accounts, &selected, &lookup());

    assert_eq!(ids(&partition.accounts), ["a1", "a2", "a4", "a5"]);
    let groups = partition.groups.expect("multi-section selection groups");
    assert_eq!(
        groups.keys().copied().collect::<Vec<_>>(),
        [section(1), section(2), section(3)]
    );
    assert_eq!(ids(&groups[&section(2)]), ["a2", "a5"]);
    assert_eq!(
        groups.values().map(Vec::len).sum::<usize>(),
        partition.accounts.len()
    );
}

#[test]
fn selected_section_without_members_has_no_bucket() {
    let accounts = accounts();
    let selected = BTreeSet::from([section(1), section(9)]);
    let partition = partition_by_section(&accounts, &selected, &lookup());

    let groups = partition.groups.expect("multi-section selection groups");
    assert_eq!(groups.len(), 1);
    assert!(groups.contains_key(&section(1)));
}

#[test]
fn empty_accounts_yield_empty_partition() {
    let selected = BTreeSet::from([section(1), section(2)]);
    let partition = partition_by_section(&[], &selected, &lookup());

    assert!(partition.accounts.is_empty());
    assert_eq!(partition.excluded_count, 0);
    assert!(partition.groups.expect("grouping requested").is_empty());
}

#[test]
fn labels_come_from_lookup() {
    let lookup = lookup();
    assert_eq!(lookup.label(section(3)), "Rural East");
    assert_eq!(lookup.label(section(8)), "Section 8");
}
