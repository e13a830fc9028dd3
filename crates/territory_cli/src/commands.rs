//! Subcommand runners.
//!
//! # Responsibility
//! - Load snapshot and config files, call the planner service, and print
//!   the result as pretty JSON.
//!
//! # Invariants
//! - Exactly one JSON document is written per successful command.
//! - Data-quality degradations are part of the output, not errors.

use crate::args::{Cli, Command};
use crate::error::CliError;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use territory_core::{
    search_accounts, sort_accounts, Account, PlannerConfig, PlannerService, RankQuery, SectionId,
    Snapshot, SortDirection,
};

/// Executes one parsed command, writing its JSON result to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => read_json::<PlannerConfig>(path)?,
        None => PlannerConfig::default(),
    };
    let service = PlannerService::new(config)?;
    let now_ms = cli.now_ms.unwrap_or_else(system_now_ms);

    match &cli.command {
        Command::Rank {
            input,
            mode,
            group_by_owner,
            owner,
        } => {
            let snapshot = load_snapshot(&input.snapshot)?;
            let mut query = RankQuery::new(*mode);
            if *group_by_owner {
                query = query.grouped();
            }
            if let Some(owner) = owner {
                query = query.owned_by(*owner);
            }
            let ranking = service.rank(&snapshot.outcomes, &query, now_ms);
            write_json(out, &ranking)
        }
        Command::Sections {
            input,
            sections,
            search,
            sort,
            desc,
        } => {
            let snapshot = load_snapshot(&input.snapshot)?;
            let selected = sections
                .iter()
                .map(|id| SectionId::new(*id))
                .collect::<Result<BTreeSet<_>, _>>()?;
            let matched = match search {
                Some(query) => search_accounts(&snapshot.accounts, query)
                    .into_iter()
                    .cloned()
                    .collect::<Vec<Account>>(),
                None => snapshot.accounts.clone(),
            };
            let mut partition = service.partition(&matched, &selected);
            if let Some(field) = sort {
                let direction = if *desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                sort_accounts(&mut partition.accounts, *field, direction);
                for group in partition.groups.iter_mut().flat_map(|groups| groups.values_mut()) {
                    sort_accounts(group, *field, direction);
                }
            }
            let rows = service.account_rows(&partition.accounts, now_ms);
            let labels = selected
                .iter()
                .map(|id| (id.get(), service.sections().label(*id)))
                .collect::<BTreeMap<_, _>>();
            write_json(
                out,
                &json!({
                    "labels": labels,
                    "partition": partition,
                    "rows": rows,
                }),
            )
        }
        Command::Route {
            input,
            accounts,
            max_stops,
        } => {
            let snapshot = load_snapshot(&input.snapshot)?;
            let selection = if accounts.is_empty() {
                snapshot
                    .accounts
                    .iter()
                    .map(|account| account.id.clone())
                    .collect::<Vec<_>>()
            } else {
                accounts.clone()
            };
            let plan = service.plan_route(&snapshot.accounts, &selection);
            let export = service.export(&plan.route, *max_stops)?;
            write_json(
                out,
                &json!({
                    "plan": plan,
                    "export": export,
                }),
            )
        }
        Command::Hitlist { input, limit } => {
            let snapshot = load_snapshot(&input.snapshot)?;
            let hit_list = service.hit_list(&snapshot.accounts, &snapshot.outcomes, *limit, now_ms);
            write_json(out, &hit_list)
        }
    }
}

fn load_snapshot(path: &Path) -> Result<Snapshot, CliError> {
    let snapshot = read_json::<Snapshot>(path)?;
    for err in snapshot.validation_errors() {
        warn!("event=snapshot_load module=cli status=degraded reason=\"{err}\"");
    }
    Ok(snapshot)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(CliError::Encode)?;
    writeln!(out).map_err(CliError::Output)
}

fn system_now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::args::Cli;
    use crate::error::CliError;
    use clap::Parser;
    use serde_json::{json, Value};
    use std::path::Path;
    use tempfile::TempDir;

    const DAY_MS: i64 = 86_400_000;

    fn write_snapshot(dir: &TempDir) -> String {
        let snapshot = json!({
            "accounts": [
                {
                    "id": "acct_1",
                    "name": "Acme Tooling",
                    "coordinate": { "lat": 39.0, "lng": -97.0 },
                    "city": "Olathe",
                    "annual_revenue": 250000.0
                },
                {
                    "id": "acct_2",
                    "name": "Beacon Supply",
                    "coordinate": { "lat": 39.0, "lng": -98.5 },
                    "city": "Liberty"
                },
                { "id": "acct_3", "name": "Unmapped Co", "city": "Sedalia" }
            ],
            "outcomes": [
                {
                    "id": "out_a",
                    "title": "Enterprise",
                    "account_id": "acct_1",
                    "value": 320000.0,
                    "status": "active",
                    "tasks": [{
                        "id": "t1",
                        "description": "proposal",
                        "owner": "rep",
                        "status": "pending",
                        "created_at_ms": 0
                    }],
                    "constraint_task_id": "t1"
                },
                {
                    "id": "out_b",
                    "title": "Expansion",
                    "account_id": "acct_2",
                    "value": 75000.0,
                    "status": "at_risk",
                    "tasks": [{
                        "id": "t2",
                        "description": "pricing",
                        "owner": "vendor",
                        "status": "pending",
                        "created_at_ms": -15 * DAY_MS
                    }],
                    "constraint_task_id": "t2"
                }
            ]
        });
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, snapshot.to_string()).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn run_args(args: &[&str]) -> Result<Value, CliError> {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        run(&cli, &mut out)?;
        Ok(serde_json::from_slice(&out).unwrap())
    }

    #[test]
    fn rank_prints_flat_ranking() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_snapshot(&dir);
        let now = (45 * DAY_MS).to_string();

        let value = run_args(&["territory", "rank", "--snapshot", &snapshot, "--now-ms", &now])
            .unwrap();
        assert_eq!(value["view"], "flat");
        let ids = value["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["outcome"]["id"].as_str().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["out_a", "out_b"]);
        assert_eq!(value["items"][0]["score"], 14_400_000.0);
    }

    #[test]
    fn rank_groups_by_owner_label() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_snapshot(&dir);

        let value = run_args(&[
            "territory",
            "rank",
            "--snapshot",
            &snapshot,
            "--mode",
            "age",
            "--group-by-owner",
            "--now-ms",
            "0",
        ])
        .unwrap();
        assert_eq!(value["view"], "by_owner");
        assert!(value["items"]["rep"].is_array());
        assert!(value["items"]["vendor"].is_array());
    }

    #[test]
    fn route_truncates_export_to_cap() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_snapshot(&dir);

        let value = run_args(&[
            "territory",
            "route",
            "--snapshot",
            &snapshot,
            "--max-stops",
            "1",
        ])
        .unwrap();
        assert_eq!(value["plan"]["ungeocoded_count"], 1);
        assert_eq!(value["plan"]["route"]["stops"][0]["account"]["id"], "acct_2");
        assert_eq!(value["export"]["truncated"], true);
        assert_eq!(value["export"]["omitted_count"], 1);
    }

    #[test]
    fn route_rejects_zero_cap() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_snapshot(&dir);

        let err = run_args(&[
            "territory",
            "route",
            "--snapshot",
            &snapshot,
            "--max-stops",
            "0",
        ])
        .unwrap_err();
        assert!(matches!(err, CliError::Export(_)));
    }

    #[test]
    fn sections_use_configured_city_table() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_snapshot(&dir);
        let config = dir.path().join("config.json");
        std::fs::write(
            &config,
            json!({
                "sections": [
                    { "id": 2, "label": "South Metro", "cities": ["Olathe"] },
                    { "id": 5, "label": "North Metro", "cities": ["Liberty"] }
                ]
            })
            .to_string(),
        )
        .unwrap();

        let value = run_args(&[
            "territory",
            "--config",
            config.to_str().unwrap(),
            "sections",
            "--snapshot",
            &snapshot,
            "--section",
            "2",
            "--section",
            "5",
        ])
        .unwrap();
        assert_eq!(value["labels"]["2"], "South Metro");
        assert_eq!(value["partition"]["excluded_count"], 1);
        assert_eq!(value["partition"]["groups"]["5"][0]["id"], "acct_2");
    }

    #[test]
    fn sections_sort_rows_and_band_activity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        let snapshot = json!({
            "accounts": [
                { "id": "acct_1", "name": "acme", "city": "Olathe", "last_activity_ms": 0 },
                { "id": "acct_2", "name": "Beacon", "last_activity_ms": 80 * DAY_MS },
                { "id": "acct_3", "name": "Crest", "city": "liberty" }
            ],
            "outcomes": []
        });
        std::fs::write(&path, snapshot.to_string()).unwrap();
        let now = (100 * DAY_MS).to_string();
        let sections = |extra: &[&str]| {
            let mut args = vec![
                "territory",
                "sections",
                "--snapshot",
                path.to_str().unwrap(),
                "--now-ms",
                &now,
            ];
            args.extend_from_slice(extra);
            run_args(&args).unwrap()
        };
        let ids = |value: &Value| {
            value["rows"]
                .as_array()
                .unwrap()
                .iter()
                .map(|row| row["account"]["id"].as_str().unwrap().to_string())
                .collect::<Vec<_>>()
        };

        let by_city = sections(&["--sort", "city"]);
        assert_eq!(ids(&by_city), ["acct_2", "acct_3", "acct_1"]);
        assert_eq!(by_city["partition"]["accounts"][0]["id"], "acct_2");

        let by_city_desc = sections(&["--sort", "city", "--desc"]);
        assert_eq!(ids(&by_city_desc), ["acct_1", "acct_3", "acct_2"]);

        let unsorted = sections(&[]);
        assert_eq!(ids(&unsorted), ["acct_1", "acct_2", "acct_3"]);
        assert_eq!(unsorted["rows"][0]["activity"], "stale");
        assert_eq!(unsorted["rows"][1]["activity"], "recent");
        assert_eq!(unsorted["rows"][2]["activity"], "never");
        assert_eq!(unsorted["rows"][2]["tier"], "C");
    }

    #[test]
    fn sections_reject_out_of_range_ids() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_snapshot(&dir);

        let err = run_args(&["territory", "sections", "--snapshot", &snapshot, "--section", "0"])
            .unwrap_err();
        assert!(matches!(err, CliError::Section(_)));
    }

    #[test]
    fn hitlist_reports_summary() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_snapshot(&dir);

        let value = run_args(&[
            "territory",
            "hitlist",
            "--snapshot",
            &snapshot,
            "--now-ms",
            "0",
        ])
        .unwrap();
        assert_eq!(value["summary"]["open_outcomes"], 2);
        assert_eq!(value["summary"]["rep_blockers"], 1);
        assert_eq!(value["tier_a_attention"][0]["account"]["id"], "acct_1");
        assert_eq!(value["action_list"][0]["task"]["id"], "t1");
    }

    #[test]
    fn missing_snapshot_is_a_read_error() {
        let err = run_args(&["territory", "hitlist", "--snapshot", "/nonexistent/snap.json"])
            .unwrap_err();
        match err {
            CliError::Read { path, .. } => assert_eq!(path, Path::new("/nonexistent/snap.json")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
