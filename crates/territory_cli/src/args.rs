use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use territory_core::{AccountSortField, RankMode, TaskOwner};

/// Territory planner over a JSON snapshot of accounts and outcomes.
#[derive(Debug, Parser)]
#[command(name = "territory")]
#[command(version)]
pub struct Cli {
    /// Planner configuration file (JSON); defaults apply when omitted
    #[arg(long, value_name = "FILE", env = "TERRITORY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Evaluation time in Unix epoch milliseconds; defaults to the system clock
    #[arg(long, value_name = "MS", global = true)]
    pub now_ms: Option<i64>,

    /// Directory for rolling log files; logging stays off when omitted
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = "TERRITORY_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct SnapshotArg {
    /// Snapshot file (JSON with `accounts` and `outcomes`)
    #[arg(long, value_name = "FILE")]
    pub snapshot: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank blocked outcomes by urgency
    Rank {
        #[command(flatten)]
        input: SnapshotArg,
        /// impact, age or owner
        #[arg(long, default_value = "impact")]
        mode: RankMode,
        /// Bucket results by constraint owner
        #[arg(long)]
        group_by_owner: bool,
        /// Keep only constraints owned by this party
        #[arg(long)]
        owner: Option<TaskOwner>,
    },
    /// Filter and group accounts by territory section
    Sections {
        #[command(flatten)]
        input: SnapshotArg,
        /// Section id (1-9); repeat to select several
        #[arg(long = "section", value_name = "N")]
        sections: Vec<u8>,
        /// Case-insensitive search over name, city, state and industry
        #[arg(long)]
        search: Option<String>,
        /// name, city, state, industry or last_activity; input order when omitted
        #[arg(long, value_name = "FIELD")]
        sort: Option<AccountSortField>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Build a visiting order from the home base and export directions
    Route {
        #[command(flatten)]
        input: SnapshotArg,
        /// Account id to visit; repeat in selection order. All accounts when omitted
        #[arg(long = "account", value_name = "ID")]
        accounts: Vec<String>,
        /// Waypoint cap for the exported directions link
        #[arg(long)]
        max_stops: Option<usize>,
    },
    /// Command-center summary, top constraints and waiting room
    Hitlist {
        #[command(flatten)]
        input: SnapshotArg,
        /// Entries per ranked list
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}
