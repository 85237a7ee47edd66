//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON (same shapes as the HTTP API)
    Json,
}

impl From<OutputFormat> for ledger_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ledger_domain::OutputFormat::Text,
            OutputFormat::Json => ledger_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for vote-ledger
#[derive(Parser, Debug)]
#[command(name = "vote-ledger")]
#[command(author, version, about = "Vote ledger and answer acceptance for Q&A platforms")]
#[command(long_about = r#"
vote-ledger records per-user votes on questions and answers, keeps each
item's vote total consistent with its ledger, and lets a question's author
accept one answer.

Voting the same value twice retracts the vote; voting the opposite value
flips it.

Configuration files are loaded from (in priority order):
1. VOTE_LEDGER_* environment variables (e.g. VOTE_LEDGER_SERVER__LISTEN_ADDR)
2. --config <path>          Explicit config file
3. ./vote-ledger.toml       Project-level config
4. ~/.config/vote-ledger/config.toml   Global config

Example:
  vote-ledger import seed.json
  vote-ledger vote alice a1 answer +1
  vote-ledger accept alice a1
  vote-ledger serve --listen 0.0.0.0:8080
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (defaults to [output].format, then text)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Listen address (overrides [server].listen_addr)
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
    },

    /// Cast, flip or retract a vote
    Vote {
        user_id: String,
        item_id: String,
        /// `question` or `answer`
        item_kind: String,
        /// `+1` or `-1`; repeating the current vote retracts it
        #[arg(allow_hyphen_values = true)]
        value: i64,
    },

    /// Show a user's vote on an item and the item's total
    Status {
        user_id: String,
        item_id: String,
        item_kind: String,
    },

    /// Accept an answer as the requesting user
    Accept {
        requesting_user_id: String,
        answer_id: String,
    },

    /// Recompute totals from the ledger and check acceptance flags
    Reconcile {
        /// Reconcile only this item and print its breakdown
        #[arg(long, requires = "item_kind")]
        item_id: Option<String>,
        #[arg(long, requires = "item_id")]
        item_kind: Option<String>,
    },

    /// Load questions, answers and votes from a JSON seed file
    Import { path: PathBuf },
}
