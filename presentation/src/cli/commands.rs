//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for batch results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable feedback
    Text,
    /// Full report as JSON
    Json,
}

/// CLI arguments for toolflow
#[derive(Parser, Debug)]
#[command(name = "toolflow")]
#[command(author, version, about = "Resolve and execute batches of dependent tool invocations")]
#[command(long_about = r#"
Toolflow takes a batch of tool invocations, orders them so that every tool runs
after the tools it depends on, and executes them one by one against their HTTP
endpoints with per-tool timeouts and retries.

Configuration files are loaded from (in priority order):
1. TOOLFLOW_* environment variables
2. --config <path>     Explicit config file
3. ./toolflow.toml     Project-level config
4. ~/.config/toolflow/config.toml   Global config

A batch file is a JSON array of invocations:
  [{"tool": "search", "parameters": {"keyword": "lamp"}},
   {"tool": "add_to_order", "parameters": {"quantity": 1}}]

Example:
  toolflow tools
  toolflow plan --batch batch.json
  toolflow run --batch batch.json --output json
"#)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved execution order of a batch
    Plan {
        /// Batch file (JSON array of invocations)
        #[arg(short, long, value_name = "FILE")]
        batch: PathBuf,
    },

    /// Resolve and execute a batch
    Run {
        /// Batch file (JSON array of invocations)
        #[arg(short, long, value_name = "FILE")]
        batch: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,

        /// Suppress progress indicators
        #[arg(short, long)]
        quiet: bool,
    },

    /// List registered tools
    Tools,

    /// Show configuration file locations
    ShowConfig,
}
