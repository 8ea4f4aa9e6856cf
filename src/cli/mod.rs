//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Summarize write-throughput benchmark logs into a time series
#[derive(Parser, Debug)]
#[command(name = "mkbench", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: .mkbench.yaml in the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write JSON-formatted logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse raw write-throughput data and update the summaries
    Write(WriteArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the write command.
#[derive(Args, Debug, Clone, Default)]
pub struct WriteArgs {
    /// Root of the raw benchmark data [default: data]
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Output directory for summary files [default: write-throughput]
    #[arg(long)]
    pub summary_dir: Option<PathBuf>,

    /// Do not take the summary directory lock
    #[arg(long)]
    pub no_lock: bool,
}

/// Arguments for the completions command.
#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: ShellType,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Supported shells for completion generation.
#[derive(ValueEnum, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell", alias = "pwsh")]
    /// `PowerShell`
    PowerShell,
    Elvish,
}
