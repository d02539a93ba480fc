use clap::{Parser, Subcommand};
use session_check::report::OutputFormat;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "session-check")]
#[command(about = "Report files and sessions missing for some subjects of a dataset", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check a dataset directory for missing sessions and files
    Check(CheckArgs),
    /// List the files taking part in the check with their subject and session
    List(ListArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Dataset root directory
    pub root: PathBuf,
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Exit with status 1 when any issue is found
    #[arg(long)]
    pub fail_on_issues: bool,
    /// Extra glob marking auxiliary data to leave out (repeatable)
    #[arg(long = "exclude")]
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// Dataset root directory
    pub root: PathBuf,
}
