//! CLI argument parsing for `wfsimplify`.
//!
//! The CLI only reads files, applies flag overrides to the configuration and
//! prints; all workflow logic lives in the library.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "wfsimplify",
    version,
    about = "Normalize workflow text into numbered steps with explicit decisions",
    after_help = "Examples:\n  wfsimplify simplify process.txt\n  wfsimplify simplify process.txt -o clean.txt --flatten-substeps\n  wfsimplify simplify process.txt --stdout -c rules.json\n  wfsimplify analyze process.txt --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Simplify(SimplifyArgs),
    Analyze(AnalyzeArgs),
}

/// Simplify command inputs.
#[derive(Parser, Debug)]
#[command(about = "Rewrite a workflow file as numbered steps")]
pub struct SimplifyArgs {
    /// Workflow text file to read
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path (default: <stem>_clean.txt next to the input)
    #[arg(short, long, value_name = "PATH", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Promote sub-steps to top-level steps
    #[arg(long)]
    pub flatten_substeps: bool,

    /// Do not add Start/End steps
    #[arg(long)]
    pub no_auto_terminators: bool,

    /// Treat every line as its own unit instead of joining wrapped lines
    #[arg(long)]
    pub no_merge_multiline: bool,

    /// Print the result instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Debug logging and a preview of the result
    #[arg(short, long)]
    pub verbose: bool,
}

/// Analyze command inputs.
#[derive(Parser, Debug)]
#[command(about = "Report format, step counts and decision points")]
pub struct AnalyzeArgs {
    /// Workflow text file to read
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// JSON configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
