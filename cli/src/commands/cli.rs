use std::path::PathBuf;

use clap::Parser;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Evaluate quality gates for the current change and exit with the verdict:
/// 0 = promote, 1 = manual QA, 2 = refine, 3 = execution failure.
#[derive(Parser, Debug)]
#[command(name = "qgate", version)]
pub struct Args {
    /// Project root directory (defaults to the working directory).
    #[arg(long)]
    pub project_root: Option<PathBuf>,

    /// Quality gates configuration file (JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file for results (JSON format).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Read a metrics snapshot (JSON) instead of probing the project.
    #[arg(long)]
    pub metrics: Option<PathBuf>,

    /// Summary format printed to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging.
    #[arg(long, short)]
    pub verbose: bool,
}
