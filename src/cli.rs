use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn get_version() -> &'static str {
    const BASE_VERSION: &str = env!("CARGO_PKG_VERSION");

    // If there's a git tag at HEAD, use just the tag (release build)
    if let Some(tag) = option_env!("RELHARVEST_GIT_TAG") {
        return tag;
    }

    // Not on a tag - include commit hash and branch (dev build)
    let commit = option_env!("RELHARVEST_GIT_COMMIT").unwrap_or("unknown");
    let branch = option_env!("RELHARVEST_GIT_BRANCH").unwrap_or("unknown");

    // Return a static string by leaking the formatted string
    // This is safe because it only happens once at startup
    let version = format!("v{}-{} ({})", BASE_VERSION, commit, branch);
    Box::leak(version.into_boxed_str())
}

#[derive(Parser)]
#[command(name = "relharvest")]
#[command(about = "Harvest CSV test results from GitHub release ZIP assets")]
#[command(version = get_version(), propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (use multiple times for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: fetch, download, extract, aggregate
    #[command(
        after_help = "Examples:\n  relharvest run https://github.com/octo/results/releases/tag/v1.4.0\n  relharvest run --keep-archives --strict https://github.com/octo/results/releases/tag/nightly/2024-05-01\n  relharvest run --delegate coleta_dados.py https://github.com/octo/results/releases/tag/v1.4.0"
    )]
    Run {
        /// GitHub release URL (e.g. 'https://github.com/owner/repo/releases/tag/v1.2.3')
        release_url: String,
        /// Directory the archives are extracted into
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Keep the downloaded ZIP files after extraction
        #[arg(long)]
        keep_archives: bool,
        /// Abort the run on the first extraction failure instead of skipping the archive
        #[arg(long)]
        strict: bool,
        /// Aggregate via an external processing script instead of the built-in merge
        #[arg(long)]
        delegate: Option<PathBuf>,
        /// Interpreter used to run the delegate script
        #[arg(long, default_value = crate::config::DEFAULT_INTERPRETER, requires = "delegate")]
        interpreter: String,
    },

    /// Merge per-OS CSV result files found under a directory
    Merge {
        /// Directory to search for result files
        dir: PathBuf,
        /// Destination for the merged CSV
        #[arg(long, default_value = crate::config::DEFAULT_MERGED_CSV)]
        output: PathBuf,
    },

    /// Show the current version
    Version,
}
