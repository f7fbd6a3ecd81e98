use std::path::PathBuf;

pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const DEFAULT_MERGED_CSV: &str = "final.csv";
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Name of the file the delegate script must produce inside the output
/// directory.
pub const DELEGATE_RESULT_CSV: &str = "final_all.csv";

/// What to do when a single archive fails to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPolicy {
    /// Log the failure and continue with the remaining archives.
    Tolerant,
    /// Abort the run on the first failure.
    Strict,
}

#[derive(Debug, Clone)]
pub enum Aggregator {
    /// Merge the well-known per-OS CSV files directly.
    Inline,
    /// Hand the output directory to an external processing script.
    Delegate {
        script: PathBuf,
        interpreter: String,
    },
}

/// Immutable per-run configuration, built once in `main` and passed by
/// reference into each pipeline stage.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub output_dir: PathBuf,
    pub merged_csv: PathBuf,
    pub keep_archives: bool,
    pub extraction: ExtractionPolicy,
    pub aggregator: Aggregator,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            merged_csv: PathBuf::from(DEFAULT_MERGED_CSV),
            keep_archives: false,
            extraction: ExtractionPolicy::Tolerant,
            aggregator: Aggregator::Inline,
        }
    }
}

impl HarvestConfig {
    /// Defaults with environment overrides applied. CLI flags are layered on
    /// top by the caller.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("RELHARVEST_OUTPUT_DIR") {
            if !dir.is_empty() {
                config.output_dir = PathBuf::from(dir);
            }
        }

        if let Ok(keep) = std::env::var("RELHARVEST_KEEP_ARCHIVES") {
            config.keep_archives = keep.to_lowercase() == "true" || keep == "1";
        }

        config
    }
}
