//! Sequential composition of the pipeline stages.

use crate::config::{Aggregator, HarvestConfig, DELEGATE_RESULT_CSV};
use crate::delegate;
use crate::download::download_assets;
use crate::extract::extract_all;
use crate::merge::merge_results;
use crate::release::{self, ReleaseRef};
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Run the whole pipeline for one release and return the path of the final
/// CSV. Stages run strictly one after another; the first unrecoverable error
/// aborts the run.
pub async fn run(config: &HarvestConfig, reference: &ReleaseRef) -> Result<PathBuf> {
    // Environment problems must surface before any network or disk work
    if let Aggregator::Delegate {
        script,
        interpreter,
    } = &config.aggregator
    {
        delegate::check_preconditions(interpreter, script)?;
    }

    let release = release::fetch_release(reference).await?;
    let urls = release::zip_download_urls(&release);
    if urls.is_empty() {
        bail!("Release {} has no ZIP assets to download", reference);
    }
    tracing::info!(
        "Release {} carries {} ZIP asset(s)",
        release.tag_name,
        urls.len()
    );

    let work_dir = Path::new(".");
    download_assets(&urls, work_dir).await?;
    extract_all(config, work_dir)?;

    match &config.aggregator {
        Aggregator::Inline => {
            let summary = merge_results(&config.output_dir, &config.merged_csv)?;
            tracing::info!(
                "Merged {} result file(s), {} data row(s)",
                summary.files,
                summary.data_rows
            );
            Ok(config.merged_csv.clone())
        }
        Aggregator::Delegate {
            script,
            interpreter,
        } => {
            delegate::run_delegate(interpreter, script, &config.output_dir)?;
            Ok(config.output_dir.join(DELEGATE_RESULT_CSV))
        }
    }
}
