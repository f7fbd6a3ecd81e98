use crate::config::{ExtractionPolicy, HarvestConfig};
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// ZIP files present in `dir` at the time of the call, sorted by name so a
/// run iterates the same way on every filesystem.
pub fn list_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("Could not list {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("zip") {
            archives.push(path);
        }
    }

    archives.sort();
    Ok(archives)
}

fn extract_zip(archive_path: &Path, extract_dir: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        // Security check for path traversal
        let outpath = match entry.enclosed_name() {
            Some(path) => extract_dir.join(path),
            None => {
                tracing::warn!("Skipping malicious path in zip: {}", entry.name());
                continue;
            }
        };

        if entry.name().ends_with('/') {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = fs::File::create(&outpath)?;
            io::copy(&mut entry, &mut outfile)?;
        }
    }

    Ok(())
}

/// Extract every ZIP archive found in `work_dir` into
/// `<output_dir>/<archive-basename>/`.
///
/// Under the tolerant policy a failed archive is logged and skipped; under
/// the strict policy it aborts the run. Each archive is deleted after its
/// extraction attempt unless `keep_archives` is set, except that a strict
/// abort leaves the failing archive in place.
pub fn extract_all(config: &HarvestConfig, work_dir: &Path) -> Result<Vec<PathBuf>> {
    let archives = list_archives(work_dir)?;
    if archives.is_empty() {
        tracing::warn!("No ZIP archives found in {}", work_dir.display());
        return Ok(Vec::new());
    }

    fs::create_dir_all(&config.output_dir)?;

    let mut extracted = Vec::new();
    for archive in &archives {
        let stem = archive
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("archive");
        let destination = config.output_dir.join(stem);

        tracing::info!(
            "Extracting {} into {}",
            archive.display(),
            destination.display()
        );
        fs::create_dir_all(&destination)?;

        match extract_zip(archive, &destination) {
            Ok(()) => extracted.push(destination),
            Err(e) => match config.extraction {
                ExtractionPolicy::Strict => {
                    return Err(e)
                        .with_context(|| format!("Failed to extract {}", archive.display()));
                }
                ExtractionPolicy::Tolerant => {
                    tracing::warn!(
                        "Failed to extract {}: {}. Continuing with remaining archives.",
                        archive.display(),
                        e
                    );
                }
            },
        }

        if !config.keep_archives {
            fs::remove_file(archive)
                .with_context(|| format!("Could not remove {}", archive.display()))?;
        }
    }

    tracing::info!(
        "Extracted {} of {} archive(s) into {}",
        extracted.len(),
        archives.len(),
        config.output_dir.display()
    );
    Ok(extracted)
}
