use anyhow::{anyhow, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Local filename for an asset URL: the final path segment.
pub fn filename_from_url(url: &str) -> Result<String> {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let name = without_scheme
        .trim_end_matches('/')
        .split_once('/')
        .map(|(_, path)| path.rsplit('/').next().unwrap_or_default())
        .unwrap_or_default();

    if name.is_empty() {
        return Err(anyhow!("Cannot derive a filename from URL '{}'", url));
    }

    Ok(name.to_string())
}

/// Stream one file to disk, overwriting any existing file at `local_path`.
/// Redirects are followed by the client.
pub async fn download_file(client: &reqwest::Client, url: &str, local_path: &Path) -> Result<()> {
    let filename = local_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| url.to_string());

    tracing::info!("Downloading {}...", filename);

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(anyhow!(
            "Download of '{}' failed: {}",
            filename,
            response.status()
        ));
    }

    let total_size = response.content_length().unwrap_or(0);
    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap()
            .progress_chars("#>-")
    );
    pb.set_message(format!("Downloading {}", filename));

    let mut file = fs::File::create(local_path)?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    pb.finish_with_message(format!("Downloaded {}", filename));
    Ok(())
}

/// Download every asset URL into `work_dir`, sequentially and in order.
/// The first transport error aborts the whole run.
pub async fn download_assets(urls: &[String], work_dir: &Path) -> Result<Vec<PathBuf>> {
    let client = reqwest::Client::new();
    let mut downloaded = Vec::with_capacity(urls.len());

    for url in urls {
        let filename = filename_from_url(url)?;
        let local_path = work_dir.join(filename);
        download_file(&client, url, &local_path).await?;
        downloaded.push(local_path);
    }

    tracing::info!("Downloaded {} archive(s)", downloaded.len());
    Ok(downloaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://example.com/releases/download/v1/results.zip").unwrap(),
            "results.zip"
        );
        assert_eq!(
            filename_from_url("https://example.com/a.zip/").unwrap(),
            "a.zip"
        );
    }

    #[test]
    fn test_filename_from_url_rejects_bare_host() {
        assert!(filename_from_url("https://example.com/").is_err());
        assert!(filename_from_url("https://").is_err());
    }
}
