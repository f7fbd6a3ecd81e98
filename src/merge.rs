use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use walkdir::WalkDir;

/// Result filenames the per-OS CI jobs produce. No other name matches.
pub const RESULT_FILES: [&str; 3] = [
    "macos-latest.csv",
    "ubuntu-latest.csv",
    "windows-latest.csv",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeSummary {
    pub files: usize,
    pub data_rows: usize,
}

/// Concatenate every result file found under `root` into `destination`:
/// the first match is copied whole, every later match contributes its lines
/// from the second onward. Headers are not validated against each other, so
/// files with diverging columns merge silently.
///
/// `destination` is truncated up front; zero matches leaves it empty.
pub fn merge_results(root: &Path, destination: &Path) -> Result<MergeSummary> {
    if !root.is_dir() {
        return Err(anyhow!("{} is not a directory", root.display()));
    }

    let file = fs::File::create(destination)
        .with_context(|| format!("Could not create {}", destination.display()))?;
    let mut writer = BufWriter::new(file);
    let mut summary = MergeSummary::default();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if !RESULT_FILES.contains(&name) {
            continue;
        }

        tracing::info!("Merging {}", path.display());
        let reader = BufReader::new(
            fs::File::open(path).with_context(|| format!("Could not read {}", path.display()))?,
        );
        let mut lines = reader.lines();

        // The first match contributes the shared header; every later match
        // has its own header line dropped.
        let header = lines.next().transpose()?;
        if summary.files == 0 {
            if let Some(header) = header {
                writeln!(writer, "{}", header)?;
            }
        }

        for line in lines {
            writeln!(writer, "{}", line?)?;
            summary.data_rows += 1;
        }
        summary.files += 1;
    }

    if summary.files == 0 {
        tracing::warn!(
            "No result files named {} found under {}",
            RESULT_FILES.join(", "),
            root.display()
        );
    }

    writer.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(path: PathBuf, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_merge_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("outputs");
        write_file(
            root.join("run-a").join("ubuntu-latest.csv"),
            "os,test,result\nubuntu,t1,pass\n",
        );
        write_file(
            root.join("run-b").join("windows-latest.csv"),
            "os,test,result\nwindows,t1,fail\n",
        );

        let destination = dir.path().join("final.csv");
        let summary = merge_results(&root, &destination).unwrap();

        assert_eq!(summary, MergeSummary { files: 2, data_rows: 2 });
        assert_eq!(
            fs::read_to_string(&destination).unwrap(),
            "os,test,result\nubuntu,t1,pass\nwindows,t1,fail\n"
        );
    }

    #[test]
    fn test_merge_ignores_other_filenames() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("outputs");
        write_file(root.join("run").join("ubuntu-latest.csv"), "h\nrow\n");
        write_file(root.join("run").join("results.csv"), "h\nignored\n");
        write_file(root.join("run").join("macos.csv"), "h\nignored\n");

        let destination = dir.path().join("final.csv");
        let summary = merge_results(&root, &destination).unwrap();

        assert_eq!(summary, MergeSummary { files: 1, data_rows: 1 });
        assert_eq!(fs::read_to_string(&destination).unwrap(), "h\nrow\n");
    }

    #[test]
    fn test_merge_finds_files_at_any_depth() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("outputs");
        write_file(
            root.join("a").join("deeply").join("nested").join("macos-latest.csv"),
            "h\nmac-row\n",
        );
        write_file(root.join("b").join("ubuntu-latest.csv"), "h\nubuntu-row\n");

        let destination = dir.path().join("final.csv");
        let summary = merge_results(&root, &destination).unwrap();

        assert_eq!(summary.files, 2);
        assert_eq!(
            fs::read_to_string(&destination).unwrap(),
            "h\nmac-row\nubuntu-row\n"
        );
    }

    #[test]
    fn test_merge_header_comes_only_from_first_match() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("outputs");
        // First match in traversal order is empty; it still consumes the
        // header slot, so the second file's header is dropped as usual.
        write_file(root.join("a").join("ubuntu-latest.csv"), "");
        write_file(root.join("b").join("windows-latest.csv"), "h\nrow\n");

        let destination = dir.path().join("final.csv");
        let summary = merge_results(&root, &destination).unwrap();

        assert_eq!(summary, MergeSummary { files: 2, data_rows: 1 });
        assert_eq!(fs::read_to_string(&destination).unwrap(), "row\n");
    }

    #[test]
    fn test_merge_truncates_previous_destination() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("outputs");
        write_file(root.join("run").join("ubuntu-latest.csv"), "h\nrow\n");

        let destination = dir.path().join("final.csv");
        fs::write(&destination, "stale contents from an earlier run\n").unwrap();

        merge_results(&root, &destination).unwrap();
        assert_eq!(fs::read_to_string(&destination).unwrap(), "h\nrow\n");
    }

    #[test]
    fn test_merge_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = merge_results(&dir.path().join("nope"), &dir.path().join("final.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_without_matches_leaves_empty_destination() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("outputs");
        fs::create_dir_all(&root).unwrap();

        let destination = dir.path().join("final.csv");
        let summary = merge_results(&root, &destination).unwrap();

        assert_eq!(summary, MergeSummary::default());
        assert_eq!(fs::read_to_string(&destination).unwrap(), "");
    }
}
