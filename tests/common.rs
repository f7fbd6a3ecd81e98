use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

// Test helper types shared by the integration suites. Every command runs
// with a fresh temp directory as its working directory, since the pipeline
// downloads archives into and merges relative to the cwd.
#[allow(dead_code)]
pub struct TestContext {
    pub work_dir: TempDir,
    pub bin_path: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().expect("Failed to create temp dir"),
            bin_path: PathBuf::from(env!("CARGO_BIN_EXE_relharvest")),
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(&self.bin_path);
        cmd.current_dir(self.work_dir.path());
        cmd.env_remove("RELHARVEST_OUTPUT_DIR");
        cmd.env_remove("RELHARVEST_KEEP_ARCHIVES");
        cmd
    }
}

#[allow(dead_code)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }
}

#[allow(dead_code)]
impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        if !self.status.success() {
            panic!(
                "Command failed with status {:?}\nstdout: {}\nstderr: {}",
                self.status.code(),
                self.stdout,
                self.stderr
            );
        }
        self
    }

    pub fn assert_failure(&self) -> &Self {
        if self.status.success() {
            panic!(
                "Command unexpectedly succeeded\nstdout: {}\nstderr: {}",
                self.stdout, self.stderr
            );
        }
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Stdout did not contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Stderr did not contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}
