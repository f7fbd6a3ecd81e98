use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::process::Command;

/// Verify the external-aggregation environment before the pipeline touches
/// the network or the filesystem: the processing script must exist and the
/// interpreter must actually run.
pub fn check_preconditions(interpreter: &str, script: &Path) -> Result<()> {
    if !script.is_file() {
        return Err(anyhow!(
            "Processing script {} does not exist",
            script.display()
        ));
    }

    match Command::new(interpreter).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => Err(anyhow!(
            "Interpreter '{}' is not usable: {}",
            interpreter,
            String::from_utf8_lossy(&output.stderr).trim()
        )),
        Err(e) => Err(anyhow!("Interpreter '{}' not found: {}", interpreter, e)),
    }
}

/// Invoke `<interpreter> <script> <output_dir>` with inherited stdio and wait
/// for it to finish. The script's contract is to write its combined CSV
/// inside the output directory; everything else about it is its own business.
pub fn run_delegate(interpreter: &str, script: &Path, output_dir: &Path) -> Result<()> {
    tracing::info!(
        "Handing {} over to '{} {}'",
        output_dir.display(),
        interpreter,
        script.display()
    );

    let status = Command::new(interpreter)
        .arg(script)
        .arg(output_dir)
        .status()
        .with_context(|| format!("Could not launch interpreter '{}'", interpreter))?;

    if !status.success() {
        return Err(anyhow!(
            "Processing script {} exited with {}",
            script.display(),
            status
        ));
    }

    Ok(())
}
