//! Asset build commands run ahead of packaging

use crate::error::{PackError, Result};
use std::path::Path;
use std::process::Command;

/// Run each command through the platform shell in `root`, stopping at the first failure.
pub fn run_scripts(root: &Path, scripts: &[String]) -> Result<()> {
    for script in scripts {
        log::info!("running `{}`", script);

        let status = shell(script)
            .current_dir(root)
            .status()
            .map_err(|e| PackError::io(root, e))?;

        if !status.success() {
            return Err(PackError::UpstreamBuildFailure {
                command: script.clone(),
                status,
            });
        }
    }

    Ok(())
}

fn shell(script: &str) -> Command {
    if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.args(["/C", script]);
        command
    } else {
        let mut command = Command::new("sh");
        command.args(["-c", script]);
        command
    }
}
