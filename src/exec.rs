//! Run rendered scripts through the shell.

use std::process::Command;
use tracing::info;

use crate::error::{ScaffoldError, ScaffoldResult};

/// Run each script with `sh -c`, in order, stopping at the first failure.
pub fn run_scripts<S: AsRef<str>>(scripts: &[S]) -> ScaffoldResult<()> {
    for script in scripts {
        let command = script.as_ref().trim();
        if command.is_empty() {
            continue;
        }
        info!(command, "executing script");
        let status = Command::new("sh").arg("-c").arg(command).status()?;
        if !status.success() {
            return Err(ScaffoldError::Execution(format!(
                "'{}' exited with {}",
                command, status
            )));
        }
    }
    Ok(())
}
