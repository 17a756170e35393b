//! Copy generated scripts to the system clipboard.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{ScaffoldError, ScaffoldResult};

/// Clipboard program and arguments for the current platform.
pub fn clipboard_command() -> (&'static str, &'static [&'static str]) {
    const PBCOPY_ARGS: &[&str] = &[];
    const XCLIP_ARGS: &[&str] = &["-selection", "clipboard"];

    if cfg!(target_os = "macos") {
        ("pbcopy", PBCOPY_ARGS)
    } else {
        ("xclip", XCLIP_ARGS)
    }
}

/// Pipe `text` into the platform clipboard program.
pub fn copy(text: &str) -> ScaffoldResult<()> {
    let (program, args) = clipboard_command();
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| ScaffoldError::Clipboard(format!("failed to start {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(ScaffoldError::Clipboard(format!("{} exited with {}", program, status)));
    }
    Ok(())
}
