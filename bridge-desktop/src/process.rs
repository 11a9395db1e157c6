//! External tool invocation

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use bridge_traits::error::{BridgeError, Result};
use tracing::debug;

/// Longest stderr excerpt carried in an error message.
const STDERR_EXCERPT: usize = 512;

/// Run `program` with `args` and return its output if it exits successfully.
///
/// `step` names the operation in error messages. Arguments are never
/// logged, since they may carry tag values.
pub(crate) fn run_tool(program: &Path, args: &[OsString], step: &str) -> Result<Output> {
    debug!(program = %program.display(), step, "Running external tool");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => BridgeError::NotAvailable(format!(
                "{} not found (needed to {})",
                program.display(),
                step
            )),
            _ => BridgeError::Io(e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let excerpt: String = stderr.trim().chars().take(STDERR_EXCERPT).collect();
        return Err(BridgeError::OperationFailed(format!(
            "{} failed to {} ({}): {}",
            program.display(),
            step,
            output.status,
            excerpt
        )));
    }

    Ok(output)
}
