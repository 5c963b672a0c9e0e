use std::process::{Command, Stdio};

use tracing::debug;

use super::CommandOutput;
use crate::error::ProvisionError;

/// Run a prepared process to completion, logging its output.
///
/// `shown` is the command as the operator issued it, used for logs and
/// errors instead of the transport-level argv.
pub(super) fn run(mut process: Command, shown: &str) -> Result<CommandOutput, ProvisionError> {
    let program = process.get_program().to_string_lossy().to_string();
    debug!(command = shown, %program, "executing");

    let output = process
        .stdin(Stdio::null())
        .output()
        .map_err(|source| ProvisionError::Spawn { program, source })?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        debug!(target: "dockprov::remote", "{line}");
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    for line in stderr.lines() {
        debug!(target: "dockprov::remote", stderr = true, "{line}");
    }

    let Some(exit_code) = output.status.code() else {
        return Err(ProvisionError::Terminated {
            command: shown.to_string(),
        });
    };
    debug!(command = shown, exit_code, "finished");

    Ok(CommandOutput { exit_code, stderr })
}
