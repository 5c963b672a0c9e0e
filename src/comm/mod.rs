// Machine communication: how commands reach the target host.

mod dry_run;
mod local;
mod process;
mod ssh;

pub use dry_run::DryRun;
pub use local::LocalShell;
pub use ssh::SshCommunicator;

use crate::error::ProvisionError;

/// A channel for running shell commands on the target machine.
///
/// Implementations only need [`execute`](Communicator::execute); the
/// error-checked and yes/no forms are derived from it.
pub trait Communicator {
    /// Run `command` through a POSIX shell on the target.
    ///
    /// `privileged` asks for root privileges on the target. A non-zero
    /// exit is not an error here; only failure to run at all is.
    fn execute(&self, command: &str, privileged: bool) -> Result<CommandOutput, ProvisionError>;

    /// Run `command` with root privileges, failing on a non-zero exit.
    fn sudo(&self, command: &str) -> Result<(), ProvisionError> {
        let output = self.execute(command, true)?;
        if output.success() {
            return Ok(());
        }
        Err(ProvisionError::CommandFailed {
            command: command.to_string(),
            exit_code: output.exit_code,
            stderr: output.stderr,
        })
    }

    /// Whether `command` exits zero.
    ///
    /// A transport failure is an error, never a `false`: callers branch on
    /// the answer and must not act on a check that never ran.
    fn test(&self, command: &str, privileged: bool) -> Result<bool, ProvisionError> {
        Ok(self.execute(command, privileged)?.success())
    }
}

/// Result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    /// Trimmed standard error, kept for error reporting.
    pub stderr: String,
}

impl CommandOutput {
    pub fn from_code(exit_code: i32) -> Self {
        Self {
            exit_code,
            stderr: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Wrap `command` so the whole pipeline (including `$(...)` substitutions)
/// runs as root.
pub fn elevate(command: &str) -> String {
    format!("sudo sh -c {}", shell_words::quote(command))
}
