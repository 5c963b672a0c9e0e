use std::process::Command;

use super::{CommandOutput, Communicator, elevate, process};
use crate::error::ProvisionError;

/// Runs commands on this host through `sh -c`.
#[derive(Debug, Clone)]
pub struct LocalShell {
    use_sudo: bool,
}

impl LocalShell {
    /// Privileged commands go through `sudo` unless we already run as root.
    pub fn new() -> Self {
        Self {
            use_sudo: !running_as_root(),
        }
    }

    pub fn with_sudo(use_sudo: bool) -> Self {
        Self { use_sudo }
    }

    /// The shell script actually handed to `sh -c`.
    pub fn script(&self, command: &str, privileged: bool) -> String {
        if privileged && self.use_sudo {
            elevate(command)
        } else {
            command.to_string()
        }
    }
}

impl Default for LocalShell {
    fn default() -> Self {
        Self::new()
    }
}

impl Communicator for LocalShell {
    fn execute(&self, command: &str, privileged: bool) -> Result<CommandOutput, ProvisionError> {
        let mut sh = Command::new("sh");
        sh.arg("-c").arg(self.script(command, privileged));
        process::run(sh, command)
    }
}

fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a POSIX getter that always succeeds and has no side effects.
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unprivileged_script_is_untouched() {
        let shell = LocalShell::with_sudo(true);
        assert_eq!(shell.script("test -f /x", false), "test -f /x");
    }

    #[test]
    fn privileged_script_is_elevated_when_sudo_enabled() {
        let shell = LocalShell::with_sudo(true);
        assert_eq!(shell.script("mkdir -p /x", true), "sudo sh -c 'mkdir -p /x'");
    }

    #[test]
    fn privileged_script_runs_directly_as_root() {
        let shell = LocalShell::with_sudo(false);
        assert_eq!(shell.script("mkdir -p /x", true), "mkdir -p /x");
    }

    #[cfg(unix)]
    #[test]
    fn execute_reports_exit_codes() {
        let shell = LocalShell::with_sudo(false);
        assert!(shell.test("true", false).unwrap());
        assert!(!shell.test("exit 3", false).unwrap());
        let output = shell.execute("echo oops >&2; exit 3", false).unwrap();
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stderr, "oops");
    }

    #[cfg(unix)]
    #[test]
    fn sudo_surfaces_non_zero_exit() {
        let shell = LocalShell::with_sudo(false);
        let err = shell.sudo("exit 7").unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::CommandFailed { exit_code: 7, .. }
        ));
    }
}
