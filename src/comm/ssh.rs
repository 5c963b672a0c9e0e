use std::process::Command;

use super::{CommandOutput, Communicator, elevate, process};
use crate::config::SshTarget;
use crate::error::ProvisionError;

/// Exit status `ssh` uses for its own errors (connect, auth, host keys).
const SSH_TRANSPORT_FAILURE: i32 = 255;

/// Runs commands on a remote machine through the system `ssh` client.
#[derive(Debug, Clone)]
pub struct SshCommunicator {
    target: SshTarget,
}

impl SshCommunicator {
    pub fn new(target: SshTarget) -> Self {
        Self { target }
    }

    /// Build the argument list passed to `ssh` for one command.
    pub fn ssh_args(&self, command: &str, privileged: bool) -> Vec<String> {
        let t = &self.target;
        let mut args: Vec<String> = vec![
            "-o".into(),
            "BatchMode=yes".into(),
            "-o".into(),
            "StrictHostKeyChecking=no".into(),
            "-o".into(),
            "UserKnownHostsFile=/dev/null".into(),
            "-o".into(),
            "LogLevel=ERROR".into(),
            "-p".into(),
            t.port.to_string(),
        ];
        if let Some(identity) = &t.identity_file {
            args.extend(["-i".into(), identity.display().to_string()]);
        }
        args.push(format!("{}@{}", t.user, t.host));

        // ssh joins trailing arguments with spaces for the remote shell, so
        // the command travels as a single word.
        let remote = if privileged && t.sudo {
            elevate(command)
        } else {
            command.to_string()
        };
        args.push(remote);
        args
    }
}

/// Turn an ssh-level failure into an error so a dead connection is never
/// read as the remote command answering "no".
///
/// A remote command that itself exits 255 is indistinguishable and is
/// reported the same way.
fn check_transport(command: &str, output: CommandOutput) -> Result<CommandOutput, ProvisionError> {
    if output.exit_code == SSH_TRANSPORT_FAILURE {
        return Err(ProvisionError::ConnectionFailed {
            command: command.to_string(),
            stderr: output.stderr,
        });
    }
    Ok(output)
}

impl Communicator for SshCommunicator {
    fn execute(&self, command: &str, privileged: bool) -> Result<CommandOutput, ProvisionError> {
        let mut ssh = Command::new("ssh");
        ssh.args(self.ssh_args(command, privileged));
        check_transport(command, process::run(ssh, command)?)
    }
}
