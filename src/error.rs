use crate::guest::Capability;

/// Errors surfaced while provisioning a machine.
///
/// The operator passes these through untouched; it never retries or
/// rewraps a failure coming back from the transport.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// A container reached `run_container` without an id-file path.
    #[error("container `{name}` has no cidfile configured")]
    MissingCidfile { name: String },

    /// A command that must succeed exited non-zero.
    #[error("command `{command}` failed with exit code {exit_code}{}", stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// The transport could not reach the machine, so the command's outcome
    /// is unknown.
    #[error("could not reach the machine to run `{command}`{}", stderr_suffix(.stderr))]
    ConnectionFailed { command: String, stderr: String },

    /// The command was killed by a signal before exiting.
    #[error("command `{command}` was terminated by a signal")]
    Terminated { command: String },

    /// The transport program itself could not be started.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// A capability was invoked on a guest that does not provide it.
    #[error("guest does not support capability `{capability}`")]
    UnsupportedCapability { capability: Capability },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
