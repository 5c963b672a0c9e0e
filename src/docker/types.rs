use std::path::{Path, PathBuf};

use serde::Serialize;
use sha1::{Digest, Sha1};

/// Directory holding derived id-files on the target.
pub const DEFAULT_CIDS_DIR: &str = "/var/lib/vagrant/cids";

/// PID file whose presence means the Docker daemon is up.
pub const DEFAULT_PID_FILE: &str = "/var/run/docker.pid";

/// Where the operator keeps state on the target machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerSettings {
    pub cids_dir: PathBuf,
    pub pid_file: PathBuf,
}

impl Default for DockerSettings {
    fn default() -> Self {
        Self {
            cids_dir: PathBuf::from(DEFAULT_CIDS_DIR),
            pid_file: PathBuf::from(DEFAULT_PID_FILE),
        }
    }
}

/// A container to run, keyed by `name` within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    /// Extra `docker run` flags, inserted verbatim.
    pub args: Option<String>,
    /// Command to run in the container, inserted verbatim.
    pub cmd: Option<String>,
    /// Id-file on the target; derived from `name` when unset.
    pub cidfile: Option<String>,
}

impl ContainerSpec {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            args: None,
            cmd: None,
            cidfile: None,
        }
    }

    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = Some(args.into());
        self
    }

    pub fn with_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.cmd = Some(cmd.into());
        self
    }

    pub fn with_cidfile(mut self, cidfile: impl Into<String>) -> Self {
        self.cidfile = Some(cidfile.into());
        self
    }
}

/// Stable id-file path for a container name: `<cids_dir>/<sha1(name)>`.
pub fn derive_cidfile(cids_dir: &Path, name: &str) -> String {
    let hex = format!("{:x}", Sha1::digest(name.as_bytes()));
    cids_dir.join(hex).display().to_string()
}

/// What `ensure_daemon_running` found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DaemonStatus {
    AlreadyRunning,
    Started,
    /// Not running and the guest cannot start it.
    Unavailable,
}

/// Outcome of one image in `pull_images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePull {
    pub image: String,
    pub pulled: bool,
}

/// Which branch `run_container` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerAction {
    Created,
    Started,
    AlreadyRunning,
}

/// Outcome of one entry in `run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerRun {
    pub name: String,
    pub cidfile: String,
    pub action: ContainerAction,
}
