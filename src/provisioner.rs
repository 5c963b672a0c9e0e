//! Full provisioning pass: daemon, images, then containers.

use serde::Serialize;
use tracing::info;

use crate::docker::{ContainerRun, ContainerSpec, DaemonStatus, DockerClient, ImagePull};
use crate::error::ProvisionError;

/// What a provisioning pass found and did. Serialized for `--report`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProvisionReport {
    pub daemon: Option<DaemonStatus>,
    pub images: Vec<ImagePull>,
    pub containers: Vec<ContainerRun>,
}

impl ProvisionReport {
    pub fn pulled(&self) -> usize {
        self.images.iter().filter(|p| p.pulled).count()
    }
}

pub struct Provisioner<'a> {
    client: DockerClient<'a>,
    images: Vec<String>,
    containers: Vec<ContainerSpec>,
}

impl<'a> Provisioner<'a> {
    pub fn new(client: DockerClient<'a>, images: Vec<String>, containers: Vec<ContainerSpec>) -> Self {
        Self {
            client,
            images,
            containers,
        }
    }

    /// Make sure the daemon runs, pull images, then run containers.
    ///
    /// Stops at the first step that fails.
    pub fn provision(&self) -> Result<ProvisionReport, ProvisionError> {
        let daemon = self.client.ensure_daemon_running()?;
        let images = self.client.pull_images(self.images.as_slice())?;
        let containers = self.client.run(&self.containers)?;

        let report = ProvisionReport {
            daemon: Some(daemon),
            images,
            containers,
        };
        info!(
            daemon = ?daemon,
            pulled = report.pulled(),
            containers = report.containers.len(),
            "provisioning complete"
        );
        Ok(report)
    }
}
