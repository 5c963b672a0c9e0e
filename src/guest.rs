//! Guest-specific operations, looked up by capability name.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::comm::Communicator;
use crate::error::ProvisionError;

/// A named guest operation that only some guest types implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Start the Docker daemon through the guest's service manager.
    DockerStartService,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::DockerStartService => "docker_start_service",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers "does this guest support X" and performs X.
pub trait GuestCapabilities {
    fn supports(&self, capability: Capability) -> bool;

    /// Run `capability` on the guest. Fails with
    /// [`ProvisionError::UnsupportedCapability`] when not supported.
    fn invoke(&self, capability: Capability, comm: &dyn Communicator) -> Result<(), ProvisionError>;
}

/// Guest operating systems with built-in capability implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestOs {
    Debian,
    Ubuntu,
    Fedora,
    Redhat,
    Centos,
    Arch,
    #[default]
    Other,
}

impl GuestOs {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuestOs::Debian => "debian",
            GuestOs::Ubuntu => "ubuntu",
            GuestOs::Fedora => "fedora",
            GuestOs::Redhat => "redhat",
            GuestOs::Centos => "centos",
            GuestOs::Arch => "arch",
            GuestOs::Other => "other",
        }
    }

    fn start_service_command(&self) -> Option<&'static str> {
        match self {
            GuestOs::Debian | GuestOs::Ubuntu => Some("service docker start"),
            GuestOs::Fedora | GuestOs::Redhat | GuestOs::Centos | GuestOs::Arch => {
                Some("systemctl start docker")
            }
            GuestOs::Other => None,
        }
    }
}

impl GuestCapabilities for GuestOs {
    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::DockerStartService => self.start_service_command().is_some(),
        }
    }

    fn invoke(&self, capability: Capability, comm: &dyn Communicator) -> Result<(), ProvisionError> {
        let command = match capability {
            Capability::DockerStartService => self.start_service_command(),
        }
        .ok_or(ProvisionError::UnsupportedCapability { capability })?;

        info!(guest = self.as_str(), %capability, "invoking guest capability");
        comm.sudo(command)
    }
}
