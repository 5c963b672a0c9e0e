use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::docker::{ContainerSpec, DEFAULT_CIDS_DIR, DEFAULT_PID_FILE, DockerSettings};
use crate::guest::GuestOs;

/// How to reach the machine being provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "lowercase")]
pub enum Target {
    #[default]
    Local,
    Ssh(SshTarget),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshTarget {
    pub host: String,
    pub user: String,
    pub port: u16,
    pub identity_file: Option<PathBuf>,
    /// Elevate privileged commands with `sudo`. Off for root logins.
    pub sudo: bool,
}

impl Default for SshTarget {
    fn default() -> Self {
        Self {
            host: String::new(),
            user: "vagrant".to_string(),
            port: 22,
            identity_file: None,
            sudo: true,
        }
    }
}

/// One entry under `run:`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Defaults to the entry's name.
    pub image: Option<String>,
    pub args: Option<String>,
    pub cmd: Option<String>,
    pub cidfile: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub guest: GuestOs,
    pub target: Target,
    pub cids_dir: PathBuf,
    pub pid_file: PathBuf,
    pub images: Vec<String>,
    /// Containers keyed by name, in file order.
    pub run: IndexMap<String, ContainerConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            guest: GuestOs::default(),
            target: Target::default(),
            cids_dir: PathBuf::from(DEFAULT_CIDS_DIR),
            pid_file: PathBuf::from(DEFAULT_PID_FILE),
            images: Vec::new(),
            run: IndexMap::new(),
        }
    }
}

impl Config {
    pub fn docker_settings(&self) -> DockerSettings {
        DockerSettings {
            cids_dir: self.cids_dir.clone(),
            pid_file: self.pid_file.clone(),
        }
    }

    /// Container specs in declaration order.
    pub fn containers(&self) -> Vec<ContainerSpec> {
        self.run
            .iter()
            .map(|(name, c)| ContainerSpec {
                name: name.clone(),
                image: c.image.clone().unwrap_or_else(|| name.clone()),
                args: c.args.clone(),
                cmd: c.cmd.clone(),
                cidfile: c.cidfile.clone(),
            })
            .collect()
    }
}
