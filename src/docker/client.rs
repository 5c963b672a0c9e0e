use std::path::Path;

use tracing::{debug, error, info};

use super::commands::{self, DualCheck};
use super::types::{
    ContainerAction, ContainerRun, ContainerSpec, DaemonStatus, DockerSettings, ImagePull,
    derive_cidfile,
};
use crate::comm::Communicator;
use crate::error::ProvisionError;
use crate::guest::{Capability, GuestCapabilities};
use crate::ui::{Notice, Ui};

/// Handle on the machine being provisioned.
#[derive(Clone, Copy)]
pub struct Machine<'a> {
    pub comm: &'a dyn Communicator,
    pub guest: &'a dyn GuestCapabilities,
    pub ui: &'a dyn Ui,
}

/// Drives Docker on a machine through idempotent shell commands.
///
/// Nothing about remote state is cached: every decision re-queries the
/// machine, so containers changed behind our back are handled correctly.
pub struct DockerClient<'a> {
    machine: Machine<'a>,
    settings: DockerSettings,
}

impl<'a> DockerClient<'a> {
    pub fn new(machine: Machine<'a>, settings: DockerSettings) -> Self {
        Self { machine, settings }
    }

    /// Pull each image that is not already present, in order.
    ///
    /// The first failed pull aborts the rest.
    pub fn pull_images<S: AsRef<str>>(&self, images: &[S]) -> Result<Vec<ImagePull>, ProvisionError> {
        let comm = self.machine.comm;
        let mut pulls = Vec::with_capacity(images.len());

        for image in images {
            let image = image.as_ref();
            let pulled = if comm.test(&commands::image_present(image), true)? {
                debug!(%image, "image already present");
                false
            } else {
                self.machine.ui.notify(Notice::PullingImage {
                    image: image.to_string(),
                });
                comm.sudo(&commands::pull(image))?;
                true
            };
            pulls.push(ImagePull {
                image: image.to_string(),
                pulled,
            });
        }

        Ok(pulls)
    }

    /// Start the daemon through the guest if it is not running.
    ///
    /// A guest without the start capability is left alone; later Docker
    /// commands will fail on their own if the daemon really is down.
    pub fn ensure_daemon_running(&self) -> Result<DaemonStatus, ProvisionError> {
        if self.daemon_running()? {
            return Ok(DaemonStatus::AlreadyRunning);
        }

        let guest = self.machine.guest;
        if !guest.supports(Capability::DockerStartService) {
            info!("docker daemon not running and guest cannot start it");
            return Ok(DaemonStatus::Unavailable);
        }

        guest.invoke(Capability::DockerStartService, self.machine.comm)?;
        Ok(DaemonStatus::Started)
    }

    pub fn daemon_running(&self) -> Result<bool, ProvisionError> {
        self.machine
            .comm
            .test(&commands::daemon_running(&self.settings.pid_file), false)
    }

    /// Run every container in declaration order, deriving id-files for
    /// entries that have none.
    ///
    /// An entry whose id-file is set but blank is rejected with
    /// [`ProvisionError::MissingCidfile`] before any command is issued for it.
    /// Stops at the first failing container.
    pub fn run(&self, containers: &[ContainerSpec]) -> Result<Vec<ContainerRun>, ProvisionError> {
        let mut runs = Vec::with_capacity(containers.len());

        for spec in containers {
            let mut spec = spec.clone();
            let cidfile = spec
                .cidfile
                .get_or_insert_with(|| derive_cidfile(&self.settings.cids_dir, &spec.name))
                .clone();

            self.machine.ui.notify(Notice::RunningContainer {
                name: spec.name.clone(),
            });

            let result = cidfile_of(&spec)
                .and_then(|cidfile| self.prepare_cid_dir(cidfile))
                .and_then(|()| self.run_container(&spec));
            let action = match result {
                Ok(action) => action,
                Err(e) => {
                    error!(container = %spec.name, error = %e, "container provisioning failed");
                    return Err(e);
                }
            };

            runs.push(ContainerRun {
                name: spec.name,
                cidfile,
                action,
            });
        }

        Ok(runs)
    }

    fn prepare_cid_dir(&self, cidfile: &str) -> Result<(), ProvisionError> {
        match Path::new(cidfile).parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                self.machine.comm.sudo(&commands::make_dir(dir))
            }
            _ => Ok(()),
        }
    }

    /// Start the container recorded in the spec's id-file, or create it.
    ///
    /// An absent or blank id-file is a configuration error and issues no
    /// commands.
    pub fn run_container(&self, spec: &ContainerSpec) -> Result<ContainerAction, ProvisionError> {
        let cidfile = cidfile_of(spec)?;

        if self.container_exists(cidfile)? {
            self.start_container(spec, cidfile)
        } else {
            self.create_container(spec, cidfile)
        }
    }

    pub fn container_exists(&self, cidfile: &str) -> Result<bool, ProvisionError> {
        self.check(&commands::exists(cidfile))
    }

    pub fn container_running(&self, cidfile: &str) -> Result<bool, ProvisionError> {
        self.check(&commands::running(cidfile))
    }

    fn check(&self, check: &DualCheck) -> Result<bool, ProvisionError> {
        check.holds(self.machine.comm)
    }

    fn start_container(
        &self,
        spec: &ContainerSpec,
        cidfile: &str,
    ) -> Result<ContainerAction, ProvisionError> {
        if self.container_running(cidfile)? {
            debug!(container = %spec.name, "already running");
            return Ok(ContainerAction::AlreadyRunning);
        }

        info!(container = %spec.name, "starting existing container");
        self.machine.comm.sudo(&commands::start(cidfile))?;
        Ok(ContainerAction::Started)
    }

    fn create_container(
        &self,
        spec: &ContainerSpec,
        cidfile: &str,
    ) -> Result<ContainerAction, ProvisionError> {
        info!(container = %spec.name, image = %spec.image, "creating container");
        let command = commands::create(
            cidfile,
            &spec.image,
            spec.args.as_deref(),
            spec.cmd.as_deref(),
        );
        self.machine.comm.sudo(&command)?;
        Ok(ContainerAction::Created)
    }
}

fn cidfile_of(spec: &ContainerSpec) -> Result<&str, ProvisionError> {
    spec.cidfile
        .as_deref()
        .filter(|cidfile| !cidfile.trim().is_empty())
        .ok_or_else(|| ProvisionError::MissingCidfile {
            name: spec.name.clone(),
        })
}
