// Docker orchestration: image pulls, daemon startup, idempotent container runs.

pub mod client;
pub mod commands;
pub mod types;

pub use client::{DockerClient, Machine};
pub use commands::DualCheck;
pub use types::{
    ContainerAction, ContainerRun, ContainerSpec, DEFAULT_CIDS_DIR, DEFAULT_PID_FILE,
    DaemonStatus, DockerSettings, ImagePull, derive_cidfile,
};
