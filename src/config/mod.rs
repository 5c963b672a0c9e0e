mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, load, load_file};
pub use types::{Config, ContainerConfig, SshTarget, Target};
