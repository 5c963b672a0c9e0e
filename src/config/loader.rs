use std::path::Path;

use anyhow::{Context, Result, bail};

use super::types::{Config, Target};

/// File looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = ".dockprov.yml";

/// Load `.dockprov.yml` from `dir`, or `None` if there is no such file.
pub fn load(dir: &Path) -> Result<Option<Config>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    load_file(&path).map(Some)
}

/// Load and validate a config file.
pub fn load_file(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    validate(&config).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if let Some(blank) = config.images.iter().find(|i| i.trim().is_empty()) {
        bail!("image reference cannot be blank: {blank:?}");
    }
    for (name, container) in &config.run {
        if name.trim().is_empty() {
            bail!("container name cannot be blank");
        }
        if let Some(image) = &container.image
            && image.trim().is_empty()
        {
            bail!("container `{name}` has a blank image");
        }
        if let Some(cidfile) = &container.cidfile
            && cidfile.trim().is_empty()
        {
            bail!("container `{name}` has a blank cidfile");
        }
    }
    if let Target::Ssh(ssh) = &config.target
        && ssh.host.trim().is_empty()
    {
        bail!("ssh target requires a host");
    }
    Ok(())
}
