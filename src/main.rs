use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dockprov::comm::{Communicator, DryRun, LocalShell, SshCommunicator};
use dockprov::config::{self, Config, Target};
use dockprov::docker::{ContainerSpec, DockerClient, Machine, derive_cidfile};
use dockprov::provisioner::{ProvisionReport, Provisioner};
use dockprov::ui::TracingUi;

#[derive(Debug, Parser)]
#[command(
    name = "dockprov",
    version,
    about = "Pull images and run Docker containers on a machine, idempotently"
)]
struct Cli {
    /// Config file (defaults to .dockprov.yml in the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the commands instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Write a JSON report of what was done
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the daemon, pull images, run containers (default)
    Provision,
    /// Pull configured images that are not present yet
    Pull,
    /// Start the Docker daemon if the guest knows how
    StartService,
    /// Run configured containers, optionally only the named ones
    Run { names: Vec<String> },
    /// Print the id-file path used for a container
    Cidfile { name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = load_config(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Command::Provision);

    let comm = communicator(&cfg, cli.dry_run);
    let ui = TracingUi;
    let machine = Machine {
        comm: comm.as_ref(),
        guest: &cfg.guest,
        ui: &ui,
    };
    let client = DockerClient::new(machine, cfg.docker_settings());

    let report = match command {
        Command::Provision => {
            Provisioner::new(client, cfg.images.clone(), cfg.containers()).provision()?
        }
        Command::Pull => ProvisionReport {
            images: client.pull_images(cfg.images.as_slice())?,
            ..ProvisionReport::default()
        },
        Command::StartService => ProvisionReport {
            daemon: Some(client.ensure_daemon_running()?),
            ..ProvisionReport::default()
        },
        Command::Run { names } => ProvisionReport {
            containers: client.run(&select_containers(&cfg, &names)?)?,
            ..ProvisionReport::default()
        },
        Command::Cidfile { name } => {
            println!("{}", cidfile_for(&cfg, &name));
            return Ok(());
        }
    };

    if let Some(path) = cli.report {
        write_report(&path, &report)?;
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "dockprov=info",
        1 => "dockprov=debug",
        _ => "dockprov=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return config::load_file(path);
    }
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    match config::load(&cwd)? {
        Some(cfg) => Ok(cfg),
        None => bail!(
            "no {} in {} (use --config to point at one)",
            config::CONFIG_FILE_NAME,
            cwd.display()
        ),
    }
}

fn communicator(cfg: &Config, dry_run: bool) -> Box<dyn Communicator> {
    if dry_run {
        return Box::new(DryRun::new());
    }
    match &cfg.target {
        Target::Local => Box::new(LocalShell::new()),
        Target::Ssh(ssh) => Box::new(SshCommunicator::new(ssh.clone())),
    }
}

fn cidfile_for(cfg: &Config, name: &str) -> String {
    cfg.run
        .get(name)
        .and_then(|c| c.cidfile.clone())
        .unwrap_or_else(|| derive_cidfile(&cfg.cids_dir, name))
}

/// Configured containers restricted to `names`, keeping config order.
fn select_containers(cfg: &Config, names: &[String]) -> Result<Vec<ContainerSpec>> {
    if let Some(unknown) = names.iter().find(|n| !cfg.run.contains_key(n.as_str())) {
        bail!("no container named `{unknown}` in config");
    }
    Ok(cfg
        .containers()
        .into_iter()
        .filter(|c| names.is_empty() || names.contains(&c.name))
        .collect())
}

fn write_report(path: &Path, report: &ProvisionReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
