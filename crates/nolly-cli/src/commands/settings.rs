//! Local-only subcommands: configuration and shell completions.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::CommandFactory;
use clap_complete::Shell;

use crate::Cli;
use crate::config::{AppConfig, ProfilePaths};

/// Writes a completion script for `shell` to stdout.
pub fn print_completions(shell: Shell) {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "nolly", &mut std::io::stdout());
}

/// Runs `config show`.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
pub fn run_config_show(dir: Option<&Path>) -> Result<()> {
    let paths = ProfilePaths::resolve(dir)?;
    let config = AppConfig::load(&paths.config_file)?;
    let rendered = toml::to_string_pretty(&config).context("failed to serialize config to TOML")?;

    tracing::info!("# config: {}", paths.config_file.display());
    tracing::info!("# store: {}", paths.store_file().display());
    for line in rendered.lines() {
        tracing::info!("{line}");
    }
    Ok(())
}

/// Runs `config init`.
///
/// # Errors
///
/// Returns an error if the file already exists and `force` is not set, or
/// if it cannot be written.
pub fn run_config_init(dir: Option<&Path>, force: bool) -> Result<()> {
    let path = ProfilePaths::resolve(dir)?.config_file;
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            path.display()
        );
    }
    AppConfig::default().save(&path)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}
