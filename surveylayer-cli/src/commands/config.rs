//! Configuration management CLI commands.

use std::path::Path;

use clap::Subcommand;
use surveylayer::config::{config_file_path, ConfigFile};
use surveylayer::track_cache::CacheConfig;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective settings
    Show,

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
        ConfigCommands::Show => run_show(&config_file_path()),
        ConfigCommands::Init { force } => {
            let path = config_file_path();
            init(&path, force)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}

fn run_show(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;
    let cache = CacheConfig::from(&config);

    let source = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("Configuration: {}{}", path.display(), source);
    println!();
    println!("[cache]");
    println!("  watch_interval_ms = {}", cache.watch_interval.as_millis());
    println!("  event_capacity    = {}", cache.event_capacity);
    println!();
    println!("[logging]");
    println!("  directory = {}", config.logging.directory.display());
    println!("  file      = {}", config.logging.file);

    Ok(())
}

/// Write defaults to `path` unless it exists and `force` is unset.
fn init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::AlreadyExists(path.to_path_buf()));
    }
    ConfigFile::default().save_to(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");

        init(&path, false).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[cache]\nevent_capacity = 8\n").unwrap();

        assert!(matches!(init(&path, false), Err(CliError::AlreadyExists(_))));

        init(&path, true).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap().cache.event_capacity, 64);
    }

    #[test]
    fn test_show_reports_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[cache]\nwatch_interval_ms = soon\n").unwrap();

        assert!(matches!(run_show(&path), Err(CliError::Config(_))));
    }
}
