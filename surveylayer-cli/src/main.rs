//! SurveyLayer CLI - Command-line interface
//!
//! Survey route planning and configuration tooling built on the SurveyLayer
//! library.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use surveylayer::config::ConfigFile;
use surveylayer::logging::{init_logging, LoggingGuard};

use commands::config::ConfigCommands;
use commands::route::RouteArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "surveylayer")]
#[command(version = surveylayer::VERSION)]
#[command(about = "Survey line planning and track projection tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Order the legs of a survey zone starting from a seed leg
    Route(RouteArgs),

    /// Great-circle distance between two points in decimal degrees
    #[command(allow_negative_numbers = true)]
    Distance {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let _logging = match setup_logging() {
        Ok(guard) => guard,
        Err(e) => e.exit(),
    };

    let result = match cli.command {
        Commands::Route(args) => commands::route::run(args),
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => commands::distance::run(lat1, lon1, lat2, lon2),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}

/// Start logging as configured in the `[logging]` section.
///
/// An unreadable config file falls back to the default log location so that
/// `config` commands can still report the problem.
fn setup_logging() -> Result<LoggingGuard, CliError> {
    let config = ConfigFile::load().unwrap_or_default();
    init_logging(&config.logging.directory, &config.logging.file)
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}
