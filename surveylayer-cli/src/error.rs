//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use surveylayer::config::ConfigFileError;
use surveylayer::geo::GeoError;
use surveylayer::route::LegId;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Coordinate out of range
    Coordinate(GeoError),
    /// Failed to read the legs file
    FileRead { path: PathBuf, error: std::io::Error },
    /// Legs file is not a valid JSON array of legs
    Parse {
        path: PathBuf,
        error: serde_json::Error,
    },
    /// Failed to write output file
    FileWrite { path: PathBuf, error: std::io::Error },
    /// Seed leg is not in the legs file
    SeedNotFound { seed: LegId, path: PathBuf },
    /// Two legs in the file share an id
    DuplicateLeg { id: LegId, path: PathBuf },
    /// Refused to overwrite an existing file
    AlreadyExists(PathBuf),
}

impl CliError {
    /// Exit the process with an error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Parse { .. } => {
                eprintln!();
                eprintln!("Expected a JSON array of legs, for example:");
                eprintln!(
                    r#"  [{{"id": 1, "zone_id": 1, "start": {{"latitude": 0.0, "longitude": 0.0}}, "end": {{"latitude": 0.0, "longitude": 1.0}}}}]"#
                );
            }
            CliError::AlreadyExists(_) => {
                eprintln!();
                eprintln!("Use --force to overwrite it.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Coordinate(e) => write!(f, "{}", e),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read file '{}': {}", path.display(), error)
            }
            CliError::Parse { path, error } => {
                write!(f, "Failed to parse legs in '{}': {}", path.display(), error)
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
            CliError::SeedNotFound { seed, path } => {
                write!(f, "Seed leg {} not found in '{}'", seed, path.display())
            }
            CliError::DuplicateLeg { id, path } => {
                write!(f, "Leg id {} appears more than once in '{}'", id, path.display())
            }
            CliError::AlreadyExists(path) => {
                write!(f, "File '{}' already exists", path.display())
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Coordinate(e) => Some(e),
            CliError::FileRead { error, .. } => Some(error),
            CliError::Parse { error, .. } => Some(error),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<GeoError> for CliError {
    fn from(e: GeoError) -> Self {
        CliError::Coordinate(e)
    }
}
