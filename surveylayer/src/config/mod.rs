//! User configuration file (`~/.surveylayer/config.ini`).
//!
//! Missing keys fall back to defaults, so an empty or absent file is valid.
//!
//! ```ini
//! [cache]
//! watch_interval_ms = 300
//! event_capacity = 64
//!
//! [logging]
//! directory = ~/.surveylayer/logs
//! file = surveylayer.log
//! ```

mod file;
mod parser;
mod writer;

pub use file::{
    config_directory, config_file_path, default_log_dir, CacheSettings, ConfigFile,
    ConfigFileError, LoggingSettings, DEFAULT_LOG_FILE,
};
